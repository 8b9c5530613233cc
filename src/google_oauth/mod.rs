pub mod credentials;
pub(crate) mod endpoints;
pub mod service_account;

pub use credentials::{DriveOauthCredential, ServiceAccountKey, ServiceAccountSource};
pub use service_account::ServiceAccountAuth;
