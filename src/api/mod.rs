pub mod drive_api;

pub use drive_api::{DriveApi, DriveEndpoints};
