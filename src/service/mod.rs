pub mod bootstrap;
pub mod uploader;

pub use uploader::{DriveUploader, ImageUploader};
