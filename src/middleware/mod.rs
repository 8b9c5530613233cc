pub mod image_upload;

pub use image_upload::{AvatarSlot, BackgroundSlot, ImageUpload, UploadSlot};
