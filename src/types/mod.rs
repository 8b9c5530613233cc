pub mod site_data;
pub mod upload;
