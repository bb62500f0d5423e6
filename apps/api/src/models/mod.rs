pub mod hiring;
pub mod summary;
