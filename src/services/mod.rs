pub mod api;
pub mod stream;
pub mod upload;
