pub mod handler_404;
pub mod json;
pub mod truncate;
