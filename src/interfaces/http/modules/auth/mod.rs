//! Authentication module: token issue and a protected route

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
