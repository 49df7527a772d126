//! Rooms module: listing, lookup and availability search

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
