//! Application layer - use cases over the domain

pub mod services;

pub use services::BookingService;
