//! # Room Booking Service
//!
//! Room availability search and transactional reservations over HTTP.
//!
//! ## Architecture
//!
//! - **domain**: rooms, reservations, room restrictions, the
//!   `BookingRepository` facade and the transaction orchestrator
//! - **application**: `BookingService` use cases
//! - **infrastructure**: SeaORM repository and migrations, the in-memory
//!   store, JWT signing
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: errors, logging, per-call deadlines, shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
