//! Booking aggregate
//!
//! Rooms, reservations and room restrictions, the repository facade over
//! them, and the transaction orchestrator that keeps a reservation and its
//! restriction atomic.

pub mod model;
pub mod repository;
pub mod transaction;

pub use model::{
    ranges_overlap, NewReservation, NewRoomRestriction, Reservation, Room, RoomFilter,
    RoomRestriction, RESERVATION_RESTRICTION_ID,
};
pub use repository::{BookingRepository, UnitOfWork};
pub use transaction::{run_in_transaction, TransactionOutcome};
