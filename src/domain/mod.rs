pub mod booking;

pub use booking::{
    BookingRepository, NewReservation, NewRoomRestriction, Reservation, Room, RoomFilter,
    RoomRestriction, UnitOfWork,
};

pub use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
