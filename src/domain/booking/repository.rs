//! Booking repository interface
//!
//! [`BookingRepository`] is the single boundary between request handling
//! and the data store. Writes only happen through a [`UnitOfWork`], so a
//! reservation and its room restriction always share one transaction.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{NewReservation, NewRoomRestriction, Reservation, Room, RoomFilter};
use crate::domain::DomainResult;

/// An open transaction. Consumed by [`commit`](UnitOfWork::commit) or
/// [`rollback`](UnitOfWork::rollback); dropping it without either discards
/// every staged write.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Insert a reservation and return its generated id.
    async fn insert_reservation(&mut self, reservation: &NewReservation) -> DomainResult<i32>;

    async fn insert_room_restriction(&mut self, restriction: &NewRoomRestriction)
        -> DomainResult<()>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Open a new transaction.
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;

    /// Rooms with no restriction overlapping `[start, end)`.
    async fn search_availability_for_all_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Room>>;

    /// `true` when `room_id` has no restriction overlapping `[start, end)`.
    async fn search_availability_for_dates_by_room_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i32,
    ) -> DomainResult<bool>;

    async fn get_room_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    async fn get_all_rooms(&self, filter: &RoomFilter) -> DomainResult<Vec<Room>>;

    async fn get_reservation_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> DomainResult<()>;
}
