//! In-memory booking store
//!
//! Behaves like the database for the happy path and fails
//! deterministically on a handful of sentinel inputs, so failure paths can
//! be exercised without a real database:
//!
//! | call | fails when |
//! |---|---|
//! | `insert_reservation` | `room_id == 2` |
//! | `insert_room_restriction` | `room_id == 1000` |
//! | `search_availability_for_all_rooms` | start year before 1960 |
//! | `search_availability_for_dates_by_room_id` | `room_id == 2` |
//! | `get_all_rooms` | filter id is 2 |
//! | `get_room_by_id` | `id == 1000` |
//!
//! Foreign keys are not enforced. A commit applies its staged rows while
//! holding the write side of `commit_gate`, and the availability and
//! reservation reads take the read side, so a reader never sees a
//! reservation without its restriction.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::domain::booking::{
    BookingRepository, NewReservation, NewRoomRestriction, Reservation, Room, RoomFilter,
    RoomRestriction, UnitOfWork,
};
use crate::domain::{DomainError, DomainResult};

pub const FAIL_RESERVATION_ROOM_ID: i32 = 2;
pub const FAIL_RESTRICTION_ROOM_ID: i32 = 1000;
pub const FAIL_SEARCH_BEFORE_YEAR: i32 = 1960;
pub const FAIL_ROOM_AVAILABILITY_ID: i32 = 2;
pub const FAIL_LIST_ROOMS_ID: i32 = 2;
pub const FAIL_GET_ROOM_ID: i32 = 1000;

#[derive(Default)]
struct Tables {
    rooms: DashMap<i32, Room>,
    reservations: DashMap<i32, Reservation>,
    restrictions: DashMap<i32, RoomRestriction>,
    room_counter: AtomicI32,
    reservation_counter: AtomicI32,
    restriction_counter: AtomicI32,
    commit_gate: RwLock<()>,
}

impl Tables {
    fn next_id(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn room_is_free(&self, room_id: i32, start: NaiveDate, end: NaiveDate) -> bool {
        !self
            .restrictions
            .iter()
            .any(|r| r.room_id == room_id && r.overlaps(start, end))
    }
}

/// In-memory booking repository for development and testing
#[derive(Clone)]
pub struct InMemoryBookingRepository {
    tables: Arc<Tables>,
}

impl InMemoryBookingRepository {
    /// Store seeded with room 1 "General's Quarters" and room 2 "Major's Suite".
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.add_room("General's Quarters");
        repo.add_room("Major's Suite");
        repo
    }

    /// Store with no rooms at all.
    pub fn empty() -> Self {
        Self {
            tables: Arc::new(Tables::default()),
        }
    }

    pub fn add_room(&self, room_name: &str) -> Room {
        let id = Tables::next_id(&self.tables.room_counter);
        let room = Room::new(id, room_name);
        self.tables.rooms.insert(id, room.clone());
        room
    }

    /// Write a restriction directly, outside any transaction.
    pub fn add_restriction(&self, restriction: &NewRoomRestriction) -> RoomRestriction {
        let id = Tables::next_id(&self.tables.restriction_counter);
        let row = RoomRestriction::from_new(id, restriction, Utc::now());
        self.tables.restrictions.insert(id, row.clone());
        row
    }

    pub fn reservation_count(&self) -> usize {
        self.tables.reservations.len()
    }

    pub fn restriction_count(&self) -> usize {
        self.tables.restrictions.len()
    }

    pub fn restrictions_for_reservation(&self, reservation_id: i32) -> Vec<RoomRestriction> {
        let mut rows: Vec<RoomRestriction> = self
            .tables
            .restrictions
            .iter()
            .filter(|r| r.reservation_id == reservation_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        rows
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes are staged here and only reach the tables on commit.
pub struct InMemoryUnitOfWork {
    tables: Arc<Tables>,
    reservations: Vec<Reservation>,
    restrictions: Vec<RoomRestriction>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn insert_reservation(&mut self, reservation: &NewReservation) -> DomainResult<i32> {
        if reservation.room_id == FAIL_RESERVATION_ROOM_ID {
            return Err(DomainError::Write("failed to insert reservation".into()));
        }
        let id = Tables::next_id(&self.tables.reservation_counter);
        self.reservations
            .push(Reservation::from_new(id, reservation, Utc::now()));
        Ok(id)
    }

    async fn insert_room_restriction(&mut self, restriction: &NewRoomRestriction) -> DomainResult<()> {
        if restriction.room_id == FAIL_RESTRICTION_ROOM_ID {
            return Err(DomainError::Write("failed to insert room restriction".into()));
        }
        let id = Tables::next_id(&self.tables.restriction_counter);
        self.restrictions
            .push(RoomRestriction::from_new(id, restriction, Utc::now()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let Self {
            tables,
            reservations,
            restrictions,
        } = *self;
        let _gate = tables.commit_gate.write().await;
        for r in reservations {
            tables.reservations.insert(r.id, r);
        }
        for r in restrictions {
            tables.restrictions.insert(r.id, r);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            tables: Arc::clone(&self.tables),
            reservations: Vec::new(),
            restrictions: Vec::new(),
        }))
    }

    async fn search_availability_for_all_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Room>> {
        if start.year() < FAIL_SEARCH_BEFORE_YEAR {
            return Err(DomainError::Query("error searching rooms".into()));
        }
        let _gate = self.tables.commit_gate.read().await;
        let mut rooms: Vec<Room> = self
            .tables
            .rooms
            .iter()
            .filter(|room| self.tables.room_is_free(room.id, start, end))
            .map(|room| room.value().clone())
            .collect();
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }

    async fn search_availability_for_dates_by_room_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i32,
    ) -> DomainResult<bool> {
        if room_id == FAIL_ROOM_AVAILABILITY_ID {
            return Err(DomainError::Query(format!(
                "error checking availability for room {}",
                room_id
            )));
        }
        let _gate = self.tables.commit_gate.read().await;
        Ok(self.tables.room_is_free(room_id, start, end))
    }

    async fn get_room_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        if id == FAIL_GET_ROOM_ID {
            return Err(DomainError::Query("error getting room".into()));
        }
        Ok(self.tables.rooms.get(&id).map(|r| r.value().clone()))
    }

    async fn get_all_rooms(&self, filter: &RoomFilter) -> DomainResult<Vec<Room>> {
        if filter.id == Some(FAIL_LIST_ROOMS_ID) {
            return Err(DomainError::Query("error getting rooms".into()));
        }
        let mut rooms: Vec<Room> = self
            .tables
            .rooms
            .iter()
            .filter(|room| filter.matches(room.value()))
            .map(|room| room.value().clone())
            .collect();
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }

    async fn get_reservation_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let _gate = self.tables.commit_gate.read().await;
        Ok(self.tables.reservations.get(&id).map(|r| r.value().clone()))
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::RESERVATION_RESTRICTION_ID;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_reservation(room_id: i32) -> NewReservation {
        NewReservation {
            first_name: "John".into(),
            last_name: "Smith".into(),
            email: "john@smith.com".into(),
            phone: "555-555-5555".into(),
            start_date: date("2024-05-30"),
            end_date: date("2024-06-06"),
            room_id,
        }
    }

    fn block(room_id: i32, start: &str, end: &str) -> NewRoomRestriction {
        NewRoomRestriction {
            start_date: date(start),
            end_date: date(end),
            room_id,
            reservation_id: 0,
            restriction_id: RESERVATION_RESTRICTION_ID,
        }
    }

    #[tokio::test]
    async fn seeded_with_two_rooms() {
        let repo = InMemoryBookingRepository::new();
        let rooms = repo.get_all_rooms(&RoomFilter::default()).await.unwrap();
        let names: Vec<_> = rooms.iter().map(|r| r.room_name.as_str()).collect();
        assert_eq!(names, vec!["General's Quarters", "Major's Suite"]);
    }

    #[tokio::test]
    async fn staged_writes_invisible_until_commit() {
        let repo = InMemoryBookingRepository::new();
        let mut uow = repo.begin().await.unwrap();
        let id = uow.insert_reservation(&new_reservation(1)).await.unwrap();

        assert!(repo.get_reservation_by_id(id).await.unwrap().is_none());
        uow.commit().await.unwrap();
        assert!(repo.get_reservation_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rollback_discards_staged_writes() {
        let repo = InMemoryBookingRepository::new();
        let mut uow = repo.begin().await.unwrap();
        let id = uow.insert_reservation(&new_reservation(1)).await.unwrap();
        uow.insert_room_restriction(&NewRoomRestriction::for_reservation(
            &new_reservation(1),
            id,
        ))
        .await
        .unwrap();
        uow.rollback().await.unwrap();

        assert_eq!(repo.reservation_count(), 0);
        assert_eq!(repo.restriction_count(), 0);
    }

    #[tokio::test]
    async fn sentinel_inputs_fail() {
        let repo = InMemoryBookingRepository::new();
        let mut uow = repo.begin().await.unwrap();

        assert!(matches!(
            uow.insert_reservation(&new_reservation(FAIL_RESERVATION_ROOM_ID)).await,
            Err(DomainError::Write(_))
        ));
        assert!(matches!(
            uow.insert_room_restriction(&block(FAIL_RESTRICTION_ROOM_ID, "2024-01-01", "2024-01-02"))
                .await,
            Err(DomainError::Write(_))
        ));
        assert!(matches!(
            repo.search_availability_for_all_rooms(date("1959-12-31"), date("1960-01-02"))
                .await,
            Err(DomainError::Query(_))
        ));
        assert!(matches!(
            repo.search_availability_for_dates_by_room_id(
                date("2024-01-01"),
                date("2024-01-02"),
                FAIL_ROOM_AVAILABILITY_ID
            )
            .await,
            Err(DomainError::Query(_))
        ));
        let filter = RoomFilter {
            id: Some(FAIL_LIST_ROOMS_ID),
            ..RoomFilter::default()
        };
        assert!(matches!(
            repo.get_all_rooms(&filter).await,
            Err(DomainError::Query(_))
        ));
        assert!(matches!(
            repo.get_room_by_id(FAIL_GET_ROOM_ID).await,
            Err(DomainError::Query(_))
        ));
    }

    #[tokio::test]
    async fn search_excludes_overlapping_rooms_only() {
        let repo = InMemoryBookingRepository::new();
        repo.add_restriction(&block(1, "2024-05-30", "2024-06-06"));

        let free = repo
            .search_availability_for_all_rooms(date("2024-05-30"), date("2024-06-06"))
            .await
            .unwrap();
        assert_eq!(free.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);

        // Checkout day of the existing stay is free again.
        let free = repo
            .search_availability_for_all_rooms(date("2024-06-06"), date("2024-06-08"))
            .await
            .unwrap();
        assert_eq!(free.len(), 2);
    }

    #[tokio::test]
    async fn room_availability_uses_half_open_ranges() {
        let repo = InMemoryBookingRepository::new();
        repo.add_restriction(&block(1, "2024-06-01", "2024-06-05"));

        let check = |s: &'static str, e: &'static str| {
            let repo = repo.clone();
            async move {
                repo.search_availability_for_dates_by_room_id(date(s), date(e), 1)
                    .await
                    .unwrap()
            }
        };

        assert!(!check("2024-06-02", "2024-06-03").await);
        assert!(!check("2024-05-30", "2024-06-02").await);
        assert!(check("2024-05-28", "2024-06-01").await);
        assert!(check("2024-06-05", "2024-06-09").await);
    }

    #[tokio::test]
    async fn filter_by_name() {
        let repo = InMemoryBookingRepository::new();
        let filter = RoomFilter {
            room_name: Some("Major's Suite".into()),
            ..RoomFilter::default()
        };
        let rooms = repo.get_all_rooms(&filter).await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn committed_reservation_always_has_its_restriction() {
        let repo = InMemoryBookingRepository::new();

        let writers: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let mut uow = repo.begin().await.unwrap();
                    let id = uow.insert_reservation(&new_reservation(1)).await.unwrap();
                    let mut restriction = block(1, "2024-05-30", "2024-06-06");
                    restriction.reservation_id = id;
                    uow.insert_room_restriction(&restriction).await.unwrap();
                    uow.commit().await.unwrap();
                })
            })
            .collect();

        let reader = {
            let repo = repo.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    for id in 1..=50 {
                        if repo.get_reservation_by_id(id).await.unwrap().is_some() {
                            assert_eq!(repo.restrictions_for_reservation(id).len(), 1);
                        }
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        for w in writers {
            w.await.unwrap();
        }
        reader.await.unwrap();
        assert_eq!(repo.reservation_count(), 50);
        assert_eq!(repo.restriction_count(), 50);
    }
}
