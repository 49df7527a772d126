//! Booking service
//!
//! Thin orchestration over [`BookingRepository`] for the HTTP layer:
//! availability lookups, room reads, and the two-row booking transaction.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, instrument};

use crate::domain::booking::{
    run_in_transaction, BookingRepository, NewReservation, NewRoomRestriction, Reservation, Room,
    RoomFilter,
};
use crate::domain::{DomainError, DomainResult};

/// Service for booking operations
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<dyn BookingRepository> {
        &self.repo
    }

    /// Rooms free for the whole of `[start, end)`.
    pub async fn search_rooms(&self, start: NaiveDate, end: NaiveDate) -> DomainResult<Vec<Room>> {
        self.repo.search_availability_for_all_rooms(start, end).await
    }

    pub async fn check_room_availability(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i32,
    ) -> DomainResult<bool> {
        self.repo
            .search_availability_for_dates_by_room_id(start, end, room_id)
            .await
    }

    pub async fn get_room(&self, id: i32) -> DomainResult<Room> {
        self.repo
            .get_room_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", "id", id))
    }

    pub async fn list_rooms(&self, filter: &RoomFilter) -> DomainResult<Vec<Room>> {
        self.repo.get_all_rooms(filter).await
    }

    pub async fn get_reservation(&self, id: i32) -> DomainResult<Reservation> {
        self.repo
            .get_reservation_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }

    /// Persist a reservation and its room restriction atomically and return
    /// the reservation id.
    ///
    /// Runs on its own task: once started, the transaction finishes even if
    /// the caller stops polling.
    #[instrument(skip_all, fields(room_id = reservation.room_id))]
    pub async fn book_reservation(&self, reservation: NewReservation) -> DomainResult<i32> {
        let repo = Arc::clone(&self.repo);

        let task = tokio::spawn(async move {
            run_in_transaction(repo.as_ref(), move |uow| {
                Box::pin(async move {
                    let id = uow.insert_reservation(&reservation).await?;
                    let restriction = NewRoomRestriction::for_reservation(&reservation, id);
                    uow.insert_room_restriction(&restriction).await?;
                    Ok(id)
                })
            })
            .await
        });

        let result = match task.await {
            Ok(result) => result,
            Err(join_err) => {
                error!(error = %join_err, "booking task did not complete");
                Err(DomainError::Transaction(format!(
                    "booking task failed: {}",
                    join_err
                )))
            }
        };

        match &result {
            Ok(id) => {
                info!(reservation_id = id, "reservation booked");
                metrics::counter!("bookings_total", "outcome" => "committed").increment(1);
            }
            Err(e) => {
                if e.is_server_side() {
                    error!(error = %e, "booking failed");
                } else {
                    info!(error = %e, "booking rejected");
                }
                metrics::counter!("bookings_total", "outcome" => "rolled_back").increment(1);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::RESERVATION_RESTRICTION_ID;
    use crate::infrastructure::storage::{
        InMemoryBookingRepository, FAIL_RESERVATION_ROOM_ID, FAIL_RESTRICTION_ROOM_ID,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn reservation(room_id: i32, start: &str, end: &str) -> NewReservation {
        NewReservation {
            first_name: "John".into(),
            last_name: "Smith".into(),
            email: "john@smith.com".into(),
            phone: "555-555-5555".into(),
            start_date: date(start),
            end_date: date(end),
            room_id,
        }
    }

    fn service() -> (BookingService, InMemoryBookingRepository) {
        let repo = InMemoryBookingRepository::new();
        (BookingService::new(Arc::new(repo.clone())), repo)
    }

    #[tokio::test]
    async fn booking_completes_after_caller_goes_away() {
        use futures_util::FutureExt;

        let (svc, repo) = service();
        let pending = svc
            .book_reservation(reservation(1, "2024-03-30", "2024-04-30"))
            .now_or_never();
        assert!(pending.is_none());

        for _ in 0..100 {
            if repo.restriction_count() > 0 {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(repo.reservation_count(), 1);
        assert_eq!(repo.restriction_count(), 1);
        assert_eq!(repo.restrictions_for_reservation(1).len(), 1);
    }

    #[tokio::test]
    async fn books_reservation_with_matching_restriction() {
        let (svc, repo) = service();
        let id = svc
            .book_reservation(reservation(1, "2024-03-30", "2024-04-30"))
            .await
            .unwrap();

        let stored = svc.get_reservation(id).await.unwrap();
        assert_eq!(stored.room_id, 1);
        assert_eq!(stored.start_date, date("2024-03-30"));

        let restrictions = repo.restrictions_for_reservation(id);
        assert_eq!(restrictions.len(), 1);
        let r = &restrictions[0];
        assert_eq!(r.room_id, 1);
        assert_eq!(r.start_date, date("2024-03-30"));
        assert_eq!(r.end_date, date("2024-04-30"));
        assert_eq!(r.restriction_id, RESERVATION_RESTRICTION_ID);
    }

    #[tokio::test]
    async fn failed_reservation_insert_writes_nothing() {
        let (svc, repo) = service();
        let err = svc
            .book_reservation(reservation(FAIL_RESERVATION_ROOM_ID, "2024-03-30", "2024-04-30"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Write(_)));
        assert_eq!(repo.reservation_count(), 0);
        assert_eq!(repo.restriction_count(), 0);
    }

    #[tokio::test]
    async fn failed_restriction_insert_rolls_back_reservation() {
        let (svc, repo) = service();
        let err = svc
            .book_reservation(reservation(FAIL_RESTRICTION_ROOM_ID, "2024-03-30", "2024-04-30"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Write(_)));
        assert_eq!(repo.reservation_count(), 0);
        assert_eq!(repo.restriction_count(), 0);
        assert!(matches!(
            svc.get_reservation(1).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn booked_room_drops_out_of_search() {
        let (svc, _) = service();
        let before = svc
            .search_rooms(date("2024-05-30"), date("2024-06-06"))
            .await
            .unwrap();
        assert_eq!(before.len(), 2);

        svc.book_reservation(reservation(1, "2024-05-30", "2024-06-06"))
            .await
            .unwrap();

        let after = svc
            .search_rooms(date("2024-05-30"), date("2024-06-06"))
            .await
            .unwrap();
        assert_eq!(after.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);

        assert!(!svc
            .check_room_availability(date("2024-06-01"), date("2024-06-02"), 1)
            .await
            .unwrap());
        assert!(svc
            .check_room_availability(date("2024-06-06"), date("2024-06-10"), 1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn missing_room_is_not_found() {
        let (svc, _) = service();
        assert!(matches!(
            svc.get_room(99).await,
            Err(DomainError::NotFound { entity: "Room", .. })
        ));
        assert_eq!(svc.get_room(1).await.unwrap().room_name, "General's Quarters");
    }
}
