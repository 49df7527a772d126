//! SeaORM repository against a migrated in-memory SQLite database.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use sea_orm::{EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;

use room_booking::application::BookingService;
use room_booking::domain::booking::{
    run_in_transaction, BookingRepository, NewReservation, NewRoomRestriction, RoomFilter,
    RESERVATION_RESTRICTION_ID,
};
use room_booking::domain::DomainError;
use room_booking::infrastructure::database::entities::{reservation, restriction, room_restriction};
use room_booking::infrastructure::database::migrator::Migrator;
use room_booking::infrastructure::{init_database, DatabaseConfig, SeaOrmBookingRepository};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_reservation(room_id: i32, start: &str, end: &str) -> NewReservation {
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

async fn setup() -> Arc<SeaOrmBookingRepository> {
    let db = init_database(&DatabaseConfig::sqlite_in_memory())
        .await
        .unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(SeaOrmBookingRepository::new(db, Duration::from_secs(3)))
}

#[tokio::test]
async fn migrations_seed_rooms_and_restriction_catalog() {
    let repo = setup().await;

    let rooms = repo.get_all_rooms(&RoomFilter::default()).await.unwrap();
    let names: Vec<_> = rooms.iter().map(|r| r.room_name.as_str()).collect();
    assert_eq!(names, vec!["General's Quarters", "Major's Suite"]);

    let reservation_kind = restriction::Entity::find_by_id(RESERVATION_RESTRICTION_ID)
        .one(repo.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reservation_kind.restriction_name, "Reservation");
}

#[tokio::test]
async fn booking_writes_reservation_and_restriction() {
    let repo = setup().await;
    let service = BookingService::new(repo.clone());

    let id = service
        .book_reservation(new_reservation(1, "2024-03-30", "2024-04-30"))
        .await
        .unwrap();

    let stored = repo.get_reservation_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "john@smith.com");
    assert_eq!(stored.start_date, date("2024-03-30"));

    let rows = room_restriction::Entity::find()
        .all(repo.connection())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reservation_id, id);
    assert_eq!(rows[0].room_id, 1);
    assert_eq!(rows[0].restriction_id, RESERVATION_RESTRICTION_ID);
    assert_eq!(rows[0].end_date, date("2024-04-30"));
}

#[tokio::test]
async fn failed_restriction_rolls_back_reservation() {
    let repo = setup().await;
    let res = new_reservation(1, "2024-03-30", "2024-04-30");

    let inserted_id = Arc::new(AtomicI32::new(0));
    let seen = Arc::clone(&inserted_id);
    let err = run_in_transaction(&*repo, move |uow| {
        Box::pin(async move {
            let id = uow.insert_reservation(&res).await?;
            seen.store(id, Ordering::SeqCst);
            let mut restriction = NewRoomRestriction::for_reservation(&res, id);
            // No such restriction type: the foreign key rejects the row.
            restriction.restriction_id = 999;
            uow.insert_room_restriction(&restriction).await?;
            Ok(id)
        })
    })
    .await
    .unwrap_err();

    assert!(matches!(err, DomainError::Write(_)));
    let id = inserted_id.load(Ordering::SeqCst);
    assert!(id > 0, "reservation insert ran");
    assert!(repo.get_reservation_by_id(id).await.unwrap().is_none());
    assert_eq!(
        reservation::Entity::find()
            .count(repo.connection())
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn reservation_for_unknown_room_is_a_write_failure() {
    let repo = setup().await;
    let service = BookingService::new(repo.clone());

    let err = service
        .book_reservation(new_reservation(999, "2024-03-30", "2024-04-30"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Write(_)));
    assert_eq!(
        room_restriction::Entity::find()
            .count(repo.connection())
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn search_excludes_rooms_with_overlapping_restrictions() {
    let repo = setup().await;
    let service = BookingService::new(repo.clone());

    let all = repo
        .search_availability_for_all_rooms(date("2024-05-30"), date("2024-06-06"))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    service
        .book_reservation(new_reservation(1, "2024-05-30", "2024-06-06"))
        .await
        .unwrap();

    let free = repo
        .search_availability_for_all_rooms(date("2024-05-30"), date("2024-06-06"))
        .await
        .unwrap();
    assert_eq!(free.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);

    // Arrival on the previous guest's checkout day does not collide.
    let after = repo
        .search_availability_for_all_rooms(date("2024-06-06"), date("2024-06-09"))
        .await
        .unwrap();
    assert_eq!(after.len(), 2);
}

#[tokio::test]
async fn room_availability_by_id() {
    let repo = setup().await;
    let service = BookingService::new(repo.clone());
    service
        .book_reservation(new_reservation(1, "2024-06-01", "2024-06-10"))
        .await
        .unwrap();

    assert!(!repo
        .search_availability_for_dates_by_room_id(date("2024-06-03"), date("2024-06-05"), 1)
        .await
        .unwrap());
    assert!(!repo
        .search_availability_for_dates_by_room_id(date("2024-05-25"), date("2024-06-02"), 1)
        .await
        .unwrap());
    assert!(repo
        .search_availability_for_dates_by_room_id(date("2024-06-10"), date("2024-06-12"), 1)
        .await
        .unwrap());
    assert!(repo
        .search_availability_for_dates_by_room_id(date("2024-06-03"), date("2024-06-05"), 2)
        .await
        .unwrap());
}

#[tokio::test]
async fn room_reads_are_repeatable() {
    let repo = setup().await;

    let first = repo.get_room_by_id(1).await.unwrap();
    let second = repo.get_room_by_id(1).await.unwrap();
    assert_eq!(first, second);
    assert!(repo.get_room_by_id(42).await.unwrap().is_none());

    let filter = RoomFilter {
        room_name: Some("Major's Suite".into()),
        ..RoomFilter::default()
    };
    let a = repo.get_all_rooms(&filter).await.unwrap();
    let b = repo.get_all_rooms(&filter).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].id, 2);
}

#[tokio::test]
async fn ping_succeeds_on_open_pool() {
    let repo = setup().await;
    repo.ping().await.unwrap();
}
