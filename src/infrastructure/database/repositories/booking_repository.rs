//! SeaORM implementation of BookingRepository

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QueryTrait, Set,
    TransactionTrait,
};

use crate::domain::booking::{
    BookingRepository, NewReservation, NewRoomRestriction, Reservation, Room, RoomFilter,
    UnitOfWork,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{reservation, room, room_restriction};
use crate::shared::with_deadline;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
    query_timeout: Duration,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn room_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        room_name: m.room_name,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn reservation_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        phone: m.phone,
        start_date: m.start_date,
        end_date: m.end_date,
        room_id: m.room_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn read_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Query(format!("Database error: {}", e))
}

fn write_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Write(format!("Database error: {}", e))
}

fn txn_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Transaction(format!("Database error: {}", e))
}

/// Room ids holding a restriction that overlaps `[start, end)`.
fn blocked_room_ids(start: NaiveDate, end: NaiveDate) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(room_restriction::Column::RoomId)
        .from(room_restriction::Entity)
        .and_where(room_restriction::Column::StartDate.lt(end))
        .and_where(room_restriction::Column::EndDate.gt(start))
        .to_owned()
}

// ── Unit of work ────────────────────────────────────────────────

/// A live database transaction. Dropping it without committing rolls back.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
    query_timeout: Duration,
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn insert_reservation(&mut self, r: &NewReservation) -> DomainResult<i32> {
        debug!("Inserting reservation for room {}", r.room_id);

        let now = Utc::now();
        let model = reservation::ActiveModel {
            id: NotSet,
            first_name: Set(r.first_name.clone()),
            last_name: Set(r.last_name.clone()),
            email: Set(r.email.clone()),
            phone: Set(r.phone.clone()),
            start_date: Set(r.start_date),
            end_date: Set(r.end_date),
            room_id: Set(r.room_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let txn = &self.txn;
        let inserted = with_deadline(self.query_timeout, "insert_reservation", async {
            model.insert(txn).await.map_err(write_err)
        })
        .await?;
        Ok(inserted.id)
    }

    async fn insert_room_restriction(&mut self, r: &NewRoomRestriction) -> DomainResult<()> {
        debug!(
            "Inserting room restriction for room {} (reservation {})",
            r.room_id, r.reservation_id
        );

        let now = Utc::now();
        let model = room_restriction::ActiveModel {
            id: NotSet,
            start_date: Set(r.start_date),
            end_date: Set(r.end_date),
            room_id: Set(r.room_id),
            reservation_id: Set(r.reservation_id),
            restriction_id: Set(r.restriction_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let txn = &self.txn;
        with_deadline(self.query_timeout, "insert_room_restriction", async {
            model.insert(txn).await.map_err(write_err)
        })
        .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let Self { txn, query_timeout } = *self;
        with_deadline(query_timeout, "commit", async {
            txn.commit().await.map_err(txn_err)
        })
        .await
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        let Self { txn, query_timeout } = *self;
        with_deadline(query_timeout, "rollback", async {
            txn.rollback().await.map_err(txn_err)
        })
        .await
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = with_deadline(self.query_timeout, "begin", async {
            self.db.begin().await.map_err(txn_err)
        })
        .await?;
        Ok(Box::new(SeaOrmUnitOfWork {
            txn,
            query_timeout: self.query_timeout,
        }))
    }

    async fn search_availability_for_all_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Room>> {
        debug!("Searching all rooms free for {} .. {}", start, end);

        let models = with_deadline(self.query_timeout, "search_availability_for_all_rooms", async {
            room::Entity::find()
                .filter(room::Column::Id.not_in_subquery(blocked_room_ids(start, end)))
                .order_by_asc(room::Column::Id)
                .all(&self.db)
                .await
                .map_err(read_err)
        })
        .await?;
        Ok(models.into_iter().map(room_to_domain).collect())
    }

    async fn search_availability_for_dates_by_room_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i32,
    ) -> DomainResult<bool> {
        let overlapping = with_deadline(
            self.query_timeout,
            "search_availability_for_dates_by_room_id",
            async {
                room_restriction::Entity::find()
                    .filter(room_restriction::Column::RoomId.eq(room_id))
                    .filter(room_restriction::Column::StartDate.lt(end))
                    .filter(room_restriction::Column::EndDate.gt(start))
                    .count(&self.db)
                    .await
                    .map_err(read_err)
            },
        )
        .await?;
        debug!(
            "Room {} has {} overlapping restrictions for {} .. {}",
            room_id, overlapping, start, end
        );
        Ok(overlapping == 0)
    }

    async fn get_room_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = with_deadline(self.query_timeout, "get_room_by_id", async {
            room::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(read_err)
        })
        .await?;
        Ok(model.map(room_to_domain))
    }

    async fn get_all_rooms(&self, filter: &RoomFilter) -> DomainResult<Vec<Room>> {
        let query = room::Entity::find()
            .apply_if(filter.id, |q, v| q.filter(room::Column::Id.eq(v)))
            .apply_if(filter.room_name.clone(), |q, v| {
                q.filter(room::Column::RoomName.eq(v))
            })
            .apply_if(filter.created_at, |q, v| {
                q.filter(room::Column::CreatedAt.eq(v))
            })
            .apply_if(filter.updated_at, |q, v| {
                q.filter(room::Column::UpdatedAt.eq(v))
            })
            .order_by_asc(room::Column::Id);

        let models = with_deadline(self.query_timeout, "get_all_rooms", async {
            query.all(&self.db).await.map_err(read_err)
        })
        .await?;
        Ok(models.into_iter().map(room_to_domain).collect())
    }

    async fn get_reservation_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = with_deadline(self.query_timeout, "get_reservation_by_id", async {
            reservation::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(read_err)
        })
        .await?;
        Ok(model.map(reservation_to_domain))
    }

    async fn ping(&self) -> DomainResult<()> {
        with_deadline(self.query_timeout, "ping", async {
            self.db
                .execute_unprepared("SELECT 1")
                .await
                .map(|_| ())
                .map_err(read_err)
        })
        .await
    }
}
