//! Create room_restrictions table
//!
//! Each row blocks a room for a half-open date range. Availability
//! queries scan by room and dates, hence the composite index.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_rooms::Rooms;
use super::m20240101_000002_create_restrictions::Restrictions;
use super::m20240101_000003_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoomRestrictions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoomRestrictions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoomRestrictions::StartDate).date().not_null())
                    .col(ColumnDef::new(RoomRestrictions::EndDate).date().not_null())
                    .col(ColumnDef::new(RoomRestrictions::RoomId).integer().not_null())
                    .col(
                        ColumnDef::new(RoomRestrictions::ReservationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoomRestrictions::RestrictionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoomRestrictions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoomRestrictions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_restrictions_room")
                            .from(RoomRestrictions::Table, RoomRestrictions::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_restrictions_reservation")
                            .from(RoomRestrictions::Table, RoomRestrictions::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_restrictions_restriction")
                            .from(RoomRestrictions::Table, RoomRestrictions::RestrictionId)
                            .to(Restrictions::Table, Restrictions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_room_restrictions_room_dates")
                    .table(RoomRestrictions::Table)
                    .col(RoomRestrictions::RoomId)
                    .col(RoomRestrictions::StartDate)
                    .col(RoomRestrictions::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_room_restrictions_reservation")
                    .table(RoomRestrictions::Table)
                    .col(RoomRestrictions::ReservationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoomRestrictions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RoomRestrictions {
    Table,
    Id,
    StartDate,
    EndDate,
    RoomId,
    ReservationId,
    RestrictionId,
    CreatedAt,
    UpdatedAt,
}
