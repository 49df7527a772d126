//! Seed the restriction catalog and the initial rooms

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_rooms::Rooms;
use super::m20240101_000002_create_restrictions::Restrictions;

const ROOMS: [&str; 2] = ["General's Quarters", "Major's Suite"];

/// Insertion order fixes the ids: "Reservation" must land on 1.
const RESTRICTIONS: [&str; 2] = ["Reservation", "Owner Block"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now();

        let mut restrictions = Query::insert();
        restrictions.into_table(Restrictions::Table).columns([
            Restrictions::RestrictionName,
            Restrictions::CreatedAt,
            Restrictions::UpdatedAt,
        ]);
        for name in RESTRICTIONS {
            restrictions.values_panic([name.into(), now.into(), now.into()]);
        }
        manager.exec_stmt(restrictions).await?;

        let mut rooms = Query::insert();
        rooms
            .into_table(Rooms::Table)
            .columns([Rooms::RoomName, Rooms::CreatedAt, Rooms::UpdatedAt]);
        for name in ROOMS {
            rooms.values_panic([name.into(), now.into(), now.into()]);
        }
        manager.exec_stmt(rooms).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Rooms::Table)
                    .and_where(Expr::col(Rooms::RoomName).is_in(ROOMS))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Restrictions::Table)
                    .and_where(Expr::col(Restrictions::RestrictionName).is_in(RESTRICTIONS))
                    .to_owned(),
            )
            .await
    }
}
