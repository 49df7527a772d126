//! Create restrictions table
//!
//! Catalog of restriction kinds a room restriction can carry.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restrictions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restrictions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Restrictions::RestrictionName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restrictions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restrictions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restrictions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Restrictions {
    Table,
    Id,
    RestrictionName,
    CreatedAt,
    UpdatedAt,
}
