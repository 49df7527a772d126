//! Restriction type catalog (Reservation, Owner Block)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restrictions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub restriction_name: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::room_restriction::Entity")]
    RoomRestriction,
}

impl Related<super::room_restriction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomRestriction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
