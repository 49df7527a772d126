//! Room and availability DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::booking::{Room, RoomFilter};
use crate::interfaces::http::common::validate_stay;

/// Date window to check, `[startDate, endDate)`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_availability_window"))]
pub struct AvailabilityRequest {
    #[schema(example = "2024-05-30")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-06")]
    pub end_date: NaiveDate,
}

fn validate_availability_window(
    req: &AvailabilityRequest,
) -> Result<(), validator::ValidationError> {
    validate_stay(req.start_date, req.end_date)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: i32,
    pub room_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            room_name: r.room_name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailabilityDto {
    pub room_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
}

/// Optional equality filters for `GET /room`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomQuery {
    pub id: Option<i32>,
    pub room_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RoomQuery> for RoomFilter {
    fn from(q: RoomQuery) -> Self {
        Self {
            id: q.id,
            room_name: q.room_name.filter(|n| !n.is_empty()),
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}
