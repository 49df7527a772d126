//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::booking::{NewReservation, Reservation};
use crate::interfaces::http::common::validate_stay;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_reservation_stay"))]
pub struct ReservationRequest {
    #[validate(length(min = 1, max = 255, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 64, message = "phone is required"))]
    pub phone: String,
    #[schema(example = "2024-03-30")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-04-30")]
    pub end_date: NaiveDate,
    #[validate(range(min = 1, message = "roomId must be positive"))]
    pub room_id: i32,
}

fn validate_reservation_stay(req: &ReservationRequest) -> Result<(), validator::ValidationError> {
    validate_stay(req.start_date, req.end_date)
}

impl From<ReservationRequest> for NewReservation {
    fn from(r: ReservationRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
            start_date: r.start_date,
            end_date: r.end_date,
            room_id: r.room_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreated {
    pub reservation_id: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
            start_date: r.start_date,
            end_date: r.end_date,
            room_id: r.room_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
