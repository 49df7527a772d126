//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::BookingService;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson,
};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationState {
    pub service: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/reservation",
    tag = "Reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation booked", body = ApiResponse<ReservationCreated>),
        (status = 400, description = "Malformed body or dates"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Reservation could not be stored")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationState>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationCreated>>), ApiError<ReservationCreated>> {
    let reservation_id = state
        .service
        .book_reservation(request.into())
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ReservationCreated { reservation_id },
            "reservation booked successfully",
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/reservation/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation found", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .service
        .get_reservation(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
