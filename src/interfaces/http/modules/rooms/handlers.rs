//! Room and availability HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::application::BookingService;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};

use super::dto::*;

/// Application state for room handlers.
#[derive(Clone)]
pub struct RoomState {
    pub service: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/search-availability",
    tag = "Rooms",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Rooms free for the whole window", body = ApiResponse<Vec<RoomDto>>),
        (status = 400, description = "Malformed body or dates"),
        (status = 404, description = "Search failed"),
        (status = 422, description = "endDate not after startDate")
    )
)]
pub async fn search_availability(
    State(state): State<RoomState>,
    ValidatedJson(req): ValidatedJson<AvailabilityRequest>,
) -> ApiResult<Vec<RoomDto>> {
    let rooms = state
        .service
        .search_rooms(req.start_date, req.end_date)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::with_message(
        rooms.into_iter().map(RoomDto::from).collect(),
        "rooms retrieved successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/search-availability/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availability of one room", body = ApiResponse<RoomAvailabilityDto>),
        (status = 400, description = "Malformed body, dates or id"),
        (status = 404, description = "Lookup failed"),
        (status = 422, description = "endDate not after startDate")
    )
)]
pub async fn search_availability_by_room_id(
    State(state): State<RoomState>,
    Path(room_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<AvailabilityRequest>,
) -> ApiResult<RoomAvailabilityDto> {
    let available = state
        .service
        .check_room_availability(req.start_date, req.end_date, room_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::with_message(
        RoomAvailabilityDto {
            room_id,
            start_date: req.start_date,
            end_date: req.end_date,
            available,
        },
        "room retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/room",
    tag = "Rooms",
    params(RoomQuery),
    responses(
        (status = 200, description = "Matching rooms", body = ApiResponse<Vec<RoomDto>>),
        (status = 404, description = "Listing failed")
    )
)]
pub async fn list_rooms(
    State(state): State<RoomState>,
    Query(query): Query<RoomQuery>,
) -> ApiResult<Vec<RoomDto>> {
    let rooms = state
        .service
        .list_rooms(&query.into())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::with_message(
        rooms.into_iter().map(RoomDto::from).collect(),
        "rooms retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/room/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room found", body = ApiResponse<RoomDto>),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(State(state): State<RoomState>, Path(id): Path<i32>) -> ApiResult<RoomDto> {
    let room = state.service.get_room(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::with_message(
        RoomDto::from(room),
        "room retrieved successfully",
    )))
}
