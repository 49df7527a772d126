//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::BookingService;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};

use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, health, reservations, rooms};

/// State shared by every route; handlers pick their slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub auth: AuthState,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for rooms::RoomState {
    fn from_ref(s: &AppState) -> Self {
        rooms::RoomState {
            service: Arc::clone(&s.service),
        }
    }
}

impl FromRef<AppState> for reservations::ReservationState {
    fn from_ref(s: &AppState) -> Self {
        reservations::ReservationState {
            service: Arc::clone(&s.service),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            service: Arc::clone(&s.service),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            jwt_config: s.auth.jwt_config.clone(),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from POST /login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        reservations::create_reservation,
        reservations::get_reservation,
        rooms::search_availability,
        rooms::search_availability_by_room_id,
        rooms::list_rooms,
        rooms::get_room,
        auth::login,
        auth::protected_route,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            reservations::ReservationRequest,
            reservations::ReservationCreated,
            reservations::ReservationDto,
            rooms::AvailabilityRequest,
            rooms::RoomDto,
            rooms::RoomAvailabilityDto,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ProtectedResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Reservations", description = "Book a room and read reservations back"),
        (name = "Rooms", description = "Room listing and date-range availability"),
        (name = "Authentication", description = "JWT issue and protected route"),
    ),
    info(
        title = "Room Booking API",
        version = "1.0.0",
        description = "Room availability search and transactional reservations"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_api_router(
    service: Arc<BookingService>,
    jwt_config: JwtConfig,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let auth_state = AuthState { jwt_config };

    let state = AppState {
        service,
        auth: auth_state.clone(),
        started_at: Arc::new(Instant::now()),
    };

    // Protected routes
    let protected_routes = Router::new()
        .route("/protected-route", get(auth::protected_route))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Reservations
        .route("/reservation", post(reservations::create_reservation))
        .route("/reservation/{id}", get(reservations::get_reservation))
        // Rooms
        .route("/search-availability", post(rooms::search_availability))
        .route(
            "/search-availability/{id}",
            post(rooms::search_availability_by_room_id),
        )
        .route("/room", get(rooms::list_rooms))
        .route("/room/{id}", get(rooms::get_room))
        // Auth
        .route("/login", post(auth::login))
        .merge(protected_routes)
        .with_state(state);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(api_routes);

    if let Some(handle) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
