//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::{error, info};

use super::dto::{LoginRequest, LoginResponse, ProtectedResponse};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub jwt_config: JwtConfig,
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Malformed body"),
        (status = 422, description = "Invalid email")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let token = create_token(&request.email, &state.jwt_config).map_err(|e| {
        error!(error = %e, "token signing failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    info!(email = %request.email, "token issued");

    Ok(Json(ApiResponse::with_message(
        LoginResponse {
            email: request.email,
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_config.expiration_hours * 3600,
        },
        "logged in successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/protected-route",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller is authenticated", body = ApiResponse<ProtectedResponse>),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn protected_route(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<ProtectedResponse>> {
    Json(ApiResponse::with_message(
        ProtectedResponse { email: user.email },
        "welcome to the protected route",
    ))
}
