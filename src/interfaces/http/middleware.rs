//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domain::DomainError;
use crate::infrastructure::crypto::jwt::{verify_token, AuthError, Claims, JwtConfig};
use crate::interfaces::http::common::domain_error;

/// Authentication state
#[derive(Clone, Debug)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity taken from a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub email: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims) -> Self {
        Self { email: claims.sub }
    }
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware - requires valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) if claims.is_expired() => auth_error_response(AuthError::ExpiredToken),
        Ok(claims) => {
            let user = AuthenticatedUser::from_claims(claims);
            debug!(email = %user.email, "request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Reject the request as unauthenticated
fn auth_error_response(error: AuthError) -> Response {
    debug!(error = %error, "request rejected");
    domain_error::<()>(DomainError::Unauthorized(error.to_string())).into_response()
}
