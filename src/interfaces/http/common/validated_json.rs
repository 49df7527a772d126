//! Request body extractor
//!
//! Bodies that do not deserialize (bad JSON, a missing field, a date that
//! is not `YYYY-MM-DD`) are answered with 400. Bodies that deserialize but
//! break a `validator` rule become `DomainError::Validation` and go through
//! [`domain_error`], so they get the same 422 envelope as any other
//! rejected booking input.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::{domain_error, ApiError, ApiResponse};
use crate::domain::DomainError;

/// `Json<T>` followed by `T::validate()`.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError<()>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(malformed_body)?;

        value
            .validate()
            .map_err(|errors| domain_error(DomainError::Validation(describe(&errors))))?;

        Ok(Self(value))
    }
}

fn malformed_body(rejection: JsonRejection) -> ApiError<()> {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(format!(
            "malformed request body: {}",
            rejection.body_text()
        ))),
    )
}

/// One line per failed rule, sorted, joined with `"; "`.
///
/// Rules on the booking DTOs carry messages written for the client
/// ("phone is required"), which are used as-is. A rule without one is
/// reported as `<wireField>: <code>`.
fn describe(errors: &ValidationErrors) -> String {
    let mut lines: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None if *field == "__all__" => e.code.to_string(),
                None => format!("{}: {}", wire_name(field), e.code),
            })
        })
        .collect();

    if lines.is_empty() {
        return "invalid request".to_string();
    }
    lines.sort();
    lines.dedup();
    lines.join("; ")
}

/// `room_id` -> `roomId`, matching the camelCase request bodies.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
