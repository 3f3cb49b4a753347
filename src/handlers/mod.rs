use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod bookings;
pub mod users;
pub mod venues;

/// Header carrying the caller identity. Authentication happens upstream;
/// the engine trusts what the transport layer hands it.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "venuebook-api",
    };

    success(payload, "Health check successful").into_response()
}

/// Extracts the caller identity from the `X-User-Id` header.
pub(crate) fn require_user(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::AuthError("Missing X-User-Id header".to_string()))?;
    let value = value
        .to_str()
        .map_err(|_| AppError::AuthError("Malformed X-User-Id header".to_string()))?;
    Uuid::parse_str(value)
        .map_err(|_| AppError::AuthError("X-User-Id is not a valid UUID".to_string()))
}
