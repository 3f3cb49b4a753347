use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::ReservationEngine;
use crate::handlers::require_user;
use crate::utils::response::{created, success};

/// Booking creation request. Times are nanoseconds since the Unix epoch,
/// the unit the booking clients exchange.
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub venue_id: Uuid,
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(Serialize)]
struct BookingCreated {
    booking_id: Uuid,
}

pub async fn create_booking(
    State(engine): State<Arc<ReservationEngine>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Response {
    let requester = match require_user(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let start = DateTime::<Utc>::from_timestamp_nanos(req.start_time);
    let end = DateTime::<Utc>::from_timestamp_nanos(req.end_time);

    match engine
        .create_booking(req.venue_id, start, end, requester)
        .await
    {
        Ok(booking_id) => {
            created(BookingCreated { booking_id }, "Booking created").into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_booking(
    State(engine): State<Arc<ReservationEngine>>,
    Path(booking_id): Path<Uuid>,
) -> Response {
    match engine.get_booking(booking_id) {
        Ok(booking) => success(booking, "Booking retrieved").into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn confirm_booking(
    State(engine): State<Arc<ReservationEngine>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> Response {
    let requester = match require_user(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    match engine.confirm_booking(booking_id, requester).await {
        Ok(booking) => success(booking, "Booking confirmed").into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn cancel_booking(
    State(engine): State<Arc<ReservationEngine>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> Response {
    let requester = match require_user(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    match engine.cancel_booking(booking_id, requester).await {
        Ok(booking) => success(booking, "Booking cancelled").into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn dispute_booking(
    State(engine): State<Arc<ReservationEngine>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> Response {
    let requester = match require_user(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    match engine.dispute_booking(booking_id, requester).await {
        Ok(booking) => success(booking, "Booking disputed").into_response(),
        Err(err) => err.into_response(),
    }
}
