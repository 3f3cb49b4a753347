use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::{NewVenue, ReservationEngine};
use crate::handlers::require_user;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub capacity: i32,
    pub base_price: Decimal,
    #[serde(default)]
    pub sustainability_score: i32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub virtual_tour_url: Option<String>,
}

pub async fn create_venue(
    State(engine): State<Arc<ReservationEngine>>,
    Json(req): Json<CreateVenueRequest>,
) -> Response {
    let new = NewVenue {
        name: req.name,
        capacity: req.capacity,
        base_price: req.base_price,
        sustainability_score: req.sustainability_score,
        features: req.features,
        virtual_tour_url: req.virtual_tour_url,
    };

    match engine.create_venue(new) {
        Ok(venue) => created(venue, "Venue created").into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_venues(State(engine): State<Arc<ReservationEngine>>) -> Response {
    success(engine.list_venues(), "Venues retrieved").into_response()
}

pub async fn get_venue(
    State(engine): State<Arc<ReservationEngine>>,
    Path(venue_id): Path<Uuid>,
) -> Response {
    match engine.get_venue(venue_id) {
        Ok(venue) => success(venue, "Venue retrieved").into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_venue_reviews(
    State(engine): State<Arc<ReservationEngine>>,
    Path(venue_id): Path<Uuid>,
) -> Response {
    match engine.get_venue_reviews(venue_id) {
        Ok(reviews) => success(reviews, "Reviews retrieved").into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Deserialize)]
pub struct SubmitReviewRequest {
    pub rating: i32,
    pub comment: String,
}

#[derive(Serialize)]
struct ReviewSubmitted {
    review_id: Uuid,
    verified: bool,
}

pub async fn submit_review(
    State(engine): State<Arc<ReservationEngine>>,
    headers: HeaderMap,
    Path(venue_id): Path<Uuid>,
    Json(req): Json<SubmitReviewRequest>,
) -> Response {
    let requester = match require_user(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    match engine.submit_review(venue_id, req.rating, req.comment, requester) {
        Ok(review) => created(
            ReviewSubmitted {
                review_id: review.id,
                verified: review.verified,
            },
            "Review submitted",
        )
        .into_response(),
        Err(err) => err.into_response(),
    }
}
