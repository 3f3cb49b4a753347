use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{create_cors_layer, security_headers};
use crate::engine::ReservationEngine;
use crate::handlers::{bookings, health_check, users, venues};

pub fn create_routes(engine: Arc<ReservationEngine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/venues",
            post(venues::create_venue).get(venues::list_venues),
        )
        .route("/venues/:id", get(venues::get_venue))
        .route(
            "/venues/:id/reviews",
            get(venues::get_venue_reviews).post(venues::submit_review),
        )
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/confirm", post(bookings::confirm_booking))
        .route("/bookings/:id/cancel", post(bookings::cancel_booking))
        .route("/bookings/:id/dispute", post(bookings::dispute_booking))
        .route("/users/:id/profile", get(users::get_user_profile))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(axum::middleware::from_fn(security_headers))
        .layer(create_cors_layer())
        .with_state(engine)
}
