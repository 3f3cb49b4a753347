use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::ReservationEngine;
use crate::utils::response::success;

pub async fn get_user_profile(
    State(engine): State<Arc<ReservationEngine>>,
    Path(user_id): Path<Uuid>,
) -> Response {
    match engine.get_user_profile(user_id) {
        Ok(profile) => success(profile, "Profile retrieved").into_response(),
        Err(err) => err.into_response(),
    }
}
