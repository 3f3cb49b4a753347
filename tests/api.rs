//! Router-level tests: envelope shape, status codes, the identity header,
//! and the nanosecond timestamp boundary contract.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use venuebook_server::engine::ReservationEngine;
use venuebook_server::routes::create_routes;

fn app() -> Router {
    create_routes(Arc::new(ReservationEngine::new(Duration::from_millis(200))))
}

fn tomorrow_at(hour: u32) -> DateTime<Utc> {
    (Utc::now() + ChronoDuration::days(1))
        .with_hour(hour)
        .unwrap()
        .with_minute(0)
        .unwrap()
        .with_second(0)
        .unwrap()
        .with_nanosecond(0)
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, user: Option<Uuid>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user.to_string());
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn post_empty(uri: &str, user: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::post(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn import_venue(app: &Router) -> Uuid {
    let response = app
        .clone()
        .oneshot(post_json(
            "/venues",
            None,
            json!({
                "name": "River Loft",
                "capacity": 40,
                "base_price": 100,
                "sustainability_score": 65,
                "features": ["wifi", "projector"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    Uuid::parse_str(body["data"]["id"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("ok"));
    assert_eq!(body["data"]["service"], json!("venuebook-api"));
}

#[tokio::test]
async fn booking_flow_over_http() {
    let app = app();
    let user = Uuid::new_v4();
    let venue = import_venue(&app).await;

    let start_ns = tomorrow_at(10).timestamp_nanos_opt().unwrap();
    let end_ns = tomorrow_at(12).timestamp_nanos_opt().unwrap();

    // Create.
    let response = app
        .clone()
        .oneshot(post_json(
            "/bookings",
            Some(user),
            json!({ "venue_id": venue, "start_time": start_ns, "end_time": end_ns }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let booking_id = body["data"]["booking_id"].as_str().unwrap().to_string();

    // Read back: pending, priced at 100/hour x 2h, ns timestamps round-trip.
    let response = app
        .clone()
        .oneshot(get(&format!("/bookings/{booking_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("#pending"));
    assert_eq!(body["data"]["price"], json!("200"));
    assert_eq!(body["data"]["start_time"], json!(start_ns));
    assert_eq!(body["data"]["end_time"], json!(end_ns));

    // Conflicting create is rejected with the typed envelope.
    let response = app
        .clone()
        .oneshot(post_json(
            "/bookings",
            Some(user),
            json!({
                "venue_id": venue,
                "start_time": tomorrow_at(11).timestamp_nanos_opt().unwrap(),
                "end_time": tomorrow_at(13).timestamp_nanos_opt().unwrap(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("SLOT_UNAVAILABLE"));

    // Confirm: ticket attached; a retry returns the same reference.
    let response = app
        .clone()
        .oneshot(post_empty(
            &format!("/bookings/{booking_id}/confirm"),
            Some(user),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("#confirmed"));
    let ticket = body["data"]["ticket_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_empty(
            &format!("/bookings/{booking_id}/confirm"),
            Some(user),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["ticket_id"], json!(ticket));

    // Cancel, then the conflicting interval becomes bookable.
    let response = app
        .clone()
        .oneshot(post_empty(
            &format!("/bookings/{booking_id}/cancel"),
            Some(user),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("#cancelled"));

    let response = app
        .clone()
        .oneshot(post_json(
            "/bookings",
            Some(user),
            json!({
                "venue_id": venue,
                "start_time": tomorrow_at(11).timestamp_nanos_opt().unwrap(),
                "end_time": tomorrow_at(13).timestamp_nanos_opt().unwrap(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Booking history shows up on the profile, in creation order.
    let response = app
        .clone()
        .oneshot(get(&format!("/users/{user}/profile")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let history = body["data"]["booking_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], json!(booking_id));
}

#[tokio::test]
async fn mutating_requests_require_the_identity_header() {
    let app = app();
    let venue = import_venue(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/bookings",
            None,
            json!({ "venue_id": venue, "start_time": 0, "end_time": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("AUTH_ERROR"));

    // A garbled user id is rejected the same way.
    let response = app
        .clone()
        .oneshot(
            Request::post(format!("/bookings/{}/confirm", Uuid::new_v4()))
                .header("X-User-Id", "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reviews_are_validated_and_feed_the_venue_rating() {
    let app = app();
    let user = Uuid::new_v4();
    let venue = import_venue(&app).await;

    // Out-of-range rating.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/venues/{venue}/reviews"),
            Some(user),
            json!({ "rating": 9, "comment": "too enthusiastic" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));

    // A valid review is stored unverified (no completed booking) and moves
    // the venue's rating.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/venues/{venue}/reviews"),
            Some(user),
            json!({ "rating": 4, "comment": "bright and quiet" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["verified"], json!(false));

    let response = app
        .clone()
        .oneshot(get(&format!("/venues/{venue}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["current_rating"], json!(4.0));

    let response = app
        .clone()
        .oneshot(get(&format!("/venues/{venue}/reviews")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_resources_return_not_found() {
    let app = app();

    for uri in [
        format!("/venues/{}", Uuid::new_v4()),
        format!("/bookings/{}", Uuid::new_v4()),
        format!("/users/{}/profile", Uuid::new_v4()),
    ] {
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
    }
}

#[tokio::test]
async fn venues_are_listed_sorted_by_name() {
    let app = app();
    for name in ["Zinc Bar", "Atrium"] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/venues",
                None,
                json!({ "name": name, "capacity": 10, "base_price": 20 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.clone().oneshot(get("/venues")).await.unwrap();
    let body = body_json(response).await;
    let venues = body["data"].as_array().unwrap();
    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0]["name"], json!("Atrium"));
    assert_eq!(venues[1]["name"], json!("Zinc Bar"));
}
