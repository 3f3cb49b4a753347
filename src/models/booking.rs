use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed status set for a booking. Serialized with the `#`-prefixed tags
/// the booking clients switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "#pending")]
    Pending,
    #[serde(rename = "#confirmed")]
    Confirmed,
    #[serde(rename = "#cancelled")]
    Cancelled,
    #[serde(rename = "#completed")]
    Completed,
    #[serde(rename = "#disputed")]
    Disputed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "#pending",
            BookingStatus::Confirmed => "#confirmed",
            BookingStatus::Cancelled => "#cancelled",
            BookingStatus::Completed => "#completed",
            BookingStatus::Disputed => "#disputed",
        }
    }
}

/// A booking record. Owned exclusively by the booking store; the time-slot
/// index holds only a derived view used for conflict queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    /// Computed at creation: venue base price x duration in hours.
    pub price: Decimal,
    /// Present once the booking has been confirmed.
    pub ticket_id: Option<String>,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub created_at: DateTime<Utc>,
}
