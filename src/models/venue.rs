use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Venue metadata. Immutable after import except `current_rating`, which the
/// engine recomputes whenever a review is added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    /// Base price per hour.
    pub base_price: Decimal,
    /// Arithmetic mean over all reviews, 0.0 when unreviewed.
    pub current_rating: f64,
    /// 0-100.
    pub sustainability_score: i32,
    pub features: Vec<String>,
    pub virtual_tour_url: Option<String>,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub created_at: DateTime<Utc>,
}
