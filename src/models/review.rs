use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only venue review. `verified` is set only when the author holds a
/// completed booking for the reviewed venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    /// 1-5.
    pub rating: i32,
    pub comment: String,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub timestamp: DateTime<Utc>,
    pub verified: bool,
}
