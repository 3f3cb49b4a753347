use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validity of an issued ticket. Cancelling a confirmed booking voids its
/// ticket; a dispute freezes it pending resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketValidity {
    Valid,
    Void,
    Frozen,
}

/// Proof-of-reservation token, minted at most once per booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub booking_id: Uuid,
    /// Opaque, globally unique reference.
    pub reference: String,
    pub validity: TicketValidity,
}
