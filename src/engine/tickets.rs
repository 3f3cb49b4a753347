use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::models::{Ticket, TicketValidity};

/// Mints exactly one ticket reference per booking id. A retried confirmation
/// gets the stored reference back instead of a fresh one, which makes client
/// network retries safe.
pub struct TicketIssuer {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
}

impl TicketIssuer {
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the booking's ticket reference, minting it on first call.
    pub fn issue(&self, booking_id: Uuid) -> String {
        let mut tickets = match self.tickets.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tickets
            .entry(booking_id)
            .or_insert_with(|| Ticket {
                booking_id,
                reference: format!("TKT-{}", Uuid::new_v4()),
                validity: TicketValidity::Valid,
            })
            .reference
            .clone()
    }

    /// Voids the booking's ticket. No-op when no ticket was issued.
    pub fn void(&self, booking_id: Uuid) {
        self.set_validity(booking_id, TicketValidity::Void);
    }

    /// Freezes the booking's ticket pending dispute resolution.
    pub fn freeze(&self, booking_id: Uuid) {
        self.set_validity(booking_id, TicketValidity::Frozen);
    }

    pub fn get(&self, booking_id: Uuid) -> Option<Ticket> {
        let tickets = match self.tickets.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tickets.get(&booking_id).cloned()
    }

    fn set_validity(&self, booking_id: Uuid, validity: TicketValidity) {
        let mut tickets = match self.tickets.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(ticket) = tickets.get_mut(&booking_id) {
            ticket.validity = validity;
        }
    }
}

impl Default for TicketIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_is_idempotent_per_booking() {
        let issuer = TicketIssuer::new();
        let booking = Uuid::new_v4();

        let first = issuer.issue(booking);
        let second = issuer.issue(booking);
        assert_eq!(first, second);
    }

    #[test]
    fn references_are_unique_across_bookings() {
        let issuer = TicketIssuer::new();
        let a = issuer.issue(Uuid::new_v4());
        let b = issuer.issue(Uuid::new_v4());
        assert_ne!(a, b);
        assert!(a.starts_with("TKT-"));
    }

    #[test]
    fn void_and_freeze_update_validity() {
        let issuer = TicketIssuer::new();
        let booking = Uuid::new_v4();
        issuer.issue(booking);

        issuer.freeze(booking);
        assert_eq!(issuer.get(booking).unwrap().validity, TicketValidity::Frozen);

        issuer.void(booking);
        assert_eq!(issuer.get(booking).unwrap().validity, TicketValidity::Void);

        // Voiding never re-mints.
        issuer.void(Uuid::new_v4());
    }
}
