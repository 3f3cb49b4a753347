//! The booking lifecycle & reservation engine.
//!
//! The engine is the single source of truth for venues, bookings, reviews
//! and profiles. Per-venue and per-booking mutual exclusion comes from the
//! lock tables; the stores themselves only guard their own maps. Lock order
//! is always booking-lock before venue-lock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Review, Ticket, UserProfile, Venue};
use crate::utils::error::AppError;

pub mod lifecycle;
pub mod locks;
pub mod slots;
pub mod store;
pub mod tickets;

use lifecycle::{transition, BookingEvent, SideEffect};
use locks::LockTable;
use slots::TimeSlotIndex;
use store::{BookingStore, ProfileStore, ReviewLog, VenueRegistry};
use tickets::TicketIssuer;

/// Awarded when a booking reaches `completed`.
const LOYALTY_POINTS_PER_COMPLETED: i64 = 10;

/// Fields accepted by the administrative venue import.
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub name: String,
    pub capacity: i32,
    pub base_price: Decimal,
    pub sustainability_score: i32,
    pub features: Vec<String>,
    pub virtual_tour_url: Option<String>,
}

pub struct ReservationEngine {
    venues: VenueRegistry,
    bookings: BookingStore,
    profiles: ProfileStore,
    reviews: ReviewLog,
    slots: TimeSlotIndex,
    tickets: TicketIssuer,
    venue_locks: LockTable,
    booking_locks: LockTable,
}

impl ReservationEngine {
    pub fn new(lock_wait: Duration) -> Self {
        Self {
            venues: VenueRegistry::new(),
            bookings: BookingStore::new(),
            profiles: ProfileStore::new(),
            reviews: ReviewLog::new(),
            slots: TimeSlotIndex::new(),
            tickets: TicketIssuer::new(),
            venue_locks: LockTable::new(lock_wait),
            booking_locks: LockTable::new(lock_wait),
        }
    }

    // ------------------------------------------------------------------
    // Venues
    // ------------------------------------------------------------------

    /// Administrative venue import. Venues are immutable afterwards except
    /// for the rating aggregate.
    pub fn create_venue(&self, new: NewVenue) -> Result<Venue, AppError> {
        if new.name.trim().is_empty() {
            return Err(AppError::ValidationError("venue name is required".into()));
        }
        if new.capacity <= 0 {
            return Err(AppError::ValidationError(
                "capacity must be positive".into(),
            ));
        }
        if new.base_price.is_sign_negative() {
            return Err(AppError::ValidationError(
                "base price must be non-negative".into(),
            ));
        }
        if !(0..=100).contains(&new.sustainability_score) {
            return Err(AppError::ValidationError(
                "sustainability score must be between 0 and 100".into(),
            ));
        }

        let venue = Venue {
            id: Uuid::new_v4(),
            name: new.name,
            capacity: new.capacity,
            base_price: new.base_price,
            current_rating: 0.0,
            sustainability_score: new.sustainability_score,
            features: new.features,
            virtual_tour_url: new.virtual_tour_url,
            created_at: Utc::now(),
        };
        self.venues.insert(venue.clone());
        tracing::info!(venue_id = %venue.id, name = %venue.name, "Venue imported");
        Ok(venue)
    }

    pub fn get_venue(&self, venue_id: Uuid) -> Result<Venue, AppError> {
        self.venues
            .get(venue_id)
            .ok_or_else(|| AppError::NotFound(format!("Venue '{venue_id}' was not found")))
    }

    pub fn list_venues(&self) -> Vec<Venue> {
        self.venues.list()
    }

    pub fn get_venue_reviews(&self, venue_id: Uuid) -> Result<Vec<Review>, AppError> {
        self.get_venue(venue_id)?;
        Ok(self.reviews.for_venue(venue_id))
    }

    // ------------------------------------------------------------------
    // Bookings
    // ------------------------------------------------------------------

    /// Creates a `pending` booking for [start, end) on the venue, holding
    /// the venue lock across the conflict check and the store write so no
    /// two creates can both pass the check for overlapping intervals.
    pub async fn create_booking(
        &self,
        venue_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        requester: Uuid,
    ) -> Result<Uuid, AppError> {
        // Validation happens before any lock is taken.
        if end <= start {
            return Err(AppError::ValidationError(
                "end time must be after start time".into(),
            ));
        }
        if start < Utc::now() {
            return Err(AppError::ValidationError(
                "start time must not be in the past".into(),
            ));
        }
        let venue = self.get_venue(venue_id)?;

        let booking_id = Uuid::new_v4();
        let _venue_guard = self.venue_locks.acquire(venue_id, "venue").await?;

        if self
            .slots
            .reserve(venue_id, start, end, booking_id)
            .is_err()
        {
            return Err(AppError::SlotUnavailable(format!(
                "Venue '{venue_id}' is already booked for the requested time"
            )));
        }

        let duration_hours =
            Decimal::from((end - start).num_minutes()) / Decimal::from(60);
        let booking = Booking {
            id: booking_id,
            venue_id,
            user_id: requester,
            start_time: start,
            end_time: end,
            status: BookingStatus::Pending,
            price: venue.base_price * duration_hours,
            ticket_id: None,
            created_at: Utc::now(),
        };
        self.bookings.insert(booking);
        self.profiles.append_booking(requester, booking_id);

        tracing::info!(booking_id = %booking_id, venue_id = %venue_id, "Booking created");
        Ok(booking_id)
    }

    /// Drives a `pending` booking to `confirmed`, minting its ticket.
    /// Retrying a confirm returns the already-confirmed booking with the
    /// same ticket reference.
    pub async fn confirm_booking(
        &self,
        booking_id: Uuid,
        requester: Uuid,
    ) -> Result<Booking, AppError> {
        let _booking_guard = self.booking_locks.acquire(booking_id, "booking").await?;

        let mut booking = self.get_booking(booking_id)?;
        self.check_owner(&booking, requester)?;

        // Idempotent retry: the ticket was already minted for this booking.
        if booking.status == BookingStatus::Confirmed {
            return Ok(booking);
        }

        let t = transition(booking.status, BookingEvent::Confirm)?;
        debug_assert_eq!(t.effect, SideEffect::MintTicket);

        // Mint before the status write: issuance is keyed by booking id, so
        // a crash in between is healed by re-running the confirm.
        let reference = self.tickets.issue(booking_id);
        booking.status = t.to;
        booking.ticket_id = Some(reference);
        self.bookings.insert(booking.clone());

        tracing::info!(booking_id = %booking_id, "Booking confirmed");
        Ok(booking)
    }

    /// Cancels a `pending` or `confirmed` booking, freeing its interval and
    /// voiding any issued ticket. Takes the booking lock, then the venue
    /// lock.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        requester: Uuid,
    ) -> Result<Booking, AppError> {
        let _booking_guard = self.booking_locks.acquire(booking_id, "booking").await?;

        let mut booking = self.get_booking(booking_id)?;
        self.check_owner(&booking, requester)?;

        let t = transition(booking.status, BookingEvent::Cancel)?;
        let _venue_guard = self.venue_locks.acquire(booking.venue_id, "venue").await?;

        booking.status = t.to;
        self.bookings.insert(booking.clone());
        // Both effects are idempotent; replaying them after a partial
        // failure cannot double-release or double-void.
        self.slots
            .release(booking.venue_id, booking.start_time, booking.end_time);
        if t.effect == SideEffect::ReleaseSlotAndVoidTicket {
            self.tickets.void(booking_id);
        }

        tracing::info!(booking_id = %booking_id, venue_id = %booking.venue_id, "Booking cancelled");
        Ok(booking)
    }

    /// Marks a `confirmed` booking as disputed, freezing ticket validity.
    pub async fn dispute_booking(
        &self,
        booking_id: Uuid,
        requester: Uuid,
    ) -> Result<Booking, AppError> {
        let _booking_guard = self.booking_locks.acquire(booking_id, "booking").await?;

        let mut booking = self.get_booking(booking_id)?;
        self.check_owner(&booking, requester)?;

        let t = transition(booking.status, BookingEvent::Dispute)?;
        debug_assert_eq!(t.effect, SideEffect::FreezeTicket);

        booking.status = t.to;
        self.bookings.insert(booking.clone());
        self.tickets.freeze(booking_id);

        tracing::info!(booking_id = %booking_id, "Booking disputed");
        Ok(booking)
    }

    /// Read-only lookup; never mutates.
    pub fn get_booking(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .get(booking_id)
            .ok_or_else(|| AppError::NotFound(format!("Booking '{booking_id}' was not found")))
    }

    pub fn get_ticket(&self, booking_id: Uuid) -> Option<Ticket> {
        self.tickets.get(booking_id)
    }

    /// Promotes confirmed bookings whose end time has passed to `completed`
    /// and awards loyalty points. Run periodically; a booking whose lock is
    /// contended is skipped and picked up by the next sweep. Returns the
    /// number of bookings completed.
    pub async fn sweep_elapsed(&self, now: DateTime<Utc>) -> usize {
        let mut completed = 0;
        for booking_id in self.bookings.confirmed_elapsed(now) {
            let _guard = match self.booking_locks.acquire(booking_id, "booking").await {
                Ok(guard) => guard,
                Err(_) => continue,
            };

            // Re-check under the lock; a cancel or dispute may have won.
            let Some(mut booking) = self.bookings.get(booking_id) else {
                continue;
            };
            if booking.status != BookingStatus::Confirmed || booking.end_time > now {
                continue;
            }
            let Ok(t) = transition(booking.status, BookingEvent::Elapse) else {
                continue;
            };
            debug_assert_eq!(t.effect, SideEffect::AwardLoyaltyPoints);

            booking.status = t.to;
            self.bookings.insert(booking.clone());
            self.profiles
                .award_points(booking.user_id, LOYALTY_POINTS_PER_COMPLETED);
            completed += 1;

            tracing::debug!(booking_id = %booking_id, "Booking completed");
        }
        completed
    }

    // ------------------------------------------------------------------
    // Reviews & profiles
    // ------------------------------------------------------------------

    /// Stores a review and folds its rating into the venue's running mean.
    /// `verified` is set only when the author holds a completed booking for
    /// the venue.
    pub fn submit_review(
        &self,
        venue_id: Uuid,
        rating: i32,
        comment: String,
        requester: Uuid,
    ) -> Result<Review, AppError> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::ValidationError(
                "rating must be between 1 and 5".into(),
            ));
        }
        self.get_venue(venue_id)?;

        let review = Review {
            id: Uuid::new_v4(),
            venue_id,
            user_id: requester,
            rating,
            comment,
            timestamp: Utc::now(),
            verified: self.bookings.has_completed_booking(requester, venue_id),
        };
        self.reviews.append(review.clone());
        self.venues.apply_review_rating(venue_id, rating);

        tracing::info!(review_id = %review.id, venue_id = %venue_id, verified = review.verified, "Review submitted");
        Ok(review)
    }

    pub fn get_user_profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        self.profiles
            .get(user_id)
            .ok_or_else(|| AppError::NotFound(format!("Profile for user '{user_id}' was not found")))
    }

    fn check_owner(&self, booking: &Booking, requester: Uuid) -> Result<(), AppError> {
        if booking.user_id != requester {
            return Err(AppError::Forbidden(
                "Booking belongs to a different user".into(),
            ));
        }
        Ok(())
    }
}
