use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Review, UserProfile, Venue};

macro_rules! rlock {
    ($lock:expr) => {
        match $lock.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    };
}

macro_rules! wlock {
    ($lock:expr) => {
        match $lock.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    };
}

struct VenueRecord {
    venue: Venue,
    // Running sum/count so the mean is O(1) per review.
    rating_sum: i64,
    review_count: i64,
}

/// Read-mostly registry of venue metadata. Single writer on import; the
/// only post-import mutation is the rating aggregate.
pub struct VenueRegistry {
    venues: RwLock<HashMap<Uuid, VenueRecord>>,
}

impl VenueRegistry {
    pub fn new() -> Self {
        Self {
            venues: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, venue: Venue) {
        let mut venues = wlock!(self.venues);
        venues.insert(
            venue.id,
            VenueRecord {
                venue,
                rating_sum: 0,
                review_count: 0,
            },
        );
    }

    pub fn get(&self, venue_id: Uuid) -> Option<Venue> {
        let venues = rlock!(self.venues);
        venues.get(&venue_id).map(|record| record.venue.clone())
    }

    pub fn list(&self) -> Vec<Venue> {
        let venues = rlock!(self.venues);
        let mut all: Vec<Venue> = venues.values().map(|record| record.venue.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Folds a new review rating into the venue's running mean. Returns the
    /// updated rating, or `None` for an unknown venue.
    pub fn apply_review_rating(&self, venue_id: Uuid, rating: i32) -> Option<f64> {
        let mut venues = wlock!(self.venues);
        let record = venues.get_mut(&venue_id)?;
        record.rating_sum += i64::from(rating);
        record.review_count += 1;
        record.venue.current_rating = record.rating_sum as f64 / record.review_count as f64;
        Some(record.venue.current_rating)
    }
}

/// Durable record of every booking, keyed by booking id. Sole owner of
/// booking data; everything else holds derived views.
pub struct BookingStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, booking: Booking) {
        let mut bookings = wlock!(self.bookings);
        bookings.insert(booking.id, booking);
    }

    pub fn get(&self, booking_id: Uuid) -> Option<Booking> {
        let bookings = rlock!(self.bookings);
        bookings.get(&booking_id).cloned()
    }

    /// Ids of confirmed bookings whose end time has passed.
    pub fn confirmed_elapsed(&self, now: DateTime<Utc>) -> Vec<Uuid> {
        let bookings = rlock!(self.bookings);
        bookings
            .values()
            .filter(|b| b.status == BookingStatus::Confirmed && b.end_time <= now)
            .map(|b| b.id)
            .collect()
    }

    /// Whether the user holds at least one completed booking for the venue.
    pub fn has_completed_booking(&self, user_id: Uuid, venue_id: Uuid) -> bool {
        let bookings = rlock!(self.bookings);
        bookings.values().any(|b| {
            b.user_id == user_id && b.venue_id == venue_id && b.status == BookingStatus::Completed
        })
    }
}

/// Lazily-created user profiles with insertion-ordered booking history.
pub struct ProfileStore {
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, user_id: Uuid) -> Option<UserProfile> {
        let profiles = rlock!(self.profiles);
        profiles.get(&user_id).cloned()
    }

    pub fn append_booking(&self, user_id: Uuid, booking_id: Uuid) {
        let mut profiles = wlock!(self.profiles);
        profiles
            .entry(user_id)
            .or_insert_with(|| UserProfile::new(user_id))
            .booking_history
            .push(booking_id);
    }

    pub fn award_points(&self, user_id: Uuid, points: i64) {
        let mut profiles = wlock!(self.profiles);
        profiles
            .entry(user_id)
            .or_insert_with(|| UserProfile::new(user_id))
            .loyalty_points += points;
    }
}

/// Append-only review log, grouped by venue.
pub struct ReviewLog {
    reviews: RwLock<HashMap<Uuid, Vec<Review>>>,
}

impl ReviewLog {
    pub fn new() -> Self {
        Self {
            reviews: RwLock::new(HashMap::new()),
        }
    }

    pub fn append(&self, review: Review) {
        let mut reviews = wlock!(self.reviews);
        reviews.entry(review.venue_id).or_default().push(review);
    }

    pub fn for_venue(&self, venue_id: Uuid) -> Vec<Review> {
        let reviews = rlock!(self.reviews);
        reviews.get(&venue_id).cloned().unwrap_or_default()
    }
}
