use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// A reserved half-open interval [start, end) on a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub booking_id: Uuid,
}

/// Returned when a requested interval intersects an active reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// Per-venue interval index answering "does [start, end) overlap any active
/// reservation?". Holds only a derived view (venue id -> interval -> booking
/// id); the booking store stays the owner of authoritative data.
///
/// Each venue's slots are kept disjoint and sorted by start time, so a
/// reserve only has to binary-search the insertion point and inspect its two
/// neighbors. Callers serialize mutations per venue; the interior lock only
/// guards the map itself.
pub struct TimeSlotIndex {
    venues: RwLock<HashMap<Uuid, Vec<Slot>>>,
}

impl TimeSlotIndex {
    pub fn new() -> Self {
        Self {
            venues: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts [start, end) for `venue_id` unless it overlaps an existing
    /// slot, using the half-open test `a.start < b.end && b.start < a.end`.
    pub fn reserve(
        &self,
        venue_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        booking_id: Uuid,
    ) -> Result<(), Conflict> {
        let mut venues = match self.venues.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let slots = venues.entry(venue_id).or_default();

        let idx = match slots.binary_search_by_key(&start, |slot| slot.start) {
            // Identical start time always overlaps (intervals are non-empty).
            Ok(_) => return Err(Conflict),
            Err(idx) => idx,
        };
        if idx > 0 && slots[idx - 1].end > start {
            return Err(Conflict);
        }
        if idx < slots.len() && slots[idx].start < end {
            return Err(Conflict);
        }

        slots.insert(
            idx,
            Slot {
                start,
                end,
                booking_id,
            },
        );
        Ok(())
    }

    /// Removes the slot matching [start, end) exactly. A no-op when the slot
    /// is absent, so a release replayed during recovery is harmless.
    pub fn release(&self, venue_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) {
        let mut venues = match self.venues.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(slots) = venues.get_mut(&venue_id) {
            if let Ok(idx) = slots.binary_search_by_key(&start, |slot| slot.start) {
                if slots[idx].end == end {
                    slots.remove(idx);
                }
            }
            if slots.is_empty() {
                venues.remove(&venue_id);
            }
        }
    }

    /// Number of active slots for a venue.
    pub fn active_count(&self, venue_id: Uuid) -> usize {
        let venues = match self.venues.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        venues.get(&venue_id).map_or(0, Vec::len)
    }
}

impl Default for TimeSlotIndex {
    fn default() -> Self {
        Self::new()
    }
}
