//! Domain data structures for facilities, activity slots, and seat capacity.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a facility (court, field) known to the backend.
pub struct FacilityId(pub i64);

impl fmt::Display for FacilityId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Free vs. total seat counts for a bookable slot.
pub struct Capacity {
    /// Seats still available.
    pub free: u32,
    /// Total seats the slot offers.
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A bookable time window at a facility, as shown in the activity list.
///
/// Activities are immutable snapshots: each poll cycle replaces the whole
/// list, nothing is mutated in place.
pub struct Activity {
    /// Facility offering the slot.
    pub facility: FacilityId,
    /// Facility display name, whitespace-trimmed.
    pub facility_name: String,
    /// Start of the slot (facility-local wall clock).
    pub start: NaiveDateTime,
    /// End of the slot (facility-local wall clock).
    pub end: NaiveDateTime,
    /// Seat availability for the slot.
    pub capacity: Capacity,
}

impl Activity {
    /// Time window used when requesting participants for this slot.
    #[must_use]
    pub fn window(&self) -> SlotWindow {
        SlotWindow {
            facility: self.facility,
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Exact facility/time key identifying one slot for occupation lookups.
pub struct SlotWindow {
    /// Facility the slot belongs to.
    pub facility: FacilityId,
    /// Start of the window (inclusive).
    pub start: NaiveDateTime,
    /// End of the window (inclusive).
    pub end: NaiveDateTime,
}
