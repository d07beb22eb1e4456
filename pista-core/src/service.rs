//! High-level service facade combining the backend ports.

use chrono::Local;

use crate::model::{Activity, SlotWindow};
use crate::plugin::BackendPlugin;
use crate::ports::PortError;

/// Public entry point for refreshing the timetable and loading participants.
pub struct TimetableService {
    plugin: BackendPlugin,
}

impl TimetableService {
    /// Create a new service bound to the provided backend.
    #[must_use]
    pub fn new(plugin: BackendPlugin) -> Self {
        Self { plugin }
    }

    /// Fetch and normalize the current weekly timetable.
    ///
    /// Slots ending at or before the current wall-clock time are excluded.
    /// Callers are expected to keep their previous snapshot when this
    /// fails; a fetch error never invalidates already-displayed data.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request or decoding fails.
    pub async fn refresh(&self) -> Result<Vec<Activity>, PortError> {
        let now = Local::now().naive_local();
        self.plugin.timetable_port.weekly_timetable(now).await
    }

    /// Load participant names for the given slot window.
    ///
    /// Failures degrade to an empty list: the caller cannot distinguish a
    /// failed lookup from a slot with no bookings, which matches how the
    /// detail view presents it.
    pub async fn participants_for(&self, window: &SlotWindow) -> Vec<String> {
        match self.plugin.occupation_port.occupations(window).await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, facility = %window.facility, "occupation lookup failed");
                Vec::new()
            }
        }
    }
}
