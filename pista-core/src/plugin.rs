//! Bundle type wiring a backend's ports into the service.

use std::sync::Arc;

use crate::ports::{OccupationPort, TimetablePort};

/// Collection of ports implementing a single timetable backend.
pub struct BackendPlugin {
    /// Implementation for fetching the weekly timetable.
    pub timetable_port: Arc<dyn TimetablePort>,
    /// Implementation for fetching participant names.
    pub occupation_port: Arc<dyn OccupationPort>,
}
