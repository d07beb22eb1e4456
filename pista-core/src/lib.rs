//! Core types and service wiring for the pista facility timetable viewer.

/// Pure name formatting helpers applied by presenters.
pub mod format;
/// Domain models and identifiers shared by all backends.
pub mod model;
/// Bundle type for plugging a backend into the service.
pub mod plugin;
/// Background poller that keeps the activity snapshot fresh.
pub mod poll;
/// Traits describing the backend interfaces.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use format::*;
pub use model::*;
pub use plugin::*;
pub use poll::*;
pub use ports::*;
pub use service::*;
