//! Traits describing backend capabilities and the shared error type.

use async_trait::async_trait;
use chrono::{NaiveDateTime, ParseError as ChronoParseError};
use reqwest::Error as ReqwestError;

use crate::model::{Activity, SlotWindow};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the timetable backend.
pub enum PortError {
    /// Network layer failed, including non-2xx statuses and body decoding.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Failed to parse a timestamp from the backend response.
    #[error("Parse error: {0}")]
    Parse(#[from] ChronoParseError),
    /// Internal backend error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Trait for backends serving the weekly facility timetable.
pub trait TimetablePort: Send + Sync {
    /// Fetch the weekly timetable and normalize it to an activity list.
    ///
    /// The result contains only slots that are still open, carry a defined
    /// capacity, and end strictly after `now`; it is sorted ascending by
    /// start time with ties kept in encounter order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the response does
    /// not match any supported schema shape.
    async fn weekly_timetable(&self, now: NaiveDateTime) -> Result<Vec<Activity>, PortError>;
}

#[async_trait]
/// Trait for backends serving booking occupations (participant names).
pub trait OccupationPort: Send + Sync {
    /// Fetch participant names for the exact slot window, in booking order.
    ///
    /// Names are returned raw; display formatting is left to presenters.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn occupations(&self, window: &SlotWindow) -> Result<Vec<String>, PortError>;
}
