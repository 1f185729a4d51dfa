//! Error types for the calendar engine.

use crate::date::CalendarSystem;

/// Result type alias for calendar engine operations.
pub type Result<T> = std::result::Result<T, AlmanacError>;

/// Errors that can occur in the calendar engine.
///
/// An invalid composition is the engine's only hard failure. Boundary
/// conditions (paging past the min/max date, toggling an absent date,
/// re-selecting the selected date) are defined no-ops and are reported as
/// absent change values, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlmanacError {
    /// A (year, month, day) triple does not exist in the target calendar
    /// system, or falls outside the system's supported span.
    ///
    /// This indicates a programming error in caller-supplied date
    /// construction; callers should fail fast rather than attempt recovery.
    #[error("date {year:04}-{month:02}-{day:02} does not exist in the {system} calendar")]
    InvalidDate {
        system: CalendarSystem,
        year: i32,
        month: u8,
        day: u8,
    },
}

impl AlmanacError {
    /// Create an invalid-date error.
    pub fn invalid_date(system: CalendarSystem, year: i32, month: u8, day: u8) -> Self {
        Self::InvalidDate {
            system,
            year,
            month,
            day,
        }
    }
}
