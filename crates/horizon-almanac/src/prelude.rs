//! Prelude module for Horizon Almanac.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use horizon_almanac::prelude::*;
//! ```

// ============================================================================
// Engine Facade
// ============================================================================

pub use crate::engine::{CalendarEngine, InteractionOutcome};

// ============================================================================
// Dates and Calendar Systems
// ============================================================================

pub use crate::date::{CalendarAdapter, CalendarDate, CalendarSystem};
pub use chrono::{NaiveDate, Weekday};

// ============================================================================
// Selection
// ============================================================================

pub use crate::range::{DateRange, RangeDirection};
pub use crate::selection::{SelectionChange, SelectionEngine, SelectionMode, SelectionState};

// ============================================================================
// Navigation and Windows
// ============================================================================

pub use crate::navigation::{NavigationContext, NavigationController, ViewChange};
pub use crate::window::{DatePlacement, ViewLevel, VisibleWindow, WindowEntry};

// ============================================================================
// Events and Errors
// ============================================================================

pub use crate::error::{AlmanacError, Result};
pub use crate::event::{CalendarElement, GestureKind, InteractionEvent};

// ============================================================================
// Signals
// ============================================================================

pub use horizon_almanac_core::{ConnectionId, Signal};

#[cfg(test)]
mod tests {
    #![allow(unused)]
    use super::*;

    /// Verify that all prelude exports are accessible and the types exist.
    #[test]
    fn test_prelude_types_exist() {
        let _signal: Signal<i32> = Signal::new();
        let _mode = SelectionMode::Range;
        let _direction = RangeDirection::Forward;
        let _level = ViewLevel::Decade;
        let _system = CalendarSystem::Persian;

        let adapter = CalendarAdapter::new(CalendarSystem::Gregorian);
        let _date = adapter.compose(2024, 1, 1).unwrap();
    }
}
