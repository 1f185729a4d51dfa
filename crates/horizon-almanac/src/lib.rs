//! Horizon Almanac - calendar selection & navigation engine.
//!
//! This crate is the decision core of a calendar control, with no rendering
//! attached:
//!
//! - **Calendar Adapter**: date decomposition/composition across seven
//!   calendar systems (Gregorian, Hijri, Persian, UmAlQura, Korean, Taiwan,
//!   ThaiBuddhist)
//! - **Visible Window**: the dates or markers to show for
//!   Month/Year/Decade/Century views, with leading/trailing padding rules
//! - **Selection Engine**: Single/Multiple/Range/MultiRange selection with
//!   five interchangeable range-direction policies
//! - **Navigation Controller**: drill up/down and forward/backward paging
//!   with min/max boundary validation
//!
//! The engine is synchronous and single-threaded: one interaction produces
//! one state mutation and one set of change notifications before control
//! returns to the caller. Hosts confine an engine instance to a single
//! logical owner; shared read access between events is safe.
//!
//! # Example
//!
//! ```
//! use horizon_almanac::prelude::*;
//!
//! let mut engine = CalendarEngine::new(CalendarSystem::Gregorian)
//!     .with_selection_mode(SelectionMode::Range)
//!     .with_range_direction(RangeDirection::Default);
//!
//! let start = engine.adapter().compose(2024, 3, 10).unwrap();
//! let end = engine.adapter().compose(2024, 3, 5).unwrap();
//! engine.handle_interaction(&InteractionEvent::tap(start)).unwrap();
//! engine.handle_interaction(&InteractionEvent::tap(end)).unwrap();
//!
//! let range = engine.selection_state().selected_range().unwrap();
//! assert_eq!(range.start().unwrap().day(), 5);
//! assert_eq!(range.end().unwrap().day(), 10);
//! ```

pub mod date;
pub mod engine;
pub mod error;
pub mod event;
pub mod navigation;
pub mod prelude;
pub mod range;
pub mod selection;
pub mod window;

pub use date::{CalendarAdapter, CalendarDate, CalendarSystem};
pub use engine::{CalendarEngine, InteractionOutcome};
pub use error::{AlmanacError, Result};
pub use event::{CalendarElement, GestureKind, InteractionEvent};
pub use navigation::{NavigationContext, NavigationController, ViewChange};
pub use range::{DateRange, RangeDirection};
pub use selection::{SelectionChange, SelectionEngine, SelectionMode, SelectionState};
pub use window::{DatePlacement, ViewLevel, VisibleWindow, WindowEntry, compute_window};

pub use horizon_almanac_core::{ConnectionGuard, ConnectionId, Signal};

// Re-export chrono types that users need for configuration and timeline
// interop.
pub use chrono::{NaiveDate, Weekday};
