//! Inbound interaction events.
//!
//! The host's gesture layer translates taps, double taps, long presses, and
//! swipe ticks on calendar elements into [`InteractionEvent`]s; the engine
//! decides what (if anything) they change.

use crate::date::CalendarDate;

/// The calendar element an interaction landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarElement {
    /// A date cell or a year/decade marker.
    #[default]
    Cell,
    /// The header showing the displayed period.
    Header,
    /// A week-number cell. Interactions here are defined no-ops.
    WeekNumber,
}

/// The gesture kind the host recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureKind {
    #[default]
    Tap,
    DoubleTap,
    LongPress,
    /// One tick of an in-progress swipe/drag gesture.
    SwipeTick,
}

/// One interaction delivered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    /// The date (or marker representative date) under the gesture.
    pub date: CalendarDate,
    /// The element the gesture landed on.
    pub element: CalendarElement,
    /// The recognized gesture.
    pub gesture: GestureKind,
}

impl InteractionEvent {
    /// Create an event from its parts.
    pub fn new(date: CalendarDate, element: CalendarElement, gesture: GestureKind) -> Self {
        Self {
            date,
            element,
            gesture,
        }
    }

    /// A tap on a date cell.
    pub fn tap(date: CalendarDate) -> Self {
        Self::new(date, CalendarElement::Cell, GestureKind::Tap)
    }

    /// A double tap on a date cell.
    pub fn double_tap(date: CalendarDate) -> Self {
        Self::new(date, CalendarElement::Cell, GestureKind::DoubleTap)
    }

    /// A long press on a date cell.
    pub fn long_press(date: CalendarDate) -> Self {
        Self::new(date, CalendarElement::Cell, GestureKind::LongPress)
    }

    /// A swipe tick over a date cell.
    pub fn swipe_tick(date: CalendarDate) -> Self {
        Self::new(date, CalendarElement::Cell, GestureKind::SwipeTick)
    }

    /// A tap on the header.
    pub fn header_tap(date: CalendarDate) -> Self {
        Self::new(date, CalendarElement::Header, GestureKind::Tap)
    }
}
