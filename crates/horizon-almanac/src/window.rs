//! View levels and visible-window computation.
//!
//! The visible window is the ordered sequence of dates (or year/decade
//! markers) a calendar view shows for a given display date. It is
//! recomputed, never mutated: every navigation or configuration change
//! produces a fresh [`VisibleWindow`].
//!
//! - Month view: `visible_weeks * 7` consecutive dates starting from the
//!   first occurrence of the configured first-day-of-week on or before the
//!   first day of the display month. Out-of-month dates are tagged
//!   leading/trailing only for the full 6-week grid; partial grids never
//!   synthesize out-of-month filler.
//! - Year view: 12 month markers.
//! - Decade/Century view: 10 year/decade markers plus one leading and one
//!   trailing marker.
//!
//! Windows that would cross the calendar system's supported span are
//! truncated at the bound instead of underflowing.

use chrono::{Datelike, Duration, Weekday};

use crate::date::{CalendarAdapter, CalendarDate};
use crate::error::Result;
use crate::navigation::NavigationContext;

/// The granularity currently displayed.
///
/// Drill-up moves Month → Year → Decade → Century; drill-down is the
/// reverse. Each level implies a selection unit one step finer than the
/// level itself: days in Month view, months in Year view, years in Decade
/// view, decades in Century view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewLevel {
    /// Day grid of one month.
    #[default]
    Month,
    /// Month markers of one year.
    Year,
    /// Year markers of one decade.
    Decade,
    /// Decade markers of one century.
    Century,
}

/// First year of the decade containing `year`.
pub(crate) fn decade_floor(year: i32) -> i32 {
    year - year.rem_euclid(10)
}

/// First year of the century containing `year`.
pub(crate) fn century_floor(year: i32) -> i32 {
    year - year.rem_euclid(100)
}

impl ViewLevel {
    /// The next coarser level, or `None` at Century.
    pub fn drill_up(self) -> Option<ViewLevel> {
        match self {
            Self::Month => Some(Self::Year),
            Self::Year => Some(Self::Decade),
            Self::Decade => Some(Self::Century),
            Self::Century => None,
        }
    }

    /// The next finer level, or `None` at Month.
    pub fn drill_down(self) -> Option<ViewLevel> {
        match self {
            Self::Month => None,
            Self::Year => Some(Self::Month),
            Self::Decade => Some(Self::Year),
            Self::Century => Some(Self::Decade),
        }
    }

    /// First day of the selection unit containing `date` at this level.
    pub fn unit_start(self, adapter: &CalendarAdapter, date: &CalendarDate) -> Result<CalendarDate> {
        match self {
            Self::Month => Ok(*date),
            Self::Year => adapter.first_of_month(date),
            Self::Decade => adapter.first_of_year(date.year()),
            Self::Century => adapter.first_of_year(decade_floor(date.year())),
        }
    }

    /// Last day of the selection unit containing `date` at this level.
    ///
    /// Selecting a year in Decade view therefore yields an end on the last
    /// day of that year, a decade in Century view on the last day of the
    /// decade's final year.
    pub fn unit_end(self, adapter: &CalendarAdapter, date: &CalendarDate) -> Result<CalendarDate> {
        match self {
            Self::Month => Ok(*date),
            Self::Year => adapter.last_of_month(date),
            Self::Decade => adapter.last_of_year(date.year()),
            Self::Century => adapter.last_of_year(decade_floor(date.year()) + 9),
        }
    }

    /// Whether two dates fall into the same selection unit at this level.
    ///
    /// This is the calendar-aware equality used by selection operations:
    /// day granularity in Month view, month in Year view, year in Decade
    /// view, decade in Century view.
    pub fn same_unit(self, a: &CalendarDate, b: &CalendarDate) -> bool {
        match self {
            Self::Month => a.iso() == b.iso(),
            Self::Year => a.year() == b.year() && a.month() == b.month(),
            Self::Decade => a.year() == b.year(),
            Self::Century => decade_floor(a.year()) == decade_floor(b.year()),
        }
    }
}

/// Whether a window entry belongs to the displayed period or pads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePlacement {
    /// Belongs to the period before the displayed one.
    Leading,
    /// Belongs to the displayed period.
    Current,
    /// Belongs to the period after the displayed one.
    Trailing,
}

/// One entry of a visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    /// The date, or the representative (first) date of a marker.
    pub date: CalendarDate,
    /// Whether the entry pads the displayed period.
    pub placement: DatePlacement,
}

impl WindowEntry {
    fn new(date: CalendarDate, placement: DatePlacement) -> Self {
        Self { date, placement }
    }

    /// Whether this entry belongs to the displayed period.
    pub fn is_current(&self) -> bool {
        self.placement == DatePlacement::Current
    }
}

/// The ordered sequence of dates (or markers) a view shows.
///
/// Immutable once computed; navigation and configuration changes produce a
/// new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleWindow {
    level: ViewLevel,
    entries: Vec<WindowEntry>,
}

impl VisibleWindow {
    /// The view level this window was computed for.
    pub fn level(&self) -> ViewLevel {
        self.level
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[WindowEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, if any.
    pub fn first(&self) -> Option<&WindowEntry> {
        self.entries.first()
    }

    /// Last entry, if any.
    pub fn last(&self) -> Option<&WindowEntry> {
        self.entries.last()
    }

    /// Entries belonging to the displayed period.
    pub fn current(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter().filter(|e| e.is_current())
    }

    /// First entry belonging to the displayed period.
    pub fn first_current(&self) -> Option<CalendarDate> {
        self.current().next().map(|e| e.date)
    }

    /// Last entry belonging to the displayed period.
    pub fn last_current(&self) -> Option<CalendarDate> {
        self.current().last().map(|e| e.date)
    }

    /// Whether any entry covers `date` at this window's unit granularity.
    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.entries
            .iter()
            .any(|e| self.level.same_unit(&e.date, date))
    }

    /// Whether a "current" entry covers `date` at this window's unit
    /// granularity.
    pub fn contains_current(&self, date: &CalendarDate) -> bool {
        self.current().any(|e| self.level.same_unit(&e.date, date))
    }

    /// ISO week numbers, one per displayed week row.
    ///
    /// Only meaningful at Month level; empty otherwise.
    pub fn week_numbers(&self) -> Vec<u32> {
        if self.level != ViewLevel::Month {
            return Vec::new();
        }
        self.entries
            .chunks(7)
            .filter_map(|row| row.first())
            .map(|e| e.date.iso().iso_week().week())
            .collect()
    }
}

/// Offset in days from `first_day_of_week` to `day`, in 0..7.
fn weekday_offset(day: Weekday, first_day_of_week: Weekday) -> i64 {
    let first = first_day_of_week.num_days_from_sunday();
    let this = day.num_days_from_sunday();
    i64::from((this + 7 - first) % 7)
}

/// Compute the visible window for a navigation context.
///
/// The window starts/ends at the calendar system's supported bound when the
/// computed span would cross it.
pub fn compute_window(context: &NavigationContext, adapter: &CalendarAdapter) -> VisibleWindow {
    let entries = match context.level {
        ViewLevel::Month => month_entries(context, adapter),
        ViewLevel::Year => year_entries(context, adapter),
        ViewLevel::Decade => decade_entries(context, adapter),
        ViewLevel::Century => century_entries(context, adapter),
    };
    tracing::trace!(
        target: "horizon_almanac::window",
        level = ?context.level,
        display = %context.display_date,
        entries = entries.len(),
        "computed visible window"
    );
    VisibleWindow {
        level: context.level,
        entries,
    }
}

fn month_entries(context: &NavigationContext, adapter: &CalendarAdapter) -> Vec<WindowEntry> {
    let display = context.display_date;
    let first = adapter.first_of_month(&display).unwrap_or(display);
    let offset = weekday_offset(first.weekday(), context.first_day_of_week);

    let min_iso = adapter.min_supported().iso();
    let max_iso = adapter.max_supported().iso();
    let start = (first.iso() - Duration::days(offset)).max(min_iso);

    let tag_padding = context.visible_weeks == 6;
    let count = usize::from(context.visible_weeks) * 7;

    let mut entries = Vec::with_capacity(count);
    let mut iso = start;
    while entries.len() < count && iso <= max_iso {
        let date = adapter.from_iso(iso);
        let placement = if !tag_padding {
            DatePlacement::Current
        } else if date.year() == display.year() && date.month() == display.month() {
            DatePlacement::Current
        } else if iso < first.iso() {
            DatePlacement::Leading
        } else {
            DatePlacement::Trailing
        };
        entries.push(WindowEntry::new(date, placement));
        match iso.succ_opt() {
            Some(next) => iso = next,
            None => break,
        }
    }
    entries
}

fn year_entries(context: &NavigationContext, adapter: &CalendarAdapter) -> Vec<WindowEntry> {
    let year = context.display_date.year();
    (1..=adapter.months_in_year(year))
        .filter_map(|month| adapter.compose(year, month, 1).ok())
        .map(|date| WindowEntry::new(date, DatePlacement::Current))
        .collect()
}

fn decade_entries(context: &NavigationContext, adapter: &CalendarAdapter) -> Vec<WindowEntry> {
    let floor = decade_floor(context.display_date.year());
    (floor - 1..=floor + 10)
        .filter_map(|year| {
            let placement = if year < floor {
                DatePlacement::Leading
            } else if year > floor + 9 {
                DatePlacement::Trailing
            } else {
                DatePlacement::Current
            };
            marker_for_year(adapter, year).map(|date| WindowEntry::new(date, placement))
        })
        .collect()
}

fn century_entries(context: &NavigationContext, adapter: &CalendarAdapter) -> Vec<WindowEntry> {
    let floor = century_floor(context.display_date.year());
    (-1..=10)
        .filter_map(|i| {
            let decade = floor + i * 10;
            let placement = if i < 0 {
                DatePlacement::Leading
            } else if i > 9 {
                DatePlacement::Trailing
            } else {
                DatePlacement::Current
            };
            marker_for_year(adapter, decade).map(|date| WindowEntry::new(date, placement))
        })
        .collect()
}

/// Representative marker date for a year, truncated to the supported span.
///
/// A year partially inside the span (the epoch year of a bounded calendar)
/// is represented by the span bound itself rather than dropped.
fn marker_for_year(adapter: &CalendarAdapter, year: i32) -> Option<CalendarDate> {
    if let Ok(date) = adapter.first_of_year(year) {
        return Some(date);
    }
    let min = adapter.min_supported();
    let max = adapter.max_supported();
    if year == min.year() {
        Some(min)
    } else if year == max.year() {
        Some(max)
    } else {
        None
    }
}

static_assertions::assert_impl_all!(VisibleWindow: Send, Sync);
