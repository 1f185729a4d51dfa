//! Date ranges and range-direction policies.
//!
//! A [`DateRange`] holds up to two endpoints; a range with only a start is
//! "pending" and waits for a second interaction to resolve it. The five
//! [`RangeDirection`] policies decide how a single interacted date mutates
//! an existing range. Policies are a closed set selected once per
//! configuration change, not re-branched per call site.
//!
//! Every policy normalizes endpoints to the selection unit implied by the
//! active view level: the start becomes the first day of the interacted
//! unit and the end its last day, so selecting a year in Decade view
//! produces an end on the last day of that year.

use crate::date::{CalendarAdapter, CalendarDate};
use crate::error::Result;
use crate::window::ViewLevel;

/// A two-endpoint date range.
///
/// Invariant: whenever both endpoints are set by a policy, `start <= end`
/// chronologically after unit normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    start: Option<CalendarDate>,
    end: Option<CalendarDate>,
}

impl DateRange {
    /// A range with no endpoints.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A pending range: start set, end missing.
    pub fn pending(start: CalendarDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// A resolved range with both endpoints.
    pub fn resolved(start: CalendarDate, end: CalendarDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Start endpoint, if set.
    pub fn start(&self) -> Option<CalendarDate> {
        self.start
    }

    /// End endpoint, if set.
    pub fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    /// Whether neither endpoint is set.
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether only the start is set.
    pub fn is_pending(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Whether both endpoints are set.
    pub fn is_resolved(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Whether both endpoints are set and ordered.
    pub fn is_valid(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start.iso() <= end.iso(),
            _ => false,
        }
    }

    /// Whether a resolved range covers `date` chronologically.
    pub fn contains(&self, date: &CalendarDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start.iso() <= date.iso() && date.iso() <= end.iso(),
            _ => false,
        }
    }

    /// Whether two resolved ranges overlap chronologically.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        match (self.start, self.end, other.start, other.end) {
            (Some(a0), Some(a1), Some(b0), Some(b1)) => {
                a0.iso() <= b1.iso() && b0.iso() <= a1.iso()
            }
            _ => false,
        }
    }
}

/// The rule set governing how a single interaction mutates a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangeDirection {
    /// Start anchors on the first interaction; a later date sets the end, an
    /// earlier date swaps (the old start becomes the end).
    #[default]
    Default,
    /// The end may only sit after the anchored start; earlier interactions
    /// are ignored rather than swapping.
    Forward,
    /// The start may only sit before the anchored end; later interactions
    /// are ignored.
    Backward,
    /// Both endpoints movable; the endpoint chronologically closer to the
    /// interaction moves (ties move the start).
    Both,
    /// A resolved range is never extended; any new interaction restarts a
    /// fresh pending range.
    None,
}

impl RangeDirection {
    /// Apply one interacted date to the current range under this policy.
    ///
    /// Returns `Ok(None)` when the interaction is a defined no-op (a tie or
    /// an ignored direction), leaving the current range untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::AlmanacError::InvalidDate`] from unit
    /// normalization at the calendar system's span edges.
    pub fn apply(
        self,
        current: Option<&DateRange>,
        interacted: &CalendarDate,
        level: ViewLevel,
        adapter: &CalendarAdapter,
    ) -> Result<Option<DateRange>> {
        let lo = level.unit_start(adapter, interacted)?;
        let hi = level.unit_end(adapter, interacted)?;

        let current = current.filter(|r| !r.is_empty());
        let Some(range) = current else {
            return Ok(Some(DateRange::pending(lo)));
        };

        if range.is_pending() {
            let start = range.start().expect("pending range has a start");
            return match self {
                // A pending start resolves the same way under every policy
                // except the directional ones, which refuse to cross it.
                Self::Default | Self::Both | Self::None => {
                    resolve_pending(&start, &lo, &hi, level, adapter)
                }
                Self::Forward => {
                    if lo.iso() > start.iso() {
                        Ok(Some(DateRange::resolved(start, hi)))
                    } else {
                        Ok(Option::None)
                    }
                }
                Self::Backward => {
                    if lo.iso() < start.iso() {
                        Ok(Some(DateRange::resolved(lo, level.unit_end(adapter, &start)?)))
                    } else {
                        Ok(Option::None)
                    }
                }
            };
        }

        let start = range.start().expect("resolved range has a start");
        let end = range.end().expect("resolved range has an end");
        match self {
            Self::Default => {
                if lo.iso() == start.iso() {
                    Ok(Option::None)
                } else if lo.iso() > start.iso() {
                    if hi.iso() == end.iso() {
                        Ok(Option::None)
                    } else {
                        Ok(Some(DateRange::resolved(start, hi)))
                    }
                } else {
                    Ok(Some(DateRange::resolved(lo, level.unit_end(adapter, &start)?)))
                }
            }
            Self::Forward => {
                if lo.iso() <= start.iso() || hi.iso() == end.iso() {
                    Ok(Option::None)
                } else {
                    Ok(Some(DateRange::resolved(start, hi)))
                }
            }
            Self::Backward => {
                if hi.iso() >= end.iso() || lo.iso() == start.iso() {
                    Ok(Option::None)
                } else {
                    Ok(Some(DateRange::resolved(lo, end)))
                }
            }
            Self::Both => {
                let to_start = (interacted.ordinal() - start.ordinal()).abs();
                let to_end = (interacted.ordinal() - end.ordinal()).abs();
                if to_start <= to_end {
                    if lo.iso() == start.iso() {
                        Ok(Option::None)
                    } else if lo.iso() <= end.iso() {
                        Ok(Some(DateRange::resolved(lo, end)))
                    } else {
                        // Moving the start past the end inverts the range;
                        // the old end's unit becomes the new start.
                        let new_start = level.unit_start(adapter, &end)?;
                        Ok(Some(DateRange::resolved(new_start, hi)))
                    }
                } else if hi.iso() == end.iso() {
                    Ok(Option::None)
                } else if hi.iso() >= start.iso() {
                    Ok(Some(DateRange::resolved(start, hi)))
                } else {
                    let new_end = level.unit_end(adapter, &start)?;
                    Ok(Some(DateRange::resolved(lo, new_end)))
                }
            }
            Self::None => Ok(Some(DateRange::pending(lo))),
        }
    }
}

/// Second interaction on a pending range: later resolves forward, earlier
/// swaps, the same unit is a no-op.
fn resolve_pending(
    start: &CalendarDate,
    lo: &CalendarDate,
    hi: &CalendarDate,
    level: ViewLevel,
    adapter: &CalendarAdapter,
) -> Result<Option<DateRange>> {
    if lo.iso() == start.iso() {
        Ok(None)
    } else if lo.iso() > start.iso() {
        Ok(Some(DateRange::resolved(*start, *hi)))
    } else {
        Ok(Some(DateRange::resolved(*lo, level.unit_end(adapter, start)?)))
    }
}
