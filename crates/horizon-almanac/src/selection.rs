//! Selection state and the selection engine.
//!
//! The engine owns the selection for exactly one of four mutually exclusive
//! modes. State lives in one value struct ([`SelectionState`]); every
//! mutating operation returns the change it produced (old and new state) or
//! `None` when the interaction was a defined no-op, so hosts can diff
//! without subscribing to ambient events.
//!
//! Range mode walks a small machine: empty → pending on the first
//! interaction, pending → resolved (or swapped) on the second, and resolved
//! ranges keep mutating per the active [`RangeDirection`]. The machine has
//! no terminal state.

use crate::date::{CalendarAdapter, CalendarDate};
use crate::error::Result;
use crate::range::{DateRange, RangeDirection};
use crate::window::ViewLevel;

/// The active selection mode. Exactly one is active at a time; switching
/// modes resets selection state rather than converting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// At most one selected date.
    #[default]
    Single,
    /// Any number of individually toggled dates.
    Multiple,
    /// One two-endpoint range.
    Range,
    /// An ordered list of ranges.
    MultiRange,
}

/// Selection state, shaped per the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// Single mode: the selected date, if any.
    Single(Option<CalendarDate>),
    /// Multiple mode: selected dates in insertion order.
    Multiple(Vec<CalendarDate>),
    /// Range mode: the current range, if any.
    Range(Option<DateRange>),
    /// MultiRange mode: ranges in creation order; only the last may be
    /// pending.
    MultiRange(Vec<DateRange>),
}

impl SelectionState {
    /// The empty state for a mode.
    pub fn empty_for(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(None),
            SelectionMode::Multiple => Self::Multiple(Vec::new()),
            SelectionMode::Range => Self::Range(None),
            SelectionMode::MultiRange => Self::MultiRange(Vec::new()),
        }
    }

    /// The mode this state belongs to.
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
            Self::Range(_) => SelectionMode::Range,
            Self::MultiRange(_) => SelectionMode::MultiRange,
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(date) => date.is_none(),
            Self::Multiple(dates) => dates.is_empty(),
            Self::Range(range) => range.is_none_or(|r| r.is_empty()),
            Self::MultiRange(ranges) => ranges.is_empty(),
        }
    }

    /// The selected date in Single mode.
    pub fn selected_date(&self) -> Option<CalendarDate> {
        match self {
            Self::Single(date) => *date,
            _ => None,
        }
    }

    /// The selected dates in Multiple mode, in insertion order.
    pub fn selected_dates(&self) -> &[CalendarDate] {
        match self {
            Self::Multiple(dates) => dates,
            _ => &[],
        }
    }

    /// The current range in Range mode.
    pub fn selected_range(&self) -> Option<DateRange> {
        match self {
            Self::Range(range) => *range,
            _ => None,
        }
    }

    /// The ranges in MultiRange mode, in creation order.
    pub fn selected_ranges(&self) -> &[DateRange] {
        match self {
            Self::MultiRange(ranges) => ranges,
            _ => &[],
        }
    }
}

/// The old and new selection produced by one mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    /// State before the operation.
    pub old: SelectionState,
    /// State after the operation.
    pub new: SelectionState,
}

/// Owns and mutates selection state for one calendar instance.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    mode: SelectionMode,
    direction: RangeDirection,
    state: SelectionState,
}

impl SelectionEngine {
    /// Create an engine with empty state for `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            direction: RangeDirection::default(),
            state: SelectionState::empty_for(mode),
        }
    }

    /// The active selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The active range-direction policy.
    pub fn direction(&self) -> RangeDirection {
        self.direction
    }

    /// Select the range-direction policy for subsequent range interactions.
    pub fn set_direction(&mut self, direction: RangeDirection) {
        self.direction = direction;
    }

    /// Current selection state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Switch selection mode, resetting state.
    ///
    /// Returns the clearing as a change when something was selected;
    /// switching to the same mode is a no-op.
    pub fn set_mode(&mut self, mode: SelectionMode) -> Option<SelectionChange> {
        if mode == self.mode {
            return None;
        }
        tracing::debug!(
            target: "horizon_almanac::selection",
            old = ?self.mode,
            new = ?mode,
            "switching selection mode"
        );
        let old = std::mem::replace(&mut self.state, SelectionState::empty_for(mode));
        self.mode = mode;
        if old.is_empty() {
            None
        } else {
            Some(SelectionChange {
                old,
                new: self.state.clone(),
            })
        }
    }

    /// Clear the selection, keeping the mode.
    pub fn clear(&mut self) -> Option<SelectionChange> {
        if self.state.is_empty() {
            return None;
        }
        let old = std::mem::replace(&mut self.state, SelectionState::empty_for(self.mode));
        Some(SelectionChange {
            old,
            new: self.state.clone(),
        })
    }

    /// Select a date in Single mode.
    ///
    /// Re-selecting the already-selected date is a no-op: one notification
    /// per distinct date, never two.
    pub fn select_single(&mut self, date: CalendarDate) -> Option<SelectionChange> {
        let SelectionState::Single(current) = &self.state else {
            return None;
        };
        if *current == Some(date) {
            return None;
        }
        self.commit(SelectionState::Single(Some(date)))
    }

    /// Toggle a date in Multiple mode.
    ///
    /// Membership uses calendar-aware equality at the active view level's
    /// unit granularity. Insertion order is preserved for stable old/new
    /// diffing.
    pub fn toggle_multiple(&mut self, date: CalendarDate, level: ViewLevel) -> Option<SelectionChange> {
        let SelectionState::Multiple(dates) = &self.state else {
            return None;
        };
        let mut next = dates.clone();
        match next.iter().position(|d| level.same_unit(d, &date)) {
            Some(index) => {
                next.remove(index);
            }
            None => next.push(date),
        }
        self.commit(SelectionState::Multiple(next))
    }

    /// Apply an interacted date to the range in Range mode, delegating to
    /// the active [`RangeDirection`].
    pub fn update_range(
        &mut self,
        date: CalendarDate,
        level: ViewLevel,
        adapter: &CalendarAdapter,
    ) -> Result<Option<SelectionChange>> {
        let SelectionState::Range(current) = &self.state else {
            return Ok(None);
        };
        let Some(next) = self.direction.apply(current.as_ref(), &date, level, adapter)? else {
            return Ok(None);
        };
        Ok(self.commit(SelectionState::Range(Some(next))))
    }

    /// Apply an interacted date to the range list in MultiRange mode.
    ///
    /// - A pending last range is extended the way the Default policy would,
    ///   after which every *other* range the extension now overlaps is
    ///   removed. Overlapping ranges are deleted, never merged into a union.
    /// - A date inside an existing resolved range removes that range.
    /// - Otherwise a fresh pending range is appended.
    pub fn update_multi_range(
        &mut self,
        date: CalendarDate,
        level: ViewLevel,
        adapter: &CalendarAdapter,
    ) -> Result<Option<SelectionChange>> {
        let SelectionState::MultiRange(ranges) = &self.state else {
            return Ok(None);
        };
        let lo = level.unit_start(adapter, &date)?;
        let hi = level.unit_end(adapter, &date)?;

        let mut next = ranges.clone();
        if let Some(last) = next.last().copied().filter(DateRange::is_pending) {
            let start = last.start().expect("pending range has a start");
            if lo.iso() == start.iso() {
                return Ok(None);
            }
            let resolved = if lo.iso() > start.iso() {
                DateRange::resolved(start, hi)
            } else {
                DateRange::resolved(lo, level.unit_end(adapter, &start)?)
            };
            let last_index = next.len() - 1;
            next[last_index] = resolved;
            let mut kept = Vec::with_capacity(next.len());
            for (index, range) in next.iter().enumerate() {
                if index == last_index || !range.overlaps(&resolved) {
                    kept.push(*range);
                }
            }
            next = kept;
        } else if let Some(index) = next.iter().position(|r| r.contains(&lo)) {
            next.remove(index);
        } else {
            next.push(DateRange::pending(lo));
        }

        if next == *ranges {
            return Ok(None);
        }
        Ok(self.commit(SelectionState::MultiRange(next)))
    }

    /// Apply a caller-supplied range per swipe/drag gesture tick.
    ///
    /// `is_new_gesture` forces a fresh range; continuation ticks follow the
    /// active direction policy's endpoint rules. Ticks that would cross the
    /// policy's anchor are no-ops.
    pub fn update_range_via_swipe(
        &mut self,
        range: DateRange,
        is_new_gesture: bool,
        level: ViewLevel,
        adapter: &CalendarAdapter,
    ) -> Result<Option<SelectionChange>> {
        let SelectionState::Range(current) = &self.state else {
            return Ok(None);
        };

        let (a, b) = match (range.start(), range.end()) {
            (Some(a), Some(b)) => (a, b),
            (Some(a), None) | (None, Some(a)) => (a, a),
            (None, None) => return Ok(None),
        };
        let (first, second) = if a.iso() <= b.iso() { (a, b) } else { (b, a) };
        let lo = level.unit_start(adapter, &first)?;
        let hi = level.unit_end(adapter, &second)?;
        let proposed = DateRange::resolved(lo, hi);

        let existing = current.filter(|r| !r.is_empty());
        let next = match existing {
            _ if is_new_gesture => proposed,
            None => proposed,
            Some(existing) => match self.direction {
                RangeDirection::Default | RangeDirection::Both | RangeDirection::None => proposed,
                RangeDirection::Forward => {
                    let anchor = existing.start().expect("non-empty range has a start");
                    if hi.iso() > anchor.iso() {
                        DateRange::resolved(anchor, hi)
                    } else {
                        return Ok(None);
                    }
                }
                RangeDirection::Backward => {
                    let anchor = match existing.end() {
                        Some(end) => end,
                        None => level.unit_end(
                            adapter,
                            &existing.start().expect("non-empty range has a start"),
                        )?,
                    };
                    if lo.iso() < anchor.iso() {
                        DateRange::resolved(lo, anchor)
                    } else {
                        return Ok(None);
                    }
                }
            },
        };

        if *current == Some(next) {
            return Ok(None);
        }
        Ok(self.commit(SelectionState::Range(Some(next))))
    }

    /// Replace the state and report the change.
    fn commit(&mut self, new: SelectionState) -> Option<SelectionChange> {
        if new == self.state {
            return None;
        }
        let old = std::mem::replace(&mut self.state, new);
        tracing::trace!(
            target: "horizon_almanac::selection",
            old = ?old,
            new = ?self.state,
            "selection changed"
        );
        Some(SelectionChange {
            old,
            new: self.state.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::CalendarSystem;

    fn adapter() -> CalendarAdapter {
        CalendarAdapter::new(CalendarSystem::Gregorian)
    }

    fn day(adapter: &CalendarAdapter, m: u8, d: u8) -> CalendarDate {
        adapter.compose(2024, m, d).unwrap()
    }

    #[test]
    fn test_select_single_idempotent() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Single);
        let date = day(&a, 4, 1);

        let change = engine.select_single(date).unwrap();
        assert_eq!(change.old, SelectionState::Single(None));
        assert_eq!(change.new.selected_date(), Some(date));

        // Second identical selection produces no second notification.
        assert!(engine.select_single(date).is_none());
    }

    #[test]
    fn test_toggle_multiple_add_remove() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Multiple);
        let date = day(&a, 4, 1);

        let added = engine.toggle_multiple(date, ViewLevel::Month).unwrap();
        assert_eq!(added.old.selected_dates(), &[]);
        assert_eq!(added.new.selected_dates(), &[date]);

        let removed = engine.toggle_multiple(date, ViewLevel::Month).unwrap();
        assert_eq!(removed.old.selected_dates(), &[date]);
        assert_eq!(removed.new.selected_dates(), &[]);
        assert!(engine.state().is_empty());
    }

    #[test]
    fn test_toggle_multiple_preserves_insertion_order() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Multiple);
        let d1 = day(&a, 4, 10);
        let d2 = day(&a, 4, 2);
        let d3 = day(&a, 4, 6);

        engine.toggle_multiple(d1, ViewLevel::Month);
        engine.toggle_multiple(d2, ViewLevel::Month);
        engine.toggle_multiple(d3, ViewLevel::Month);
        assert_eq!(engine.state().selected_dates(), &[d1, d2, d3]);

        engine.toggle_multiple(d2, ViewLevel::Month);
        assert_eq!(engine.state().selected_dates(), &[d1, d3]);
    }

    #[test]
    fn test_update_range_swap() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Range);

        engine
            .update_range(day(&a, 3, 10), ViewLevel::Month, &a)
            .unwrap()
            .unwrap();
        assert!(engine.state().selected_range().unwrap().is_pending());

        engine
            .update_range(day(&a, 3, 5), ViewLevel::Month, &a)
            .unwrap()
            .unwrap();
        let range = engine.state().selected_range().unwrap();
        assert_eq!(range.start().unwrap().day(), 5);
        assert_eq!(range.end().unwrap().day(), 10);
    }

    #[test]
    fn test_multi_range_toggle_off_removes_range() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::MultiRange);

        engine
            .update_multi_range(day(&a, 1, 5), ViewLevel::Month, &a)
            .unwrap();
        engine
            .update_multi_range(day(&a, 1, 10), ViewLevel::Month, &a)
            .unwrap();
        assert_eq!(engine.state().selected_ranges().len(), 1);

        // A date inside the resolved range deletes it.
        let change = engine
            .update_multi_range(day(&a, 1, 7), ViewLevel::Month, &a)
            .unwrap()
            .unwrap();
        assert_eq!(change.new.selected_ranges(), &[]);
    }

    #[test]
    fn test_multi_range_appends_outside_existing() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::MultiRange);

        engine
            .update_multi_range(day(&a, 1, 5), ViewLevel::Month, &a)
            .unwrap();
        engine
            .update_multi_range(day(&a, 1, 10), ViewLevel::Month, &a)
            .unwrap();
        engine
            .update_multi_range(day(&a, 2, 1), ViewLevel::Month, &a)
            .unwrap();

        let ranges = engine.state().selected_ranges();
        assert_eq!(ranges.len(), 2);
        assert!(ranges[0].is_resolved());
        assert!(ranges[1].is_pending());
    }

    #[test]
    fn test_multi_range_overlap_deletes_not_merges() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::MultiRange);

        // First resolved range Jan 5-10.
        engine
            .update_multi_range(day(&a, 1, 5), ViewLevel::Month, &a)
            .unwrap();
        engine
            .update_multi_range(day(&a, 1, 10), ViewLevel::Month, &a)
            .unwrap();
        // Pending range at Jan 20...
        engine
            .update_multi_range(day(&a, 1, 20), ViewLevel::Month, &a)
            .unwrap();
        // ...extended backward across the first range: the overlapped range
        // is deleted, the extension survives as-is.
        let change = engine
            .update_multi_range(day(&a, 1, 2), ViewLevel::Month, &a)
            .unwrap()
            .unwrap();
        let ranges = change.new.selected_ranges();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start().unwrap().day(), 2);
        assert_eq!(ranges[0].end().unwrap().day(), 20);
    }

    #[test]
    fn test_multi_range_non_overlap_invariant() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::MultiRange);
        for (m, d) in [(1u8, 5u8), (1, 10), (2, 1), (2, 14), (1, 8), (3, 3)] {
            engine
                .update_multi_range(day(&a, m, d), ViewLevel::Month, &a)
                .unwrap();
        }
        let ranges: Vec<_> = engine
            .state()
            .selected_ranges()
            .iter()
            .copied()
            .filter(DateRange::is_resolved)
            .collect();
        for (i, left) in ranges.iter().enumerate() {
            for right in &ranges[i + 1..] {
                assert!(!left.overlaps(right));
            }
        }
    }

    #[test]
    fn test_swipe_new_gesture_replaces() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Range);
        engine
            .update_range_via_swipe(
                DateRange::resolved(day(&a, 3, 5), day(&a, 3, 8)),
                true,
                ViewLevel::Month,
                &a,
            )
            .unwrap()
            .unwrap();

        // A new gesture replaces wholesale, even backwards.
        let change = engine
            .update_range_via_swipe(
                DateRange::resolved(day(&a, 3, 20), day(&a, 3, 12)),
                true,
                ViewLevel::Month,
                &a,
            )
            .unwrap()
            .unwrap();
        let range = change.new.selected_range().unwrap();
        assert_eq!(range.start().unwrap().day(), 12);
        assert_eq!(range.end().unwrap().day(), 20);
    }

    #[test]
    fn test_swipe_continuation_respects_forward_anchor() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Range);
        engine.set_direction(RangeDirection::Forward);

        engine
            .update_range_via_swipe(
                DateRange::resolved(day(&a, 3, 10), day(&a, 3, 12)),
                true,
                ViewLevel::Month,
                &a,
            )
            .unwrap();
        // Continuation keeps the anchored start.
        let change = engine
            .update_range_via_swipe(
                DateRange::resolved(day(&a, 3, 11), day(&a, 3, 18)),
                false,
                ViewLevel::Month,
                &a,
            )
            .unwrap()
            .unwrap();
        let range = change.new.selected_range().unwrap();
        assert_eq!(range.start().unwrap().day(), 10);
        assert_eq!(range.end().unwrap().day(), 18);

        // A tick entirely before the anchor is ignored.
        assert!(
            engine
                .update_range_via_swipe(
                    DateRange::resolved(day(&a, 3, 1), day(&a, 3, 4)),
                    false,
                    ViewLevel::Month,
                    &a,
                )
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_set_mode_clears_state() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Single);
        engine.select_single(day(&a, 4, 1));

        let change = engine.set_mode(SelectionMode::Multiple).unwrap();
        assert_eq!(change.old.selected_date(), Some(day(&a, 4, 1)));
        assert!(change.new.is_empty());
        assert_eq!(engine.mode(), SelectionMode::Multiple);

        // Same-mode switch is a no-op.
        assert!(engine.set_mode(SelectionMode::Multiple).is_none());
    }

    #[test]
    fn test_ops_in_wrong_mode_are_noops() {
        let a = adapter();
        let mut engine = SelectionEngine::new(SelectionMode::Single);
        assert!(engine.toggle_multiple(day(&a, 4, 1), ViewLevel::Month).is_none());
        assert!(
            engine
                .update_range(day(&a, 4, 1), ViewLevel::Month, &a)
                .unwrap()
                .is_none()
        );
        assert!(
            engine
                .update_multi_range(day(&a, 4, 1), ViewLevel::Month, &a)
                .unwrap()
                .is_none()
        );
    }
}
