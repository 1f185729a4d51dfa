//! View navigation: paging, drill transitions, and boundary validation.
//!
//! The [`NavigationController`] owns the current [`NavigationContext`] and
//! the [`VisibleWindow`] computed from it. Paging shifts the display date
//! by one unit of the current view level; drilling moves between levels.
//! Paging past the configured min/max date is a defined no-op, never an
//! error, and the availability flags are recomputed on every context change
//! so hosts can enable/disable navigation affordances.

use chrono::Weekday;

use crate::date::{CalendarAdapter, CalendarDate};
use crate::window::{ViewLevel, VisibleWindow, compute_window};

/// The navigation configuration and position of one calendar instance.
///
/// Created once per instance and mutated in place through the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationContext {
    /// The date anchoring the visible window.
    pub display_date: CalendarDate,
    /// The displayed granularity.
    pub level: ViewLevel,
    /// Earliest navigable/selectable date.
    pub min_date: CalendarDate,
    /// Latest navigable/selectable date.
    pub max_date: CalendarDate,
    /// Number of week rows in Month view, 1-6.
    pub visible_weeks: u8,
    /// First day of the displayed week.
    pub first_day_of_week: Weekday,
}

impl NavigationContext {
    /// Default context for an adapter: today's month, full 6-week grid,
    /// Sunday start, bounds at the system's supported span.
    pub fn new(adapter: &CalendarAdapter) -> Self {
        Self {
            display_date: adapter.today(),
            level: ViewLevel::Month,
            min_date: adapter.min_supported(),
            max_date: adapter.max_supported(),
            visible_weeks: 6,
            first_day_of_week: Weekday::Sun,
        }
    }
}

/// The view transition produced by one navigation operation.
///
/// Produced only when the view level or the "current" subset of the visible
/// window actually changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewChange {
    /// Level before the operation.
    pub old_level: ViewLevel,
    /// Level after the operation.
    pub new_level: ViewLevel,
    /// Window before the operation.
    pub old_window: VisibleWindow,
    /// Window after the operation.
    pub new_window: VisibleWindow,
}

/// Manages the current view level and display date.
#[derive(Debug, Clone)]
pub struct NavigationController {
    context: NavigationContext,
    window: VisibleWindow,
    today: CalendarDate,
    can_backward: bool,
    can_forward: bool,
}

impl NavigationController {
    /// Create a controller, computing the initial window and flags.
    pub fn new(context: NavigationContext, adapter: &CalendarAdapter) -> Self {
        let window = compute_window(&context, adapter);
        let mut controller = Self {
            context,
            window,
            today: adapter.today(),
            can_backward: false,
            can_forward: false,
        };
        controller.recompute_flags(adapter);
        controller
    }

    /// Override "today" (used by reconciliation), e.g. for deterministic
    /// tests.
    pub fn with_today(mut self, today: CalendarDate) -> Self {
        self.today = today;
        self
    }

    /// Current navigation context.
    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    /// Current visible window.
    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    /// The date reconciliation treats as today.
    pub fn today(&self) -> CalendarDate {
        self.today
    }

    /// Whether paging backward stays within `min_date`.
    pub fn can_go_backward(&self) -> bool {
        self.can_backward
    }

    /// Whether paging forward stays within `max_date`.
    pub fn can_go_forward(&self) -> bool {
        self.can_forward
    }

    /// Page back one unit of the current view level.
    ///
    /// No-op when the previous page would precede `min_date`.
    pub fn page_backward(&mut self, adapter: &CalendarAdapter) -> Option<ViewChange> {
        self.page(adapter, -1)
    }

    /// Page forward one unit of the current view level.
    ///
    /// No-op when the next page would exceed `max_date`.
    pub fn page_forward(&mut self, adapter: &CalendarAdapter) -> Option<ViewChange> {
        self.page(adapter, 1)
    }

    fn page(&mut self, adapter: &CalendarAdapter, step: i32) -> Option<ViewChange> {
        let allowed = if step < 0 {
            self.can_backward
        } else {
            self.can_forward
        };
        if !allowed {
            tracing::debug!(
                target: "horizon_almanac::navigation",
                step,
                display = %self.context.display_date,
                "paging denied at boundary"
            );
            return None;
        }
        let shifted = self.shifted_display(adapter, step)?;
        let prev_display = self.context.display_date;

        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.display_date = self.clamp_to_bounds(shifted);
        self.window = compute_window(&self.context, adapter);
        self.reconcile_display(prev_display);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Drill to the next finer level, anchored at the selected marker.
    ///
    /// No-op at Month level.
    pub fn drill_down(
        &mut self,
        adapter: &CalendarAdapter,
        marker: CalendarDate,
    ) -> Option<ViewChange> {
        let next_level = self.context.level.drill_down()?;
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.display_date = self.clamp_to_bounds(marker);
        self.context.level = next_level;
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Drill to the next coarser level, keeping the display date.
    ///
    /// No-op at Century level.
    pub fn drill_up(&mut self, adapter: &CalendarAdapter) -> Option<ViewChange> {
        let next_level = self.context.level.drill_up()?;
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.level = next_level;
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Navigate the display date to today at the current level.
    pub fn show_today(&mut self, adapter: &CalendarAdapter) -> Option<ViewChange> {
        self.set_display_date(adapter, self.today)
    }

    /// Set the display date directly (drill target, programmatic show).
    pub fn set_display_date(
        &mut self,
        adapter: &CalendarAdapter,
        date: CalendarDate,
    ) -> Option<ViewChange> {
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.display_date = self.clamp_to_bounds(date);
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Set the view level directly, keeping the display date.
    pub fn set_level(&mut self, adapter: &CalendarAdapter, level: ViewLevel) -> Option<ViewChange> {
        if level == self.context.level {
            return None;
        }
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.level = level;
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Set the navigation bounds, clamping the display date into them.
    pub fn set_bounds(
        &mut self,
        adapter: &CalendarAdapter,
        min_date: CalendarDate,
        max_date: CalendarDate,
    ) -> Option<ViewChange> {
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.min_date = min_date;
        self.context.max_date = max_date;
        self.context.display_date = self.clamp_to_bounds(self.context.display_date);
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Set the number of Month-view week rows (clamped to 1-6).
    pub fn set_visible_weeks(&mut self, adapter: &CalendarAdapter, weeks: u8) -> Option<ViewChange> {
        let weeks = weeks.clamp(1, 6);
        if weeks == self.context.visible_weeks {
            return None;
        }
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.visible_weeks = weeks;
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Set the first day of the displayed week.
    pub fn set_first_day_of_week(
        &mut self,
        adapter: &CalendarAdapter,
        day: Weekday,
    ) -> Option<ViewChange> {
        if day == self.context.first_day_of_week {
            return None;
        }
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.context.first_day_of_week = day;
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Recompute the window in place after an adapter change.
    pub fn refresh(&mut self, adapter: &CalendarAdapter) -> Option<ViewChange> {
        let old_level = self.context.level;
        let old_window = self.window.clone();
        self.today = adapter.today();
        self.window = compute_window(&self.context, adapter);
        self.recompute_flags(adapter);
        self.view_change(old_level, old_window)
    }

    /// Display date shifted by `step` units of the current level.
    fn shifted_display(&self, adapter: &CalendarAdapter, step: i32) -> Option<CalendarDate> {
        let date = &self.context.display_date;
        match self.context.level {
            ViewLevel::Month => adapter.add_months(date, step).ok(),
            ViewLevel::Year => adapter.add_years(date, step).ok(),
            ViewLevel::Decade => adapter.add_years(date, step * 10).ok(),
            ViewLevel::Century => adapter.add_years(date, step * 100).ok(),
        }
    }

    /// After paging: when the previous display date left the window's
    /// "current" subset, re-anchor it. Full 6-week Month grids (and every
    /// coarser level) re-anchor on the first "current" entry; partial Month
    /// grids prefer today when it is visible, else the first visible date.
    fn reconcile_display(&mut self, prev_display: CalendarDate) {
        if self.window.contains_current(&prev_display) {
            return;
        }
        let partial_month_grid =
            self.context.level == ViewLevel::Month && self.context.visible_weeks != 6;
        let fallback = if partial_month_grid {
            if self.window.contains(&self.today) {
                Some(self.today)
            } else {
                self.window.first().map(|e| e.date)
            }
        } else {
            self.window.first_current()
        };
        if let Some(date) = fallback {
            self.context.display_date = date;
        }
    }

    /// Whether a one-step page keeps the window inside the bounds.
    fn page_allowed(&self, adapter: &CalendarAdapter, step: i32) -> bool {
        let Some(shifted) = self.shifted_display(adapter, step) else {
            return false;
        };
        let hypothetical = NavigationContext {
            display_date: shifted,
            ..self.context
        };
        let window = compute_window(&hypothetical, adapter);
        if step < 0 {
            window
                .first_current()
                .is_some_and(|d| d.iso() >= self.context.min_date.iso())
        } else {
            window
                .last_current()
                .is_some_and(|d| d.iso() <= self.context.max_date.iso())
        }
    }

    fn recompute_flags(&mut self, adapter: &CalendarAdapter) {
        self.can_backward = self.page_allowed(adapter, -1);
        self.can_forward = self.page_allowed(adapter, 1);
    }

    fn clamp_to_bounds(&self, date: CalendarDate) -> CalendarDate {
        if date.iso() < self.context.min_date.iso() {
            self.context.min_date
        } else if date.iso() > self.context.max_date.iso() {
            self.context.max_date
        } else {
            date
        }
    }

    /// Build the change value when the level or the "current" subset moved.
    fn view_change(&self, old_level: ViewLevel, old_window: VisibleWindow) -> Option<ViewChange> {
        let new_level = self.context.level;
        let subset_changed = !old_window
            .current()
            .map(|e| e.date.iso())
            .eq(self.window.current().map(|e| e.date.iso()));
        if new_level == old_level && !subset_changed {
            return None;
        }
        tracing::debug!(
            target: "horizon_almanac::navigation",
            old_level = ?old_level,
            new_level = ?new_level,
            display = %self.context.display_date,
            "view changed"
        );
        Some(ViewChange {
            old_level,
            new_level,
            old_window,
            new_window: self.window.clone(),
        })
    }
}
