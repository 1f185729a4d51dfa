//! The calendar engine facade.
//!
//! [`CalendarEngine`] wires the adapter, selection engine, and navigation
//! controller together behind one API shaped like a calendar control minus
//! its rendering: configuration via builder and setter methods, inbound
//! [`InteractionEvent`]s, and outbound change signals.
//!
//! Every mutating method also returns the change it produced (or `None`
//! for a defined no-op), so hosts that prefer explicit return values over
//! signal subscriptions can use either.
//!
//! # Example
//!
//! ```
//! use horizon_almanac::prelude::*;
//!
//! let mut engine = CalendarEngine::new(CalendarSystem::Gregorian)
//!     .with_selection_mode(SelectionMode::Range)
//!     .with_first_day_of_week(Weekday::Sun);
//!
//! engine.selection_changed.connect(|change| {
//!     println!("selection now: {:?}", change.new);
//! });
//!
//! let date = engine.adapter().compose(2024, 3, 10).unwrap();
//! engine.handle_interaction(&InteractionEvent::tap(date)).unwrap();
//! ```

use std::sync::Arc;

use chrono::Weekday;
use horizon_almanac_core::{Signal, almanac_debug};

use crate::date::{CalendarAdapter, CalendarDate, CalendarSystem};
use crate::error::Result;
use crate::event::{CalendarElement, GestureKind, InteractionEvent};
use crate::navigation::{NavigationContext, NavigationController, ViewChange};
use crate::range::{DateRange, RangeDirection};
use crate::selection::{SelectionChange, SelectionEngine, SelectionMode, SelectionState};
use crate::window::{ViewLevel, VisibleWindow};

/// Host-supplied selectability predicate.
type SelectablePredicate = Arc<dyn Fn(&CalendarDate) -> bool + Send + Sync>;

/// What one interaction changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// The interaction mutated the selection.
    Selection(SelectionChange),
    /// The interaction navigated the view.
    View(ViewChange),
}

/// A calendar control's decision core: selection, navigation, and the
/// visible window, with no rendering attached.
///
/// # Signals
///
/// - `selection_changed(SelectionChange)`: Emitted when selection changes
/// - `view_changed(ViewChange)`: Emitted when the view level or the
///   "current" window subset changes
/// - `activated(CalendarDate)`: Emitted when a date is activated (double tap)
pub struct CalendarEngine {
    /// Calendar arithmetic for the configured system.
    adapter: CalendarAdapter,
    /// Selection state and mode logic.
    selection: SelectionEngine,
    /// View level, display date, window, and paging flags.
    navigation: NavigationController,
    /// When set, cell taps above Month view drill down instead of selecting.
    allow_view_navigation: bool,
    /// Host predicate consulted before any mutating selection operation.
    selectable: Option<SelectablePredicate>,

    /// Signal emitted when selection changes.
    pub selection_changed: Signal<SelectionChange>,
    /// Signal emitted when the view changes.
    pub view_changed: Signal<ViewChange>,
    /// Signal emitted when a date is activated.
    pub activated: Signal<CalendarDate>,
}

impl CalendarEngine {
    /// Create an engine for the given calendar system, displaying today's
    /// month with a full 6-week grid and bounds at the system's supported
    /// span.
    pub fn new(system: CalendarSystem) -> Self {
        almanac_debug!(system = %system, "creating calendar engine");
        let adapter = CalendarAdapter::new(system);
        let context = NavigationContext::new(&adapter);
        let navigation = NavigationController::new(context, &adapter);
        Self {
            adapter,
            selection: SelectionEngine::new(SelectionMode::default()),
            navigation,
            allow_view_navigation: true,
            selectable: None,
            selection_changed: Signal::new(),
            view_changed: Signal::new(),
            activated: Signal::new(),
        }
    }

    // =========================================================================
    // Builder Configuration
    // =========================================================================

    /// Set the selection mode using builder pattern.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection = SelectionEngine::new(mode);
        self
    }

    /// Set the range-direction policy using builder pattern.
    pub fn with_range_direction(mut self, direction: RangeDirection) -> Self {
        self.selection.set_direction(direction);
        self
    }

    /// Set the view level using builder pattern.
    pub fn with_view_level(mut self, level: ViewLevel) -> Self {
        self.navigation.set_level(&self.adapter, level);
        self
    }

    /// Set the display date using builder pattern.
    pub fn with_display_date(mut self, date: CalendarDate) -> Self {
        self.navigation.set_display_date(&self.adapter, date);
        self
    }

    /// Set the navigation bounds using builder pattern.
    pub fn with_date_range(mut self, min: CalendarDate, max: CalendarDate) -> Self {
        self.navigation.set_bounds(&self.adapter, min, max);
        self
    }

    /// Set the first day of the week using builder pattern.
    pub fn with_first_day_of_week(mut self, day: Weekday) -> Self {
        self.navigation.set_first_day_of_week(&self.adapter, day);
        self
    }

    /// Set the number of Month-view week rows using builder pattern.
    pub fn with_visible_weeks(mut self, weeks: u8) -> Self {
        self.navigation.set_visible_weeks(&self.adapter, weeks);
        self
    }

    /// Enable or disable drill-down on cell taps above Month view using
    /// builder pattern.
    pub fn with_view_navigation(mut self, allow: bool) -> Self {
        self.allow_view_navigation = allow;
        self
    }

    /// Set the selectability predicate using builder pattern.
    pub fn with_selectable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CalendarDate) -> bool + Send + Sync + 'static,
    {
        self.selectable = Some(Arc::new(predicate));
        self
    }

    /// Override "today" using builder pattern (deterministic tests).
    pub fn with_today(mut self, today: CalendarDate) -> Self {
        self.navigation = self.navigation.with_today(today);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The calendar adapter for the configured system.
    pub fn adapter(&self) -> &CalendarAdapter {
        &self.adapter
    }

    /// The active selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// The active range-direction policy.
    pub fn range_direction(&self) -> RangeDirection {
        self.selection.direction()
    }

    /// Current selection state.
    pub fn selection_state(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Current navigation context.
    pub fn context(&self) -> &NavigationContext {
        self.navigation.context()
    }

    /// Current visible window.
    pub fn visible_window(&self) -> &VisibleWindow {
        self.navigation.window()
    }

    /// The displayed view level.
    pub fn view_level(&self) -> ViewLevel {
        self.navigation.context().level
    }

    /// The date anchoring the visible window.
    pub fn display_date(&self) -> CalendarDate {
        self.navigation.context().display_date
    }

    /// Whether paging backward stays within the minimum date.
    pub fn can_go_backward(&self) -> bool {
        self.navigation.can_go_backward()
    }

    /// Whether paging forward stays within the maximum date.
    pub fn can_go_forward(&self) -> bool {
        self.navigation.can_go_forward()
    }

    /// Whether cell taps above Month view drill down instead of selecting.
    pub fn allows_view_navigation(&self) -> bool {
        self.allow_view_navigation
    }

    // =========================================================================
    // Configuration Setters
    // =========================================================================

    /// Switch the selection mode, clearing any existing selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> Option<SelectionChange> {
        let change = self.selection.set_mode(mode);
        self.emit_selection(change)
    }

    /// Select the range-direction policy for subsequent interactions.
    pub fn set_range_direction(&mut self, direction: RangeDirection) {
        self.selection.set_direction(direction);
    }

    /// Switch the calendar system.
    ///
    /// The selection is cleared (dates are system-specific), the display
    /// date keeps its timeline position clamped into the new system's
    /// supported span, and the navigation bounds reset to that span.
    pub fn set_calendar_system(&mut self, system: CalendarSystem) -> Option<ViewChange> {
        if system == self.adapter.system() {
            return None;
        }
        tracing::debug!(
            target: "horizon_almanac::adapter",
            old = %self.adapter.system(),
            new = %system,
            "switching calendar system"
        );
        let old_level = self.view_level();
        let old_window = self.visible_window().clone();
        let old_context = *self.navigation.context();

        self.adapter = CalendarAdapter::new(system);
        let cleared = self.selection.clear();
        self.emit_selection(cleared);

        let min = self.adapter.min_supported();
        let max = self.adapter.max_supported();
        let display = self
            .adapter
            .from_iso(old_context.display_date.iso().clamp(min.iso(), max.iso()));
        let context = NavigationContext {
            display_date: display,
            level: old_context.level,
            min_date: min,
            max_date: max,
            visible_weeks: old_context.visible_weeks,
            first_day_of_week: old_context.first_day_of_week,
        };
        self.navigation = NavigationController::new(context, &self.adapter);

        let change = ViewChange {
            old_level,
            new_level: self.view_level(),
            old_window,
            new_window: self.visible_window().clone(),
        };
        self.view_changed.emit(change.clone());
        Some(change)
    }

    /// Set the navigation bounds.
    pub fn set_date_range(&mut self, min: CalendarDate, max: CalendarDate) -> Option<ViewChange> {
        let change = self.navigation.set_bounds(&self.adapter, min, max);
        self.emit_view(change)
    }

    /// Set the minimum navigable/selectable date.
    pub fn set_min_date(&mut self, min: CalendarDate) -> Option<ViewChange> {
        let max = self.navigation.context().max_date;
        self.set_date_range(min, max)
    }

    /// Set the maximum navigable/selectable date.
    pub fn set_max_date(&mut self, max: CalendarDate) -> Option<ViewChange> {
        let min = self.navigation.context().min_date;
        self.set_date_range(min, max)
    }

    /// Set the first day of the displayed week.
    pub fn set_first_day_of_week(&mut self, day: Weekday) -> Option<ViewChange> {
        let change = self.navigation.set_first_day_of_week(&self.adapter, day);
        self.emit_view(change)
    }

    /// Set the number of Month-view week rows (clamped to 1-6).
    pub fn set_visible_weeks(&mut self, weeks: u8) -> Option<ViewChange> {
        let change = self.navigation.set_visible_weeks(&self.adapter, weeks);
        self.emit_view(change)
    }

    /// Set the view level directly.
    pub fn set_view_level(&mut self, level: ViewLevel) -> Option<ViewChange> {
        let change = self.navigation.set_level(&self.adapter, level);
        self.emit_view(change)
    }

    /// Set the display date directly.
    pub fn set_display_date(&mut self, date: CalendarDate) -> Option<ViewChange> {
        let change = self.navigation.set_display_date(&self.adapter, date);
        self.emit_view(change)
    }

    /// Enable or disable drill-down on cell taps above Month view.
    pub fn set_view_navigation(&mut self, allow: bool) {
        self.allow_view_navigation = allow;
    }

    /// Set the selectability predicate consulted before mutating operations.
    pub fn set_selectable<F>(&mut self, predicate: F)
    where
        F: Fn(&CalendarDate) -> bool + Send + Sync + 'static,
    {
        self.selectable = Some(Arc::new(predicate));
    }

    /// Remove the selectability predicate.
    pub fn clear_selectable(&mut self) {
        self.selectable = None;
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Route one interaction event.
    ///
    /// Taps on cells select (or drill down above Month view when view
    /// navigation is allowed); taps on the header drill up; week-number
    /// interactions are defined no-ops. Returns what changed, or `None`
    /// when the interaction was filtered or redundant.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::AlmanacError::InvalidDate`] from range-endpoint
    /// normalization at the calendar system's span edges.
    pub fn handle_interaction(
        &mut self,
        event: &InteractionEvent,
    ) -> Result<Option<InteractionOutcome>> {
        match (event.element, event.gesture) {
            (CalendarElement::WeekNumber, _) => Ok(None),
            (CalendarElement::Header, GestureKind::Tap) => {
                Ok(self.drill_up().map(InteractionOutcome::View))
            }
            (CalendarElement::Header, _) => Ok(None),
            (CalendarElement::Cell, GestureKind::DoubleTap) => {
                let outcome = self.cell_interaction(event.date)?;
                if self.is_interactable(&event.date) {
                    self.activated.emit(event.date);
                }
                Ok(outcome)
            }
            (CalendarElement::Cell, _) => self.cell_interaction(event.date),
        }
    }

    /// Apply a caller-supplied range per swipe/drag gesture tick.
    ///
    /// See [`SelectionEngine::update_range_via_swipe`]; endpoints that fail
    /// the bounds or selectability checks make the tick a no-op.
    pub fn handle_swipe(
        &mut self,
        range: DateRange,
        is_new_gesture: bool,
    ) -> Result<Option<SelectionChange>> {
        for endpoint in [range.start(), range.end()].into_iter().flatten() {
            if !self.is_interactable(&endpoint) {
                return Ok(None);
            }
        }
        let level = self.view_level();
        let change =
            self.selection
                .update_range_via_swipe(range, is_new_gesture, level, &self.adapter)?;
        Ok(self.emit_selection(change))
    }

    /// Select a date programmatically, honoring the same bounds and
    /// selectability gates as a tap.
    pub fn select_date(&mut self, date: CalendarDate) -> Result<Option<SelectionChange>> {
        let change = self.apply_selection(date)?;
        Ok(self.emit_selection(change))
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) -> Option<SelectionChange> {
        let change = self.selection.clear();
        self.emit_selection(change)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Page back one unit of the current view level.
    pub fn page_backward(&mut self) -> Option<ViewChange> {
        let change = self.navigation.page_backward(&self.adapter);
        self.emit_view(change)
    }

    /// Page forward one unit of the current view level.
    pub fn page_forward(&mut self) -> Option<ViewChange> {
        let change = self.navigation.page_forward(&self.adapter);
        self.emit_view(change)
    }

    /// Drill to the next coarser view level.
    pub fn drill_up(&mut self) -> Option<ViewChange> {
        let change = self.navigation.drill_up(&self.adapter);
        self.emit_view(change)
    }

    /// Drill to the next finer view level, anchored at the given marker.
    pub fn drill_down(&mut self, marker: CalendarDate) -> Option<ViewChange> {
        let change = self.navigation.drill_down(&self.adapter, marker);
        self.emit_view(change)
    }

    /// Navigate the display date to today.
    pub fn show_today(&mut self) -> Option<ViewChange> {
        let change = self.navigation.show_today(&self.adapter);
        self.emit_view(change)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn cell_interaction(&mut self, date: CalendarDate) -> Result<Option<InteractionOutcome>> {
        if self.view_level() != ViewLevel::Month && self.allow_view_navigation {
            return Ok(self.drill_down(date).map(InteractionOutcome::View));
        }
        let change = self.apply_selection(date)?;
        Ok(self.emit_selection(change).map(InteractionOutcome::Selection))
    }

    /// Run the mode-appropriate selection operation, gated by bounds and
    /// the selectability predicate.
    fn apply_selection(&mut self, date: CalendarDate) -> Result<Option<SelectionChange>> {
        if !self.is_interactable(&date) {
            tracing::trace!(
                target: "horizon_almanac::selection",
                date = %date,
                "interaction filtered (out of range or not selectable)"
            );
            return Ok(None);
        }
        let level = self.view_level();
        match self.selection.mode() {
            SelectionMode::Single => Ok(self.selection.select_single(date)),
            SelectionMode::Multiple => Ok(self.selection.toggle_multiple(date, level)),
            SelectionMode::Range => self.selection.update_range(date, level, &self.adapter),
            SelectionMode::MultiRange => {
                self.selection.update_multi_range(date, level, &self.adapter)
            }
        }
    }

    /// Bounds and selectability gate applied before any mutating selection
    /// operation. A date failing it is treated as out of range: a silent
    /// no-op, no notification.
    fn is_interactable(&self, date: &CalendarDate) -> bool {
        let context = self.navigation.context();
        if date.iso() < context.min_date.iso() || date.iso() > context.max_date.iso() {
            return false;
        }
        if !self.adapter.is_supported(date.iso()) {
            return false;
        }
        match &self.selectable {
            Some(predicate) => predicate(date),
            None => true,
        }
    }

    fn emit_selection(&self, change: Option<SelectionChange>) -> Option<SelectionChange> {
        if let Some(change) = &change {
            self.selection_changed.emit(change.clone());
        }
        change
    }

    fn emit_view(&self, change: Option<ViewChange>) -> Option<ViewChange> {
        if let Some(change) = &change {
            self.view_changed.emit(change.clone());
        }
        change
    }
}

static_assertions::assert_impl_all!(CalendarEngine: Send, Sync);
