//! End-to-end scenarios exercising selection, windows, and navigation
//! through the engine facade.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use horizon_almanac::prelude::*;

fn engine_at(y: i32, m: u8, d: u8) -> CalendarEngine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let adapter = CalendarAdapter::new(CalendarSystem::Gregorian);
    let display = adapter.compose(y, m, d).unwrap();
    CalendarEngine::new(CalendarSystem::Gregorian)
        .with_display_date(display)
        .with_today(display)
}

fn date(engine: &CalendarEngine, y: i32, m: u8, d: u8) -> CalendarDate {
    engine.adapter().compose(y, m, d).unwrap()
}

#[test]
fn month_window_february_2024_sunday_start() {
    let engine = engine_at(2024, 2, 15);
    let window = engine.visible_window();

    assert_eq!(window.len(), 42);
    assert_eq!(
        window.first().unwrap().date.iso(),
        NaiveDate::from_ymd_opt(2024, 1, 28).unwrap()
    );
    assert_eq!(
        window.last().unwrap().date.iso(),
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    );

    let leading: Vec<_> = window
        .entries()
        .iter()
        .filter(|e| e.placement == DatePlacement::Leading)
        .map(|e| e.date.day())
        .collect();
    let trailing: Vec<_> = window
        .entries()
        .iter()
        .filter(|e| e.placement == DatePlacement::Trailing)
        .map(|e| e.date.day())
        .collect();
    assert_eq!(leading, vec![28, 29, 30, 31]);
    assert_eq!(trailing, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn window_containment_for_every_week_count() {
    for weeks in 1..=6u8 {
        let mut engine = engine_at(2024, 2, 15);
        engine.set_visible_weeks(weeks);
        let window = engine.visible_window();
        assert_eq!(window.len(), usize::from(weeks) * 7);
        if weeks < 6 {
            assert_eq!(window.current().count(), window.len());
        } else {
            assert!(window.current().count() < window.len());
        }
    }
}

#[test]
fn range_default_policy_swaps_endpoints() {
    let mut engine = engine_at(2024, 3, 15);
    engine.set_selection_mode(SelectionMode::Range);

    engine
        .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 3, 10)))
        .unwrap();
    let pending = engine.selection_state().selected_range().unwrap();
    assert!(pending.is_pending());
    assert_eq!(pending.start().unwrap().day(), 10);

    engine
        .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 3, 5)))
        .unwrap();
    let resolved = engine.selection_state().selected_range().unwrap();
    assert_eq!(resolved.start().unwrap().day(), 5);
    assert_eq!(resolved.end().unwrap().day(), 10);
    assert!(resolved.is_valid());
}

#[test]
fn multi_range_tap_inside_removes_range() {
    let mut engine = engine_at(2024, 1, 15);
    engine.set_selection_mode(SelectionMode::MultiRange);

    engine
        .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 1, 5)))
        .unwrap();
    engine
        .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 1, 10)))
        .unwrap();
    assert_eq!(engine.selection_state().selected_ranges().len(), 1);

    engine
        .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 1, 7)))
        .unwrap();
    assert!(engine.selection_state().selected_ranges().is_empty());
}

#[test]
fn multiple_mode_toggle_emits_two_diffs() {
    let mut engine = engine_at(2024, 4, 15);
    engine.set_selection_mode(SelectionMode::Multiple);

    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_clone = changes.clone();
    engine.selection_changed.connect(move |change: &SelectionChange| {
        changes_clone.lock().unwrap().push(change.clone());
    });

    let target = date(&engine, 2024, 4, 1);
    engine.handle_interaction(&InteractionEvent::tap(target)).unwrap();
    engine.handle_interaction(&InteractionEvent::tap(target)).unwrap();

    assert!(engine.selection_state().is_empty());
    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].old.selected_dates(), &[]);
    assert_eq!(changes[0].new.selected_dates(), &[target]);
    assert_eq!(changes[1].old.selected_dates(), &[target]);
    assert_eq!(changes[1].new.selected_dates(), &[]);
}

#[test]
fn decade_window_2024_markers() {
    let mut engine = engine_at(2024, 6, 1);
    engine.set_view_level(ViewLevel::Decade);

    let window = engine.visible_window();
    let years: Vec<_> = window.entries().iter().map(|e| e.date.year()).collect();
    assert_eq!(
        years,
        vec![2019, 2020, 2021, 2022, 2023, 2024, 2025, 2026, 2027, 2028, 2029, 2030]
    );
    assert_eq!(window.entries()[0].placement, DatePlacement::Leading);
    assert_eq!(window.entries()[11].placement, DatePlacement::Trailing);
    assert_eq!(window.current().count(), 10);
}

#[test]
fn select_single_is_idempotent() {
    let mut engine = engine_at(2024, 2, 15);
    let notifications = Arc::new(AtomicUsize::new(0));
    let notifications_clone = notifications.clone();
    engine.selection_changed.connect(move |_| {
        notifications_clone.fetch_add(1, Ordering::SeqCst);
    });

    let target = date(&engine, 2024, 2, 10);
    engine.select_date(target).unwrap();
    engine.select_date(target).unwrap();
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn page_forward_at_max_date_is_a_noop() {
    let mut engine = engine_at(2024, 2, 15);
    engine.set_max_date(date(&engine, 2024, 2, 29));

    let display_before = engine.display_date();
    let window_before = engine.visible_window().clone();

    assert!(!engine.can_go_forward());
    assert!(engine.page_forward().is_none());
    assert_eq!(engine.display_date(), display_before);
    assert_eq!(*engine.visible_window(), window_before);
}

#[test]
fn resolved_ranges_keep_endpoints_ordered_under_every_policy() {
    let directions = [
        RangeDirection::Default,
        RangeDirection::Forward,
        RangeDirection::Backward,
        RangeDirection::Both,
        RangeDirection::None,
    ];
    let days = [12u8, 3, 27, 8, 19, 8, 1, 30];

    for direction in directions {
        let mut engine = engine_at(2024, 5, 15);
        engine.set_selection_mode(SelectionMode::Range);
        engine.set_range_direction(direction);

        for d in days {
            engine
                .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 5, d)))
                .unwrap();
            if let Some(range) = engine.selection_state().selected_range() {
                if range.is_resolved() {
                    assert!(range.is_valid(), "{direction:?} produced an inverted range");
                }
            }
        }
    }
}

#[test]
fn multi_range_list_never_overlaps() {
    let mut engine = engine_at(2024, 7, 15);
    engine.set_selection_mode(SelectionMode::MultiRange);

    for d in [4u8, 9, 14, 20, 11, 2, 28, 6, 23] {
        engine
            .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 7, d)))
            .unwrap();
    }

    let resolved: Vec<_> = engine
        .selection_state()
        .selected_ranges()
        .iter()
        .filter(|r| r.is_resolved())
        .copied()
        .collect();
    for (i, left) in resolved.iter().enumerate() {
        for right in &resolved[i + 1..] {
            assert!(!left.overlaps(right), "ranges {left:?} and {right:?} overlap");
        }
    }
}

#[test]
fn drill_cycle_round_trips_levels() {
    let mut engine = engine_at(2024, 2, 15);

    let views = Arc::new(Mutex::new(Vec::new()));
    let views_clone = views.clone();
    engine.view_changed.connect(move |change: &ViewChange| {
        views_clone.lock().unwrap().push((change.old_level, change.new_level));
    });

    engine.drill_up();
    engine.drill_up();
    engine.drill_up();
    assert_eq!(engine.view_level(), ViewLevel::Century);
    // Drilling up at Century is a no-op with no notification.
    assert!(engine.drill_up().is_none());

    let marker = date(&engine, 2024, 1, 1);
    engine.drill_down(marker);
    engine.drill_down(marker);
    engine.drill_down(marker);
    assert_eq!(engine.view_level(), ViewLevel::Month);
    assert!(engine.drill_down(marker).is_none());

    let views = views.lock().unwrap();
    assert_eq!(views.len(), 6);
    assert_eq!(views[0], (ViewLevel::Month, ViewLevel::Year));
    assert_eq!(views[5], (ViewLevel::Year, ViewLevel::Month));
}

#[test]
fn hijri_engine_pages_hijri_months() {
    let adapter = CalendarAdapter::new(CalendarSystem::Hijri);
    let display = adapter.compose(1445, 9, 10).unwrap();
    let mut engine = CalendarEngine::new(CalendarSystem::Hijri)
        .with_display_date(display)
        .with_today(display);

    assert_eq!(engine.display_date().month(), 9);
    engine.page_forward();
    assert_eq!(engine.display_date().year(), 1445);
    assert_eq!(engine.display_date().month(), 10);

    // The month grid decomposes under the Hijri system.
    let window = engine.visible_window();
    assert_eq!(window.len(), 42);
    assert!(window.current().all(|e| e.date.month() == 10));
}

#[test]
fn swipe_gesture_builds_and_replaces_ranges() {
    let mut engine = engine_at(2024, 3, 15);
    engine.set_selection_mode(SelectionMode::Range);

    let tick = DateRange::resolved(date(&engine, 2024, 3, 5), date(&engine, 2024, 3, 8));
    engine.handle_swipe(tick, true).unwrap();
    let range = engine.selection_state().selected_range().unwrap();
    assert_eq!(range.start().unwrap().day(), 5);
    assert_eq!(range.end().unwrap().day(), 8);

    // Continuation tick under the default policy replaces the range.
    let tick = DateRange::resolved(date(&engine, 2024, 3, 5), date(&engine, 2024, 3, 12));
    engine.handle_swipe(tick, false).unwrap();
    let range = engine.selection_state().selected_range().unwrap();
    assert_eq!(range.end().unwrap().day(), 12);

    // A repeated identical tick is a no-op.
    assert!(engine.handle_swipe(tick, false).unwrap().is_none());
}

#[test]
fn year_view_range_snaps_to_month_units() {
    let mut engine = engine_at(2024, 1, 15);
    engine.set_selection_mode(SelectionMode::Range);
    engine.set_view_navigation(false);
    engine.set_view_level(ViewLevel::Year);

    engine
        .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 3, 1)))
        .unwrap();
    engine
        .handle_interaction(&InteractionEvent::tap(date(&engine, 2024, 6, 1)))
        .unwrap();

    let range = engine.selection_state().selected_range().unwrap();
    assert_eq!(range.start().unwrap().iso(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(range.end().unwrap().iso(), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
}

#[test]
fn navigation_flags_are_recomputed_on_bounds_change() {
    let mut engine = engine_at(2024, 6, 15);
    assert!(engine.can_go_backward());
    assert!(engine.can_go_forward());

    engine.set_date_range(date(&engine, 2024, 6, 1), date(&engine, 2024, 6, 30));
    assert!(!engine.can_go_backward());
    assert!(!engine.can_go_forward());

    engine.set_date_range(date(&engine, 2024, 1, 1), date(&engine, 2024, 12, 31));
    assert!(engine.can_go_backward());
    assert!(engine.can_go_forward());
}
