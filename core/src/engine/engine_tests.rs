//! Engine-level tests, driven by a manual clock.

use std::sync::{Arc, Mutex};

use herald_types::{Position, ProviderConfig, Severity};

use super::{ToastEngine, ToastOptions};
use crate::events::{ToastObserver, ToastSignal};
use crate::lifecycle::{ENTER_DELAY, EXIT_DELAY, ToastState};
use crate::scheduler::ManualClock;
use crate::store::ToastId;

const ENTER_MS: u64 = ENTER_DELAY.as_millis() as u64;
const EXIT_MS: u64 = EXIT_DELAY.as_millis() as u64;

fn engine() -> (ToastEngine<ManualClock>, ManualClock) {
    engine_with(ProviderConfig::default())
}

fn engine_with(config: ProviderConfig) -> (ToastEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let engine = ToastEngine::with_clock(config, clock.clone()).unwrap();
    (engine, clock)
}

/// Observer that records every signal batch for assertions.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<ToastSignal>>>);

impl Recorder {
    fn signals(&self) -> Vec<ToastSignal> {
        self.0.lock().unwrap().clone()
    }
}

impl ToastObserver for Recorder {
    fn handle_signals(&mut self, signals: &[ToastSignal]) {
        self.0.lock().unwrap().extend_from_slice(signals);
    }
}

#[test]
fn rejects_zero_max() {
    let config = ProviderConfig {
        max: 0,
        ..Default::default()
    };
    assert!(ToastEngine::new(config).is_err());
}

#[test]
fn open_applies_provider_defaults() {
    let (mut engine, _clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("hello"));
    let toast = engine.toast(id).unwrap();
    assert_eq!(toast.position, Position::TopRight);
    assert_eq!(toast.duration_ms, 5000);
    assert_eq!(toast.severity, Severity::Info);
    assert_eq!(toast.state, ToastState::Entering);
    assert!(toast.closable && toast.show_icon && toast.pause_on_hover);
}

#[test]
fn opening_beyond_max_evicts_the_oldest() {
    let (mut engine, _clock) = engine();
    let recorder = Recorder::default();
    engine.add_observer(Box::new(recorder.clone()));

    let ids: Vec<ToastId> = (0..6)
        .map(|i| engine.info(format!("toast {i}"), ()))
        .collect();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.len(), 1);
    let (position, group) = &snapshot[0];
    assert_eq!(*position, Position::TopRight);
    assert_eq!(group.len(), 5, "cap is 5 visible per position");
    let surviving: Vec<ToastId> = group.iter().map(|t| t.id).collect();
    assert_eq!(surviving, ids[1..].to_vec(), "the single oldest is gone");

    assert!(recorder.signals().contains(&ToastSignal::Evicted {
        id: ids[0],
        position: Position::TopRight,
    }));
}

#[test]
fn eviction_in_order_when_flooded() {
    let config = ProviderConfig {
        max: 2,
        ..Default::default()
    };
    let (mut engine, _clock) = engine_with(config);
    let recorder = Recorder::default();
    engine.add_observer(Box::new(recorder.clone()));

    let ids: Vec<ToastId> = (0..5).map(|i| engine.info(format!("{i}"), ())).collect();

    let evicted: Vec<ToastId> = recorder
        .signals()
        .iter()
        .filter_map(|s| match s {
            ToastSignal::Evicted { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(evicted, ids[..3].to_vec(), "oldest evicted first, in order");
}

#[test]
fn auto_dismiss_walks_enter_visible_exit_removed() {
    let (mut engine, clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("t").with_duration_ms(1000));

    clock.advance(ENTER_MS);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Visible);

    clock.advance(1000);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Exiting);

    clock.advance(EXIT_MS);
    engine.poll();
    assert!(engine.toast(id).is_none());
    assert!(engine.is_empty());
}

#[test]
fn pause_resume_conserves_total_visible_time() {
    let (mut engine, clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("t").with_duration_ms(2000));

    clock.advance(ENTER_MS);
    engine.poll();

    clock.advance(500);
    engine.pause(id);
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Paused);

    // A 10s wall-clock gap while paused must not count against the
    // budget.
    clock.advance(10_000);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Paused);

    engine.resume(id);
    clock.advance(1499);
    engine.poll();
    assert_eq!(
        engine.toast(id).unwrap().state,
        ToastState::Visible,
        "dismissal must come 1500ms after resume, not sooner"
    );
    clock.advance(1);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Exiting);
}

#[test]
fn close_is_idempotent_and_unknown_ids_are_benign() {
    let (mut engine, clock) = engine();
    let recorder = Recorder::default();
    engine.add_observer(Box::new(recorder.clone()));
    let id = engine.info("bye", ());

    engine.close(id);
    engine.close(id);
    engine.close(ToastId(999));
    engine.update(ToastId(999), ToastOptions::new().with_title("x"));

    let exits = recorder
        .signals()
        .iter()
        .filter(|s| {
            matches!(
                s,
                ToastSignal::StateChanged {
                    state: ToastState::Exiting,
                    ..
                }
            )
        })
        .count();
    assert_eq!(exits, 1, "no double transition");

    clock.advance(EXIT_MS);
    engine.poll();
    assert!(engine.is_empty());
}

#[test]
fn zero_duration_persists_until_closed() {
    let (mut engine, clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("pin").with_duration_ms(0));

    clock.advance(ENTER_MS);
    engine.poll();
    clock.advance(3_600_000);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Visible);
    assert!(engine.next_wakeup().is_none());

    engine.close(id);
    clock.advance(EXIT_MS);
    engine.poll();
    assert!(engine.is_empty());
}

#[test]
fn close_all_exits_every_position() {
    let (mut engine, _clock) = engine();
    let a = engine.info("a", ());
    let b = engine.open(
        ToastOptions::new()
            .with_title("b")
            .with_position(Position::BottomLeft),
    );
    engine.close_all();
    assert_eq!(engine.toast(a).unwrap().state, ToastState::Exiting);
    assert_eq!(engine.toast(b).unwrap().state, ToastState::Exiting);
}

#[test]
fn same_tick_expiries_exit_in_insertion_order() {
    let (mut engine, clock) = engine();
    let recorder = Recorder::default();
    engine.add_observer(Box::new(recorder.clone()));
    let first = engine.open(ToastOptions::new().with_title("1").with_duration_ms(1000));
    let second = engine.open(ToastOptions::new().with_title("2").with_duration_ms(1000));

    clock.advance(ENTER_MS);
    engine.poll();
    clock.advance(1000);
    engine.poll();

    let exits: Vec<ToastId> = recorder
        .signals()
        .iter()
        .filter_map(|s| match s {
            ToastSignal::StateChanged {
                id,
                state: ToastState::Exiting,
            } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(exits, vec![first, second]);
}

#[test]
fn moving_a_toast_into_a_full_position_evicts_its_oldest() {
    let (mut engine, _clock) = engine();
    let recorder = Recorder::default();
    engine.add_observer(Box::new(recorder.clone()));

    let residents: Vec<ToastId> = (0..5).map(|i| engine.info(format!("{i}"), ())).collect();
    let moved = engine.open(
        ToastOptions::new()
            .with_title("mover")
            .with_position(Position::BottomLeft),
    );

    engine.update(moved, ToastOptions::new().with_position(Position::TopRight));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.len(), 1);
    let (position, group) = &snapshot[0];
    assert_eq!(*position, Position::TopRight);
    assert_eq!(group.len(), 5, "the cap holds after the move");
    let ids: Vec<ToastId> = group.iter().map(|t| t.id).collect();
    assert!(ids.contains(&moved));
    assert!(!ids.contains(&residents[0]), "the oldest resident is evicted");

    assert!(recorder.signals().contains(&ToastSignal::Evicted {
        id: residents[0],
        position: Position::TopRight,
    }));
    assert!(engine.next_wakeup().is_some());
}

#[test]
fn moving_within_capacity_evicts_nothing() {
    let (mut engine, _clock) = engine();
    let recorder = Recorder::default();
    engine.add_observer(Box::new(recorder.clone()));
    let a = engine.info("a", ());
    let b = engine.open(
        ToastOptions::new()
            .with_title("b")
            .with_position(Position::BottomLeft),
    );

    engine.update(b, ToastOptions::new().with_position(Position::TopRight));

    assert_eq!(engine.len(), 2);
    assert!(engine.toast(a).is_some());
    assert!(
        !recorder
            .signals()
            .iter()
            .any(|s| matches!(s, ToastSignal::Evicted { .. }))
    );
}

#[test]
fn update_merges_fields_without_touching_others() {
    let (mut engine, _clock) = engine();
    let id = engine.info("original", "Title");

    engine.update(
        id,
        ToastOptions::new().with_description("edited"),
    );
    let toast = engine.toast(id).unwrap();
    assert_eq!(toast.description.as_deref(), Some("edited"));
    assert_eq!(toast.title.as_deref(), Some("Title"));
    assert_eq!(toast.severity, Severity::Info);
}

#[test]
fn update_duration_applies_forward_not_retroactively() {
    let (mut engine, clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("t").with_duration_ms(2000));

    clock.advance(ENTER_MS);
    engine.poll();
    clock.advance(500);
    engine.update(id, ToastOptions::new().with_duration_ms(9999));
    assert_eq!(engine.toast(id).unwrap().duration_ms, 9999);

    // 500ms already consumed: fires 9499ms after the update.
    clock.advance(9498);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Visible);
    clock.advance(1);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Exiting);
}

#[test]
fn update_duration_to_zero_pins_the_toast() {
    let (mut engine, clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("t").with_duration_ms(1000));
    clock.advance(ENTER_MS);
    engine.poll();

    engine.update(id, ToastOptions::new().with_duration_ms(0));
    clock.advance(1_000_000);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Visible);
}

#[test]
fn shorthand_second_argument_shapes_normalize() {
    let (mut engine, _clock) = engine();

    // Bare description.
    let a = engine.info("described", ());
    let toast = engine.toast(a).unwrap();
    assert_eq!(toast.description.as_deref(), Some("described"));
    assert!(toast.title.is_none());
    assert_eq!(toast.severity, Severity::Info);

    // Description + bare title.
    let b = engine.success("saved", "All good");
    let toast = engine.toast(b).unwrap();
    assert_eq!(toast.title.as_deref(), Some("All good"));
    assert_eq!(toast.severity, Severity::Success);

    // Description + options.
    let c = engine.warning("low disk", ToastOptions::new().with_duration_ms(0));
    let toast = engine.toast(c).unwrap();
    assert_eq!(toast.duration_ms, 0);
    assert_eq!(toast.severity, Severity::Warning);

    // Description + title + options; the options win on conflicts.
    let d = engine.error(
        "boom",
        ("Failure", ToastOptions::new().with_title("Override")),
    );
    let toast = engine.toast(d).unwrap();
    assert_eq!(toast.title.as_deref(), Some("Override"));
    assert_eq!(toast.severity, Severity::Danger);
}

#[test]
fn pause_on_hover_opt_out_is_honored() {
    let (mut engine, clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("t").with_duration_ms(1000));
    let patch = ToastOptions {
        pause_on_hover: Some(false),
        ..Default::default()
    };
    engine.update(id, patch);

    clock.advance(ENTER_MS);
    engine.poll();
    engine.pause(id);
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Visible);
}

#[test]
fn progress_decreases_while_visible_and_freezes_while_paused() {
    let (mut engine, clock) = engine();
    let id = engine.open(ToastOptions::new().with_title("t").with_duration_ms(1000));
    clock.advance(ENTER_MS);
    engine.poll();

    clock.advance(200);
    engine.poll();
    let p1 = engine.toast(id).unwrap().progress;
    clock.advance(300);
    engine.poll();
    let p2 = engine.toast(id).unwrap().progress;
    assert!(p1 > p2, "progress must be non-increasing: {p1} -> {p2}");

    engine.pause(id);
    let frozen = engine.toast(id).unwrap().progress;
    clock.advance(60_000);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().progress, frozen);
}

#[test]
fn clock_failure_degrades_to_persistent_toast() {
    let (mut engine, clock) = engine();
    clock.set_failing(true);
    let id = engine.info("still here", ());
    assert_eq!(
        engine.toast(id).unwrap().state,
        ToastState::Visible,
        "no timed enter phase without a clock"
    );

    clock.set_failing(false);
    clock.advance(3_600_000);
    engine.poll();
    assert_eq!(engine.toast(id).unwrap().state, ToastState::Visible);

    // Explicit close is unaffected.
    engine.close(id);
    clock.advance(EXIT_MS);
    engine.poll();
    assert!(engine.is_empty());
}

#[test]
fn contentless_toast_is_legal() {
    let (mut engine, _clock) = engine();
    let id = engine.open(ToastOptions::new());
    assert!(engine.toast(id).is_some());
    assert!(!engine.toast(id).unwrap().is_renderable());
}
