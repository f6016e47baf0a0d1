use super::*;

fn loaded() -> PositionSync {
    let mut sync = PositionSync::new();
    sync.on_track_loaded();
    sync
}

#[test]
fn starts_idle_and_ignores_ticks_and_gestures() {
    let mut sync = PositionSync::new();
    assert_eq!(sync.phase(), Phase::Idle);

    assert_eq!(sync.on_tick(0.5, false), None);
    assert_eq!(sync.on_gesture_start(10.0, 100.0), GestureOutput::default());
    assert_eq!(sync.phase(), Phase::Idle);
    assert_eq!(sync.position(), 0.0);
}

#[test]
fn track_load_moves_to_polling_at_zero() {
    let mut sync = loaded();
    assert_eq!(sync.phase(), Phase::Polling);
    assert_eq!(sync.position(), 0.0);

    let _ = sync.on_tick(0.4, false);
    let _ = sync.on_gesture_start(80.0, 100.0);
    sync.on_track_loaded();
    assert_eq!(sync.phase(), Phase::Polling);
    assert_eq!(sync.position(), 0.0);
}

#[test]
fn tick_follows_engine_and_redraws_only_on_change() {
    let mut sync = loaded();

    assert_eq!(sync.on_tick(0.25, false), Some(Redraw { position: 0.25 }));
    assert_eq!(sync.position(), 0.25);
    assert_eq!(sync.on_tick(0.25, false), None);
    assert_eq!(sync.on_tick(0.3, false), Some(Redraw { position: 0.3 }));
}

#[test]
fn tick_clamps_and_ignores_non_finite_engine_readings() {
    let mut sync = loaded();

    assert_eq!(sync.on_tick(1.7, false), Some(Redraw { position: 1.0 }));
    assert_eq!(sync.on_tick(f64::NAN, false), None);
    assert_eq!(sync.position(), 1.0);
}

#[test]
fn tick_is_skipped_while_pointer_is_held() {
    let mut sync = loaded();
    assert_eq!(sync.on_tick(0.6, true), None);
    assert_eq!(sync.position(), 0.0);
    assert_eq!(sync.on_tick(0.6, false), Some(Redraw { position: 0.6 }));
}

#[test]
fn ticks_during_seeking_never_change_position() {
    let mut sync = loaded();
    let _ = sync.on_gesture_start(30.0, 100.0);
    assert_eq!(sync.phase(), Phase::Seeking);

    for engine in [0.0, 0.9, 0.31, 1.0, 0.5] {
        assert_eq!(sync.on_tick(engine, false), None);
        assert_eq!(sync.on_tick(engine, true), None);
        assert_eq!(sync.position(), 0.3);
    }

    let _ = sync.on_gesture_move(45.0, 100.0);
    assert_eq!(sync.on_tick(0.99, false), None);
    assert_eq!(sync.position(), 0.45);
}

#[test]
fn drag_scenario_ends_with_one_terminal_seek() {
    let width = 400.0;
    let mut sync = loaded();

    let start = sync.on_gesture_start(0.25 * width, width);
    assert_eq!(start.seek, Some(Seek { position: 0.25 }));
    assert_eq!(start.redraw, Some(Redraw { position: 0.25 }));

    let moved = sync.on_gesture_move(0.75 * width, width);
    assert_eq!(moved.seek, Some(Seek { position: 0.75 }));
    assert_eq!(sync.phase(), Phase::Seeking);

    let end = sync.on_gesture_end(0.75 * width, width);
    assert_eq!(end.seek, Some(Seek { position: 0.75 }));
    assert_eq!(sync.position(), 0.75);
    assert_eq!(sync.phase(), Phase::Polling);

    // Polling resumed: a late release sample does nothing.
    assert_eq!(sync.on_gesture_end(0.1 * width, width), GestureOutput::default());
}

#[test]
fn gesture_positions_are_clamped() {
    let mut sync = loaded();
    let out = sync.on_gesture_start(-20.0, 100.0);
    assert_eq!(out.seek, Some(Seek { position: 0.0 }));
    let out = sync.on_gesture_move(250.0, 100.0);
    assert_eq!(out.seek, Some(Seek { position: 1.0 }));
}

#[test]
fn zero_width_start_is_a_no_op() {
    let mut sync = loaded();
    let _ = sync.on_tick(0.4, false);

    let out = sync.on_gesture_start(10.0, 0.0);
    assert_eq!(out, GestureOutput::default());
    assert_eq!(sync.position(), 0.4);
    assert_eq!(sync.phase(), Phase::Polling);

    let out = sync.on_gesture_start(10.0, f64::NAN);
    assert_eq!(out, GestureOutput::default());
}

#[test]
fn zero_width_move_keeps_gesture_and_position() {
    let mut sync = loaded();
    let _ = sync.on_gesture_start(20.0, 100.0);

    assert_eq!(sync.on_gesture_move(50.0, 0.0), GestureOutput::default());
    assert_eq!(sync.phase(), Phase::Seeking);
    assert_eq!(sync.position(), 0.2);
}

#[test]
fn zero_width_end_releases_without_seeking() {
    let mut sync = loaded();
    let _ = sync.on_gesture_start(20.0, 100.0);

    assert_eq!(sync.on_gesture_end(50.0, 0.0), GestureOutput::default());
    assert_eq!(sync.phase(), Phase::Polling);
    assert_eq!(sync.position(), 0.2);
}

#[test]
fn move_without_start_is_ignored() {
    let mut sync = loaded();
    assert_eq!(sync.on_gesture_move(50.0, 100.0), GestureOutput::default());
    assert_eq!(sync.phase(), Phase::Polling);
    assert_eq!(sync.position(), 0.0);
}

#[test]
fn pure_tick_leaves_input_state_untouched() {
    let before = SyncState {
        phase: Phase::Polling,
        position: 0.1,
    };
    let (after, redraw) = state::tick(
        before,
        TickInput {
            engine_position: 0.2,
            pointer_held: false,
        },
    );
    assert_eq!(before.position, 0.1);
    assert_eq!(after.position, 0.2);
    assert_eq!(redraw, Some(Redraw { position: 0.2 }));
}
