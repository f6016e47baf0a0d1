use super::*;
use crate::audio::fake::{EngineCall, FakeEngine};
use crate::error::DeckError;
use crate::sync::Phase;
use crate::waveform::{PeaksReady, PointerKind, WaveformView};
use std::sync::mpsc;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn deck() -> Deck<FakeEngine> {
    Deck::new(1, FakeEngine::default(), WaveformView::new(32), 0.8, 1.0)
}

fn fake_track(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let p = dir.path().join(name);
    std::fs::write(&p, b"the fake engine does not decode this").unwrap();
    p
}

#[test]
fn new_deck_applies_initial_levels() {
    let d = deck();
    assert_eq!(
        d.engine().calls,
        vec![EngineCall::Gain(0.8), EngineCall::Speed(1.0)]
    );
    assert_eq!(d.label(), "Deck 1");
    assert_eq!(d.sync().phase(), Phase::Idle);
}

#[test]
fn missing_file_leaves_engine_untouched() {
    let mut d = deck();
    d.engine_mut().calls.clear();

    let err = d.load_track(Path::new("/definitely/not/here.mp3")).unwrap_err();
    assert!(matches!(err, DeckError::MissingFile { deck: 1, .. }));
    let err = d.load_track(Path::new("")).unwrap_err();
    assert!(matches!(err, DeckError::MissingFile { .. }));

    assert!(d.engine().calls.is_empty());
    assert!(d.track().is_none());
    assert!(!d.is_loading());
}

#[test]
fn load_stops_loads_then_starts_even_without_waveform() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "Opening Set.mp3");
    let mut d = deck();
    d.engine_mut().calls.clear();

    d.load_track(&path).unwrap();

    assert_eq!(
        d.engine().calls,
        vec![
            EngineCall::Stop,
            EngineCall::Load(path.clone()),
            EngineCall::Start
        ]
    );
    // No peaks channel is connected, so there is no thumbnail.
    assert!(!d.waveform().is_loaded());
    assert!(d.is_playing());
    assert_eq!(d.sync().phase(), Phase::Polling);
    assert_eq!(d.sync().position(), 0.0);
    assert_eq!(d.label(), "Deck 1: Opening Set");
    assert!(!d.is_loading());
}

#[test]
fn waveform_is_computed_in_the_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "not audio.mp3");
    let (tx, rx) = mpsc::channel();
    let mut d = deck();
    d.connect_peaks(tx);

    d.load_track(&path).unwrap();
    // Playback starts before the thumbnail exists.
    assert!(d.is_playing());
    assert!(d.waveform().is_pending());
    assert!(!d.waveform().is_loaded());

    let ready = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(ready.deck, 1);
    assert!(ready.result.is_err());
    assert!(d.peaks_ready(ready));
    assert!(!d.waveform().is_pending());
    assert!(!d.waveform().is_loaded());
    assert!(d.is_playing());
}

#[test]
fn peaks_from_a_replaced_track_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let first = fake_track(&dir, "first.mp3");
    let second = fake_track(&dir, "second.mp3");
    let mut d = deck();

    d.load_track(&first).unwrap();
    d.load_track(&second).unwrap();

    let stale = PeaksReady {
        deck: 1,
        generation: 1,
        result: Ok(vec![1.0; 4]),
    };
    assert!(!d.peaks_ready(stale));
    assert!(d.waveform().is_pending());

    let current = PeaksReady {
        deck: 1,
        generation: 2,
        result: Ok(vec![0.5; 4]),
    };
    assert!(d.peaks_ready(current));
    assert!(d.waveform().is_loaded());
    assert_eq!(d.waveform().peaks(), &[0.5f32; 4]);
}

#[test]
fn engine_failure_is_reported_without_retry() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "bad.mp3");
    let mut d = deck();
    d.engine_mut().fail_load = true;
    d.engine_mut().calls.clear();

    let err = d.load_track(&path).unwrap_err();
    assert!(matches!(err, DeckError::Engine { deck: 1, .. }));
    assert_eq!(
        d.engine().calls,
        vec![EngineCall::Stop, EngineCall::Load(path)]
    );
    assert!(d.track().is_none());
    assert!(!d.is_loading());
}

#[test]
fn tick_moves_waveform_playhead_from_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "a.mp3");
    let mut d = deck();
    d.load_track(&path).unwrap();

    d.engine_mut().position = 0.4;
    assert!(d.tick());
    assert_eq!(d.waveform().position(), 0.4);
    assert!(!d.tick());
}

#[test]
fn drag_on_waveform_seeks_engine_and_blocks_polling() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "a.mp3");
    let mut d = deck();
    d.load_track(&path).unwrap();
    d.engine_mut().calls.clear();

    assert!(d.pointer(PointerKind::Down, 25.0, 100.0));
    // Engine drifts while the user drags; the playhead must not follow it.
    d.engine_mut().position = 0.9;
    assert!(!d.tick());
    assert!(d.pointer(PointerKind::Drag, 75.0, 100.0));
    assert!(!d.tick());
    d.pointer(PointerKind::Up, 75.0, 100.0);

    assert_eq!(d.engine().seeks(), vec![0.25, 0.75, 0.75]);
    assert_eq!(d.waveform().position(), 0.75);
    assert_eq!(d.sync().phase(), Phase::Polling);
}

#[test]
fn pointer_before_any_track_does_not_seek() {
    let mut d = deck();
    d.engine_mut().calls.clear();

    assert!(!d.pointer(PointerKind::Down, 10.0, 100.0));
    d.pointer(PointerKind::Up, 10.0, 100.0);
    assert!(d.engine().seeks().is_empty());
}

#[test]
fn zero_width_press_issues_no_seek() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "a.mp3");
    let mut d = deck();
    d.load_track(&path).unwrap();
    d.engine_mut().calls.clear();

    assert!(!d.pointer(PointerKind::Down, 10.0, 0.0));
    assert!(d.engine().seeks().is_empty());
    assert_eq!(d.sync().position(), 0.0);
}

#[test]
fn dropping_several_files_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let a = fake_track(&dir, "a.mp3");
    let b = fake_track(&dir, "b.mp3");
    let mut d = deck();

    assert!(d.files_dropped(&[a.clone(), b]).is_none());
    assert!(d.track().is_none());

    assert!(matches!(d.files_dropped(&[a.clone()]), Some(Ok(()))));
    assert_eq!(d.track(), Some(a.as_path()));
}

#[test]
fn transport_passes_through() {
    let mut d = deck();
    d.engine_mut().calls.clear();

    d.play();
    d.toggle();
    d.set_gain(0.3);
    d.set_speed(1.5);
    d.stop();

    assert_eq!(
        d.engine().calls,
        vec![
            EngineCall::Start,
            EngineCall::Stop,
            EngineCall::Gain(0.3),
            EngineCall::Speed(1.5),
            EngineCall::Stop
        ]
    );
    assert_eq!(d.gain(), 0.3);
    assert_eq!(d.speed(), 1.5);
}

#[test]
fn times_follow_cached_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "a.mp3");
    let mut d = deck();
    d.engine_mut().duration = Some(Duration::from_secs(200));
    d.load_track(&path).unwrap();

    d.engine_mut().position = 0.5;
    d.tick();
    assert_eq!(
        d.times(),
        Some((Duration::from_secs(100), Duration::from_secs(200)))
    );
}

#[test]
fn animation_does_not_touch_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_track(&dir, "a.mp3");
    let mut d = deck();
    d.load_track(&path).unwrap();
    d.engine_mut().position = 0.2;
    d.tick();

    for _ in 0..10 {
        d.animate(0.05);
    }
    assert_eq!(d.sync().position(), 0.2);
    assert_eq!(d.waveform().position(), 0.2);
}
