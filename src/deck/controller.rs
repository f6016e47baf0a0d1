use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::AudioEngine;
use crate::error::DeckError;
use crate::sync::{GestureOutput, PositionSync};
use crate::waveform::peaks::{self, PeaksReady};
use crate::waveform::{PointerKind, WaveformView};

/// One playback lane: an engine, its synchronizer and its waveform.
pub struct Deck<E: AudioEngine> {
    index: usize,
    engine: E,
    sync: PositionSync,
    waveform: WaveformView,
    loading: bool,
    track: Option<PathBuf>,
    gain: f32,
    speed: f32,
    peaks_tx: Option<Sender<PeaksReady>>,
}

impl<E: AudioEngine> Deck<E> {
    /// `index` is 1-based, as shown to the user.
    pub fn new(index: usize, mut engine: E, waveform: WaveformView, gain: f32, speed: f32) -> Self {
        engine.set_gain(gain);
        engine.set_speed(speed);
        Self {
            index,
            engine,
            sync: PositionSync::new(),
            waveform,
            loading: false,
            track: None,
            gain,
            speed,
            peaks_tx: None,
        }
    }

    /// Where waveform peaks computed in the background are delivered.
    /// Without it tracks load with no thumbnail.
    pub fn connect_peaks(&mut self, tx: Sender<PeaksReady>) {
        self.peaks_tx = Some(tx);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn sync(&self) -> &PositionSync {
        &self.sync
    }

    pub fn waveform(&self) -> &WaveformView {
        &self.waveform
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn track(&self) -> Option<&Path> {
        self.track.as_deref()
    }

    /// "Deck N" followed by the loaded track's name, if any.
    pub fn label(&self) -> String {
        match self.track.as_deref().and_then(Path::file_stem) {
            Some(name) => format!("Deck {}: {}", self.index, name.to_string_lossy()),
            None => format!("Deck {}", self.index),
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Elapsed and total time of the loaded track, derived from the cached position.
    pub fn times(&self) -> Option<(Duration, Duration)> {
        let total = self.engine.duration()?;
        Some((total.mul_f64(self.sync.position()), total))
    }

    /// Stop whatever plays, load `path` into engine and waveform, then play.
    ///
    /// A missing file leaves the deck untouched. The waveform is computed in
    /// the background and never holds up playback.
    pub fn load_track(&mut self, path: &Path) -> Result<(), DeckError> {
        if path.as_os_str().is_empty() || !path.is_file() {
            warn!(deck = self.index, path = %path.display(), "file does not exist");
            return Err(DeckError::MissingFile {
                deck: self.index,
                path: path.to_path_buf(),
            });
        }

        self.loading = true;
        self.engine.stop();
        if let Err(source) = self.engine.load(path) {
            warn!(deck = self.index, error = %source, "engine refused track");
            self.loading = false;
            return Err(DeckError::Engine {
                deck: self.index,
                source,
            });
        }

        let generation = self.waveform.begin_load();
        match &self.peaks_tx {
            Some(tx) => peaks::spawn_compute(
                path.to_path_buf(),
                self.waveform.resolution(),
                self.index,
                generation,
                tx.clone(),
            ),
            None => debug!(deck = self.index, "no peaks channel, playing without waveform"),
        }

        self.engine.start();
        self.sync.on_track_loaded();
        self.waveform.set_position_relative(self.sync.position());
        self.track = Some(path.to_path_buf());
        self.loading = false;

        info!(deck = self.index, path = %path.display(), "track loaded and playing");
        Ok(())
    }

    /// Drag-and-drop style load: only a single dropped file is accepted.
    pub fn files_dropped(&mut self, paths: &[PathBuf]) -> Option<Result<(), DeckError>> {
        match paths {
            [one] => Some(self.load_track(one)),
            _ => None,
        }
    }

    pub fn play(&mut self) {
        self.engine.start();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn toggle(&mut self) {
        if self.engine.is_playing() {
            self.engine.stop();
        } else {
            self.engine.start();
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        self.engine.set_gain(gain);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.engine.set_speed(speed);
    }

    /// Poll the engine through the synchronizer. Returns whether the playhead moved.
    pub fn tick(&mut self) -> bool {
        let engine_position = self.engine.position_relative();
        match self.sync.on_tick(engine_position, self.waveform.pointer_held()) {
            Some(redraw) => self.waveform.set_position_relative(redraw.position),
            None => false,
        }
    }

    /// Route pointer input over the waveform row. Returns whether the playhead moved.
    pub fn pointer(&mut self, kind: PointerKind, x: f64, width: f64) -> bool {
        let Some(event) = self.waveform.pointer(kind, x, width) else {
            return false;
        };
        let GestureOutput { redraw, seek } = self.sync.on_gesture(event);
        if let Some(seek) = seek {
            self.engine.set_position_relative(seek.position);
        }
        match redraw {
            Some(redraw) => self.waveform.set_position_relative(redraw.position),
            None => false,
        }
    }

    /// Apply background peaks. Returns whether the waveform changed.
    pub fn peaks_ready(&mut self, ready: PeaksReady) -> bool {
        if ready.generation == self.waveform.generation() {
            if let Err(e) = &ready.result {
                warn!(deck = self.index, error = %e, "playing without waveform");
            }
        }
        self.waveform.finish_load(ready.generation, ready.result)
    }

    /// End a press still held on this deck as if released off the row: the
    /// synchronizer goes back to polling and no seek is issued.
    pub fn release_pointer(&mut self) -> bool {
        if !self.waveform.pointer_held() {
            return false;
        }
        self.pointer(PointerKind::Up, 0.0, 0.0)
    }

    /// Cosmetic cadence: advance the waveform colour.
    pub fn animate(&mut self, hue_step: f32) {
        self.waveform.advance_hue(hue_step);
    }
}
