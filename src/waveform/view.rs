use tracing::debug;

use crate::error::AudioError;
use crate::sync::GestureEvent;

/// Raw pointer input over the waveform row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Drag,
    Up,
}

/// Thumbnail plus playhead of one deck.
///
/// The playhead is whatever the synchronizer last told it; the view never
/// reaches into the engine.
#[derive(Debug)]
pub struct WaveformView {
    peaks: Vec<f32>,
    loaded: bool,
    pending: bool,
    /// Bumped on every track load; peaks for an older load are discarded.
    generation: u64,
    position: f64,
    pointer_held: bool,
    hue: f32,
    resolution: usize,
}

impl WaveformView {
    pub fn new(resolution: usize) -> Self {
        Self {
            peaks: Vec::new(),
            loaded: false,
            pending: false,
            generation: 0,
            position: 0.0,
            pointer_held: false,
            hue: 0.0,
            resolution: resolution.max(1),
        }
    }

    /// Drop the current thumbnail for a new track and return the generation
    /// its peaks must carry.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.peaks.clear();
        self.loaded = false;
        self.pending = true;
        self.position = 0.0;
        self.generation
    }

    /// Accept peaks computed for `generation`. Results for an older load are
    /// ignored. Returns whether the view changed.
    pub fn finish_load(&mut self, generation: u64, result: Result<Vec<f32>, AudioError>) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale peaks");
            return false;
        }
        self.pending = false;
        match result {
            Ok(p) => {
                debug!(columns = p.len(), "waveform loaded");
                self.peaks = p;
                self.loaded = true;
            }
            Err(e) => {
                debug!(error = %e, "waveform not loaded");
                self.peaks.clear();
                self.loaded = false;
            }
        }
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Peaks were requested and have not arrived yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move the playhead. Returns whether anything changed.
    pub fn set_position_relative(&mut self, position: f64) -> bool {
        if position == self.position {
            return false;
        }
        self.position = position;
        true
    }

    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    /// Translate pointer input at `x` within a row `width` wide into a
    /// gesture sample for the synchronizer.
    pub fn pointer(&mut self, kind: PointerKind, x: f64, width: f64) -> Option<GestureEvent> {
        match kind {
            PointerKind::Down => {
                self.pointer_held = true;
                Some(GestureEvent::start(x, width))
            }
            PointerKind::Drag if self.pointer_held => Some(GestureEvent::moved(x, width)),
            PointerKind::Up if self.pointer_held => {
                self.pointer_held = false;
                Some(GestureEvent::end(x, width))
            }
            PointerKind::Drag | PointerKind::Up => None,
        }
    }

    /// Current colour hue in `[0, 1)`.
    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Cosmetic colour cycling; unrelated to playback position.
    pub fn advance_hue(&mut self, step: f32) {
        self.hue += step;
        if self.hue >= 1.0 {
            self.hue = 0.0;
        }
    }
}
