//! Pure transitions of the position synchronizer.
//!
//! Every function here maps `(state, input)` to `(state, output)` and touches
//! nothing else; the deck applies the outputs to its engine and view.

/// Where the synchronizer is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing loaded; ticks and gestures are ignored.
    #[default]
    Idle,
    /// Normal playback display, position follows the engine.
    Polling,
    /// A pointer gesture owns the position; engine readings are discarded.
    Seeking,
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct SyncState {
    pub phase: Phase,
    /// Cached playhead, always within `[0, 1]`.
    pub position: f64,
}

/// What one poll of the engine saw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickInput {
    pub engine_position: f64,
    /// The view is receiving pointer input (button held) right now.
    pub pointer_held: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

/// A pointer gesture sample in view coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    pub x: f64,
    pub width: f64,
}

impl GestureEvent {
    pub fn start(x: f64, width: f64) -> Self {
        Self {
            phase: GesturePhase::Start,
            x,
            width,
        }
    }

    pub fn moved(x: f64, width: f64) -> Self {
        Self {
            phase: GesturePhase::Move,
            x,
            width,
        }
    }

    pub fn end(x: f64, width: f64) -> Self {
        Self {
            phase: GesturePhase::End,
            x,
            width,
        }
    }

    /// `x / width` clamped to `[0, 1]`, or `None` for an unusable width.
    pub fn relative(&self) -> Option<f64> {
        if !self.width.is_finite() || self.width <= 0.0 || !self.x.is_finite() {
            return None;
        }
        Some((self.x / self.width).clamp(0.0, 1.0))
    }
}

/// Ask the view to repaint its playhead at `position`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Redraw {
    pub position: f64,
}

/// Ask the engine to jump to `position`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Seek {
    pub position: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GestureOutput {
    pub redraw: Option<Redraw>,
    pub seek: Option<Seek>,
}

/// One poll of the engine.
pub fn tick(state: SyncState, input: TickInput) -> (SyncState, Option<Redraw>) {
    if state.phase != Phase::Polling || input.pointer_held {
        return (state, None);
    }

    let engine = input.engine_position;
    if !engine.is_finite() {
        return (state, None);
    }
    let engine = engine.clamp(0.0, 1.0);
    if engine == state.position {
        return (state, None);
    }

    let next = SyncState {
        position: engine,
        ..state
    };
    (next, Some(Redraw { position: engine }))
}

/// Feed one gesture sample.
pub fn gesture(state: SyncState, event: GestureEvent) -> (SyncState, GestureOutput) {
    let accepts = match event.phase {
        GesturePhase::Start => state.phase != Phase::Idle,
        GesturePhase::Move | GesturePhase::End => state.phase == Phase::Seeking,
    };
    if !accepts {
        return (state, GestureOutput::default());
    }

    let phase = match event.phase {
        GesturePhase::Start | GesturePhase::Move => Phase::Seeking,
        GesturePhase::End => Phase::Polling,
    };

    match event.relative() {
        Some(position) => (
            SyncState { phase, position },
            GestureOutput {
                redraw: Some(Redraw { position }),
                seek: Some(Seek { position }),
            },
        ),
        // Unusable width: leave the position alone. A release still ends the
        // gesture so polling can resume.
        None if event.phase == GesturePhase::End => (
            SyncState {
                phase: Phase::Polling,
                ..state
            },
            GestureOutput::default(),
        ),
        None => (state, GestureOutput::default()),
    }
}

/// A new track is on the deck: playhead to zero, any gesture dropped.
pub fn track_loaded(_state: SyncState) -> SyncState {
    SyncState {
        phase: Phase::Polling,
        position: 0.0,
    }
}
