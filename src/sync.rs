//! Position synchronizer: the single arbiter of a deck's playhead.
//!
//! The engine's position is read-only input, the view's playhead is derived
//! output, and pointer gestures win over polling while they last.

mod state;

pub use state::{
    GestureEvent, GestureOutput, GesturePhase, Phase, Redraw, Seek, SyncState, TickInput,
};

use tracing::debug;

#[derive(Debug, Default)]
pub struct PositionSync {
    state: SyncState,
}

impl PositionSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Cached playhead in `[0, 1]`.
    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Poll step. Returns a redraw when the cached position moved.
    pub fn on_tick(&mut self, engine_position: f64, pointer_held: bool) -> Option<Redraw> {
        let (next, redraw) = state::tick(
            self.state,
            TickInput {
                engine_position,
                pointer_held,
            },
        );
        self.state = next;
        redraw
    }

    pub fn on_gesture(&mut self, event: GestureEvent) -> GestureOutput {
        let before = self.state.phase;
        let (next, out) = state::gesture(self.state, event);
        if next.phase != before {
            debug!(from = ?before, to = ?next.phase, "position sync transition");
        }
        self.state = next;
        out
    }

    pub fn on_gesture_start(&mut self, x: f64, width: f64) -> GestureOutput {
        self.on_gesture(GestureEvent::start(x, width))
    }

    pub fn on_gesture_move(&mut self, x: f64, width: f64) -> GestureOutput {
        self.on_gesture(GestureEvent::moved(x, width))
    }

    pub fn on_gesture_end(&mut self, x: f64, width: f64) -> GestureOutput {
        self.on_gesture(GestureEvent::end(x, width))
    }

    pub fn on_track_loaded(&mut self) {
        self.state = state::track_loaded(self.state);
    }
}

#[cfg(test)]
mod tests;
