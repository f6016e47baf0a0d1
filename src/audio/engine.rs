use std::path::Path;
use std::time::Duration;

use crate::error::AudioError;

/// Playback contract a deck drives.
///
/// Positions are fractions of the loaded track's duration in `[0, 1]`.
/// Range checks on gain and speed belong to the control surface.
pub trait AudioEngine {
    /// Replace the current source with `path`, paused at the start.
    fn load(&mut self, path: &Path) -> Result<(), AudioError>;
    fn start(&mut self);
    /// Pause without rewinding.
    fn stop(&mut self);
    fn set_gain(&mut self, gain: f32);
    fn set_speed(&mut self, speed: f32);
    fn position_relative(&self) -> f64;
    fn set_position_relative(&mut self, position: f64);
    fn is_playing(&self) -> bool;
    /// Total length of the loaded track, when known.
    fn duration(&self) -> Option<Duration>;
}
