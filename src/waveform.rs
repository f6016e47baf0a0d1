//! Waveform thumbnail and playhead for a deck.

pub mod peaks;
mod view;

pub use peaks::PeaksReady;
pub use view::{PointerKind, WaveformView};
