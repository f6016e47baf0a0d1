//! Deck controller: turns "load this track" and pointer gestures into engine,
//! synchronizer and waveform calls.

mod controller;

pub use controller::Deck;

#[cfg(test)]
mod tests;
