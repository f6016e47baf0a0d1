//! Audio engine contract and its `rodio` implementation.

mod engine;
mod rodio_engine;
mod sink;

#[cfg(test)]
pub mod fake;

pub use engine::AudioEngine;
pub use rodio_engine::{RodioEngine, open_output};
pub(crate) use sink::open_decoder;
