//! Recording engine for tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AudioError;

use super::AudioEngine;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(PathBuf),
    Start,
    Stop,
    Gain(f32),
    Speed(f32),
    Seek(f64),
}

/// Engine double: remembers every command and reports a scripted position.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub calls: Vec<EngineCall>,
    pub position: f64,
    pub playing: bool,
    pub fail_load: bool,
    pub duration: Option<Duration>,
}

impl FakeEngine {
    pub fn seeks(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Seek(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl AudioEngine for FakeEngine {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        self.calls.push(EngineCall::Load(path.to_path_buf()));
        if self.fail_load {
            return Err(AudioError::Decode {
                path: path.to_path_buf(),
                reason: "scripted failure".into(),
            });
        }
        self.position = 0.0;
        Ok(())
    }

    fn start(&mut self) {
        self.calls.push(EngineCall::Start);
        self.playing = true;
    }

    fn stop(&mut self) {
        self.calls.push(EngineCall::Stop);
        self.playing = false;
    }

    fn set_gain(&mut self, gain: f32) {
        self.calls.push(EngineCall::Gain(gain));
    }

    fn set_speed(&mut self, speed: f32) {
        self.calls.push(EngineCall::Speed(speed));
    }

    fn position_relative(&self) -> f64 {
        self.position
    }

    fn set_position_relative(&mut self, position: f64) {
        self.calls.push(EngineCall::Seek(position));
        self.position = position;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}
