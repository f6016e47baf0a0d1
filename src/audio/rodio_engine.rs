use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::AudioError;

use super::engine::AudioEngine;
use super::sink::{create_sink_at, open_decoder, read_duration};

/// Opens the default output device once; every deck gets its own sink on it.
pub fn open_output() -> Result<Rc<OutputStream>, AudioError> {
    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| AudioError::OutputDevice(e.to_string()))?;
    // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
    // but noisy for a TUI app.
    stream.log_on_drop(false);
    Ok(Rc::new(stream))
}

struct Loaded {
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
    /// Where the current sink's source starts within the track.
    offset: Duration,
}

/// [`AudioEngine`] backed by a `rodio` sink.
pub struct RodioEngine {
    stream: Rc<OutputStream>,
    loaded: Option<Loaded>,
    gain: f32,
    speed: f32,
}

impl RodioEngine {
    pub fn new(stream: Rc<OutputStream>, gain: f32, speed: f32) -> Self {
        Self {
            stream,
            loaded: None,
            gain,
            speed,
        }
    }

    fn apply_levels(&self, sink: &Sink) {
        sink.set_volume(self.gain);
        sink.set_speed(self.speed);
    }

    /// Rebuild the sink starting at `target`; for decoders without seek support.
    fn reopen_at(&mut self, target: Duration) -> Result<(), AudioError> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Err(AudioError::NoTrackLoaded);
        };
        let was_playing = !loaded.sink.is_paused();
        let sink = create_sink_at(&self.stream, &loaded.path, target)?;
        self.apply_levels(&sink);
        if was_playing {
            sink.play();
        }

        if let Some(loaded) = self.loaded.as_mut() {
            loaded.sink.stop();
            loaded.sink = sink;
            loaded.offset = target;
        }
        Ok(())
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        let decoder = open_decoder(path)?;
        let duration = read_duration(path, &decoder);

        if let Some(old) = self.loaded.take() {
            old.sink.stop();
        }

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        self.apply_levels(&sink);
        sink.append(decoder);

        debug!(path = %path.display(), ?duration, "engine loaded");
        self.loaded = Some(Loaded {
            path: path.to_path_buf(),
            sink,
            duration,
            offset: Duration::ZERO,
        });
        Ok(())
    }

    fn start(&mut self) {
        if let Some(loaded) = &self.loaded {
            loaded.sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(loaded) = &self.loaded {
            loaded.sink.pause();
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(loaded) = &self.loaded {
            loaded.sink.set_volume(gain);
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if let Some(loaded) = &self.loaded {
            loaded.sink.set_speed(speed);
        }
    }

    fn position_relative(&self) -> f64 {
        let Some(loaded) = &self.loaded else {
            return 0.0;
        };
        let Some(total) = loaded.duration else {
            return 0.0;
        };
        if loaded.sink.empty() {
            return 1.0;
        }
        let pos = loaded.offset + loaded.sink.get_pos();
        (pos.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn set_position_relative(&mut self, position: f64) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let Some(total) = loaded.duration else {
            debug!("seek ignored, track length unknown");
            return;
        };
        let target = total.mul_f64(position.clamp(0.0, 1.0));

        // In-place seeks only make sense on the untouched decoder; once the
        // sink was rebuilt around a skipped source, rebuild again.
        let in_place = loaded.offset.is_zero()
            && !loaded.sink.empty()
            && loaded.sink.try_seek(target).is_ok();
        if in_place {
            return;
        }
        if let Err(e) = self.reopen_at(target) {
            warn!(error = %e, "seek failed");
        }
    }

    fn is_playing(&self) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|l| !l.sink.is_paused() && !l.sink.empty())
    }

    fn duration(&self) -> Option<Duration> {
        self.loaded.as_ref().and_then(|l| l.duration)
    }
}
