//! Utilities for creating `rodio` sinks from track paths.
//!
//! The helpers here encapsulate opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::AudioError;

pub(crate) type FileDecoder = Decoder<BufReader<File>>;

/// Open and decode `path`.
pub(crate) fn open_decoder(path: &Path) -> Result<FileDecoder, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Track length from the decoder, falling back to the file's tags.
pub(super) fn read_duration(path: &Path, decoder: &FileDecoder) -> Option<Duration> {
    decoder
        .total_duration()
        .or_else(|| {
            lofty::read_from_path(path)
                .ok()
                .map(|tagged| tagged.properties().duration())
        })
        .filter(|d| !d.is_zero())
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Used both for fresh loads and as the seek fallback for decoders that
/// cannot seek in place.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, AudioError> {
    // Starting at Duration::ZERO is a plain load.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.append(source);
    Ok(sink)
}
