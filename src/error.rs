//! Domain error types.
//!
//! Every failure in the player degrades to "no-op with notification": these
//! enums carry enough context for a log line or a status message, and none of
//! them is fatal to the process.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by an audio engine.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No output device could be opened.
    #[error("no audio output device: {0}")]
    OutputDevice(String),
    /// The file could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file was opened but could not be decoded.
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// An operation needed a loaded track.
    #[error("no track loaded")]
    NoTrackLoaded,
}

/// Errors raised by the track library.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Reading or writing the backing file failed.
    #[error("library file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The temporary file could not replace the backing file.
    #[error("failed to replace library file {path:?}: {source}")]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while loading a track onto a deck.
#[derive(Error, Debug)]
pub enum DeckError {
    /// The path is empty or does not name an existing regular file.
    #[error("deck {deck}: file does not exist: {path:?}")]
    MissingFile { deck: usize, path: PathBuf },
    /// The engine refused the file.
    #[error("deck {deck}: {source}")]
    Engine {
        deck: usize,
        #[source]
        source: AudioError,
    },
}
