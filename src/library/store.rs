//! Line-oriented backing file for the track library.
//!
//! One absolute path per line, no header, no escaping. Writes go to a
//! temporary sibling file which then replaces the real one, so a crash never
//! leaves a half-written library behind.

use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::LibraryError;

use super::model::Track;

#[derive(Debug, Clone)]
pub struct LibraryStore {
    path: PathBuf,
}

impl LibraryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the paths stored in the backing file, one per line.
    ///
    /// Lines are decoded one by one from raw bytes, so an odd byte sequence
    /// only affects its own line. Surrounding ASCII whitespace is trimmed and
    /// blank lines are skipped. A missing file reads as an empty library.
    pub fn read_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LibraryError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        Ok(bytes
            .split(|&b| b == b'\n')
            .map(<[u8]>::trim_ascii)
            .filter(|l| !l.is_empty())
            .filter_map(|l| {
                let path = path_from_bytes(l);
                if path.is_none() {
                    debug!(line = %String::from_utf8_lossy(l), "skipping undecodable library line");
                }
                path
            })
            .collect())
    }

    /// Overwrite the backing file with `tracks`, one path per line.
    pub fn write(&self, tracks: &[Track]) -> Result<(), LibraryError> {
        let io_err = |source| LibraryError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        {
            let mut w = io::BufWriter::new(tmp.as_file_mut());
            for track in tracks {
                w.write_all(&path_bytes(track.path())).map_err(io_err)?;
                w.write_all(b"\n").map_err(io_err)?;
            }
            w.flush().map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;

        tmp.persist(&self.path)
            .map_err(|e| LibraryError::Replace {
                path: self.path.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(bytes).ok().map(PathBuf::from)
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_str() {
        Some(s) => Cow::Borrowed(s.as_bytes()),
        None => Cow::Owned(path.to_string_lossy().into_owned().into_bytes()),
    }
}
