use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use tracing::{debug, info, warn};

use crate::error::LibraryError;

use super::model::Track;
use super::store::LibraryStore;

/// "Load this track" message sent when a library row is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
}

/// Result of a mutating library call.
///
/// The in-memory change always stands; `persist_error` reports that the
/// backing file could not be rewritten and is stale until the next mutation.
#[must_use]
#[derive(Debug, Default)]
pub struct Outcome {
    /// Number of tracks added or removed; for `load`, stale entries dropped.
    pub changed: usize,
    pub persist_error: Option<LibraryError>,
}

/// The known tracks, the search-filtered view over them and their storage.
pub struct TrackLibrary {
    known: Vec<Track>,
    visible: Vec<Track>,
    term: String,
    store: LibraryStore,
    selection_tx: Option<Sender<Selection>>,
}

impl TrackLibrary {
    /// An empty library backed by `store`. Call [`TrackLibrary::load`] to fill it.
    pub fn new(store: LibraryStore) -> Self {
        Self {
            known: Vec::new(),
            visible: Vec::new(),
            term: String::new(),
            store,
            selection_tx: None,
        }
    }

    /// Route [`TrackLibrary::select`] notifications to `tx`.
    pub fn connect(&mut self, tx: Sender<Selection>) {
        self.selection_tx = Some(tx);
    }

    pub fn known(&self) -> &[Track] {
        &self.known
    }

    pub fn visible(&self) -> &[Track] {
        &self.visible
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// Replace the in-memory library with the entries of the backing file that
    /// still exist on disk, then rewrite the file with that validated set.
    ///
    /// `changed` counts entries dropped because their file is gone. A file
    /// that exists but cannot be read is left untouched on disk.
    pub fn load(&mut self) -> Outcome {
        self.term.clear();
        let stored = match self.store.read_paths() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "library file unreadable, starting empty without rewriting it");
                self.known.clear();
                self.refresh_visible();
                return Outcome::default();
            }
        };

        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut known = Vec::with_capacity(stored.len());
        let mut missing = 0;
        let mut duplicates = 0;
        for path in &stored {
            let Some(track) = Track::new(path) else {
                continue;
            };
            if !track.path().is_file() {
                debug!(path = %track.path().display(), "dropping missing library entry");
                missing += 1;
                continue;
            }
            if seen.insert(track.path().to_path_buf()) {
                known.push(track);
            } else {
                duplicates += 1;
            }
        }

        info!(
            tracks = known.len(),
            missing,
            duplicates,
            file = %self.store.path().display(),
            "library loaded"
        );

        self.known = known;
        self.refresh_visible();

        Outcome {
            changed: missing,
            persist_error: self.persist().err(),
        }
    }

    /// Append every path not already known, then persist.
    ///
    /// Paths are compared after normalization; duplicates inside `paths` are
    /// collapsed too. Empty paths are ignored.
    pub fn add<I, P>(&mut self, paths: I) -> Outcome
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut added = 0;
        for p in paths {
            let Some(track) = Track::new(p) else {
                continue;
            };
            if self.contains(track.path()) {
                debug!(path = %track.path().display(), "already in library, skipping");
                continue;
            }
            debug!(path = %track.path().display(), "adding to library");
            self.known.push(track);
            added += 1;
        }

        self.refresh_visible();
        Outcome {
            changed: added,
            persist_error: self.persist().err(),
        }
    }

    /// Remove the track shown at `visible_index`. Out of range is a no-op.
    pub fn delete(&mut self, visible_index: usize) -> Outcome {
        let Some(target) = self.visible.get(visible_index).map(|t| t.path().to_path_buf()) else {
            return Outcome::default();
        };

        let Some(pos) = self.known.iter().position(|t| t.path() == target) else {
            return Outcome::default();
        };
        let removed = self.known.remove(pos);
        debug!(path = %removed.path().display(), "removed from library");

        self.refresh_visible();
        Outcome {
            changed: 1,
            persist_error: self.persist().err(),
        }
    }

    /// Filter the visible set by `term`. Never touches storage.
    pub fn search(&mut self, term: &str) {
        self.term = term.trim().to_string();
        self.refresh_visible();
        if !self.term.is_empty() && self.visible.is_empty() {
            debug!(term = %self.term, "no matching tracks");
        }
    }

    /// Notify the connected deck of the track at `visible_index`.
    ///
    /// Returns the resolved track, or `None` when the index is out of range.
    pub fn select(&self, visible_index: usize) -> Option<&Track> {
        let track = self.visible.get(visible_index)?;
        debug!(path = %track.path().display(), "track selected");
        if let Some(tx) = &self.selection_tx {
            let _ = tx.send(Selection {
                path: track.path().to_path_buf(),
            });
        }
        Some(track)
    }

    /// Rewrite the backing file from `known`.
    pub fn persist(&self) -> Result<(), LibraryError> {
        self.store.write(&self.known).inspect_err(|e| {
            warn!(error = %e, "failed to persist library; keeping in-memory state");
        })
    }

    fn contains(&self, path: &Path) -> bool {
        self.known.iter().any(|t| t.path() == path)
    }

    fn refresh_visible(&mut self) {
        let needle = self.term.to_lowercase();
        self.visible = self
            .known
            .iter()
            .filter(|t| t.matches(&needle))
            .cloned()
            .collect();
    }
}
