//! Expansion of user-supplied files and folders into audio file paths.
//!
//! This is the stand-in for a file chooser: its output is merged into the
//! library through the ordinary [`TrackLibrary::add`](super::TrackLibrary::add).

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// Paths produced by one background import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    pub paths: Vec<PathBuf>,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn walk_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_audio_file(p, settings))
        .collect();

    files.sort();
    files
}

/// Expand `inputs` into audio files.
///
/// Directories are walked according to `settings`; plain files are kept when
/// their extension is a configured audio extension. Missing inputs are skipped.
pub fn expand(inputs: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = walk_dir(input, settings);
            debug!(dir = %input.display(), files = found.len(), "walked import directory");
            out.extend(found);
        } else if input.is_file() {
            if is_audio_file(input, settings) {
                out.push(input.clone());
            } else {
                debug!(path = %input.display(), "not an audio file, skipping");
            }
        } else {
            warn!(path = %input.display(), "import path does not exist");
        }
    }
    out
}

/// Expand `inputs` off the UI loop and deliver the result on `tx`.
pub fn spawn_import(inputs: Vec<PathBuf>, settings: LibrarySettings, tx: Sender<ImportBatch>) {
    thread::spawn(move || {
        let paths = expand(&inputs, &settings);
        info!(requested = inputs.len(), found = paths.len(), "import finished");
        let _ = tx.send(ImportBatch { paths });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));

        let dotted = LibrarySettings {
            extensions: vec![".Opus".into()],
            ..LibrarySettings::default()
        };
        assert!(is_audio_file(Path::new("/tmp/a.opus"), &dotted));
    }

    #[test]
    fn expand_walks_directories_and_filters_extensions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.MP3"), b"x").unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let found = expand(&[dir.path().to_path_buf()], &LibrarySettings::default());
        assert_eq!(
            found,
            vec![dir.path().join("a.wav"), dir.path().join("b.MP3")]
        );
    }

    #[test]
    fn expand_keeps_plain_audio_files_and_skips_missing() {
        let dir = tempdir().unwrap();
        let song = dir.path().join("song.mp3");
        fs::write(&song, b"x").unwrap();
        let text = dir.path().join("readme.txt");
        fs::write(&text, b"x").unwrap();

        let found = expand(
            &[song.clone(), text, dir.path().join("gone.mp3")],
            &LibrarySettings::default(),
        );
        assert_eq!(found, vec![song]);
    }

    #[test]
    fn expand_respects_recursive_false_and_hidden() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"x").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let found = expand(&[dir.path().to_path_buf()], &settings);
        assert_eq!(found, vec![dir.path().join("root.mp3")]);

        let everything = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(expand(&[dir.path().to_path_buf()], &everything).len(), 3);
    }

    #[test]
    fn spawn_import_delivers_batch() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.ogg"), b"x").unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        spawn_import(
            vec![dir.path().to_path_buf()],
            LibrarySettings::default(),
            tx,
        );
        let batch = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert_eq!(batch.paths, vec![dir.path().join("one.ogg")]);
    }
}
