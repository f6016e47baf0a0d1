use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A single audio file known to the library, identified by its normalized
/// absolute path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Track {
    path: PathBuf,
    name: String,
}

impl Track {
    /// Build a track from a user or storage supplied path.
    ///
    /// Returns `None` for an empty path or one containing a newline.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let raw = path.as_os_str().as_encoded_bytes();
        if raw.is_empty() || raw.contains(&b'\n') {
            return None;
        }

        let path = normalize(path);
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Some(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension; what the library shows and searches.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive substring match on the display name.
    ///
    /// `needle_lower` must already be lowercase.
    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.name.to_lowercase().contains(needle_lower)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Absolute, lexically cleaned form of `path`.
///
/// Relative paths are resolved against the current directory, `.` segments are
/// dropped and `..` folds into its parent. Symlinks are left alone and the
/// comparison stays case-sensitive.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
