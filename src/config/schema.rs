use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/duodeck/config.toml` or `~/.config/duodeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `DUODECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub sync: SyncSettings,
    pub decks: DeckSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Backing file of the track library (one absolute path per line).
    /// Defaults to `$XDG_DATA_HOME/duodeck/library.txt`.
    pub file: Option<PathBuf>,
    /// File extensions to treat as audio when importing (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while walking imported directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            file: None,
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "flac".into(),
                "ogg".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncSettings {
    /// How often each deck polls its engine position (ticks per second).
    pub tick_hz: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self { tick_hz: 60 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeckSettings {
    /// Number of decks shown side by side.
    pub count: usize,
    /// Gain applied to a fresh deck, in `[0, 1]`.
    pub initial_gain: f32,
    /// Playback speed applied to a fresh deck, in `[0.1, 4.0]`.
    pub initial_speed: f32,
    /// Gain change per keypress.
    pub gain_step: f32,
    /// Speed change per keypress.
    pub speed_step: f32,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            count: 2,
            initial_gain: 1.0,
            initial_speed: 1.0,
            gain_step: 0.05,
            speed_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Period of the cosmetic waveform colour animation (milliseconds).
    pub animation_ms: u64,
    /// Hue advance per animation step, as a fraction of the colour wheel.
    pub hue_step: f32,
    /// Number of peak columns kept per waveform thumbnail.
    pub waveform_resolution: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ two decks, one library ~ ".to_string(),
            animation_ms: 50,
            hue_step: 0.004,
            waveform_resolution: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/duodeck/duodeck.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
