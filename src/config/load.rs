use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `DUODECK__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("DUODECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=240).contains(&self.sync.tick_hz) {
            return Err("sync.tick_hz must be within 1..=240".to_string());
        }
        if !(1..=4).contains(&self.decks.count) {
            return Err("decks.count must be within 1..=4".to_string());
        }
        if !(0.0..=1.0).contains(&self.decks.initial_gain) {
            return Err("decks.initial_gain must be within [0, 1]".to_string());
        }
        if !(0.1..=4.0).contains(&self.decks.initial_speed) {
            return Err("decks.initial_speed must be within [0.1, 4.0]".to_string());
        }
        if !(self.decks.gain_step > 0.0) || !(self.decks.speed_step > 0.0) {
            return Err("decks.gain_step and decks.speed_step must be > 0".to_string());
        }
        if self.ui.animation_ms == 0 {
            return Err("ui.animation_ms must be >= 1".to_string());
        }
        if !self.ui.hue_step.is_finite() || self.ui.hue_step < 0.0 {
            return Err("ui.hue_step must be a non-negative number".to_string());
        }
        if self.ui.waveform_resolution == 0 {
            return Err("ui.waveform_resolution must be >= 1".to_string());
        }
        Ok(())
    }

    /// Library backing file: configured path or the XDG data default.
    pub fn library_file(&self) -> Option<PathBuf> {
        self.library
            .file
            .clone()
            .or_else(|| xdg_dir("XDG_DATA_HOME", &[".local", "share"]).map(|d| d.join("library.txt")))
    }

    /// Log file: configured path or the XDG state default.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| xdg_dir("XDG_STATE_HOME", &[".local", "state"]).map(|d| d.join("duodeck.log")))
    }
}

/// Resolve the config path from `DUODECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("DUODECK_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/duodeck/config.toml`
/// or `~/.config/duodeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("config.toml"))
}

/// `$<var>/duodeck`, or `$HOME/<fallback...>/duodeck` when `var` is unset.
fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    let base = if let Some(v) = env::var_os(var) {
        Some(PathBuf::from(v))
    } else {
        env::var_os("HOME").map(|home| {
            home_fallback
                .iter()
                .fold(PathBuf::from(home), |acc, part| acc.join(part))
        })
    };

    base.map(|d| d.join("duodeck"))
}
