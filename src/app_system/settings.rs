use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::reason_mapper::DEFAULT_NOTE;

pub const SETTINGS_FILE: &str = "pantry.toml";

/// Tunables for the consumption workflow.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Upper bound on a single consume call before it counts as `timeout`.
    pub item_timeout_ms: u64,
    pub custom_reason_max_chars: usize,
    pub default_note: String,
    pub channel_buffer: usize,
    pub refresh_buffer: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            item_timeout_ms: 10_000,
            custom_reason_max_chars: 10,
            default_note: DEFAULT_NOTE.into(),
            channel_buffer: 32,
            refresh_buffer: 16,
        }
    }
}

impl Settings {
    pub fn item_timeout(&self) -> Duration {
        Duration::from_millis(self.item_timeout_ms)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_env(&mut self) {
        if let Some(v) = env_parsed("APP__ITEM_TIMEOUT_MS") {
            self.item_timeout_ms = v;
        }
        if let Some(v) = env_parsed("APP__CUSTOM_REASON_MAX_CHARS") {
            self.custom_reason_max_chars = v;
        }
        if let Ok(v) = std::env::var("APP__DEFAULT_NOTE") {
            self.default_note = v;
        }
        if let Some(v) = env_parsed("APP__CHANNEL_BUFFER") {
            self.channel_buffer = v;
        }
        if let Some(v) = env_parsed("APP__REFRESH_BUFFER") {
            self.refresh_buffer = v;
        }
    }
}

/// Defaults, then `pantry.toml` if present, then `APP__*` variables.
pub fn load_settings() -> Settings {
    let mut settings = load_file(Path::new(SETTINGS_FILE)).unwrap_or_default();
    settings.apply_env();
    settings
}

fn load_file(path: &Path) -> Option<Settings> {
    let raw = fs::read_to_string(path).ok()?;
    match Settings::from_toml(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable settings file");
            None
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml("item_timeout_ms = 250\ncustom_reason_max_chars = 20\n").unwrap();
        assert_eq!(settings.item_timeout(), Duration::from_millis(250));
        assert_eq!(settings.custom_reason_max_chars, 20);
        assert_eq!(settings.default_note, DEFAULT_NOTE);
        assert_eq!(settings.channel_buffer, 32);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        assert!(Settings::from_toml("item_timeout_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_file_yields_none() {
        assert_eq!(load_file(Path::new("does/not/exist.toml")), None);
    }
}
