//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Default generation settings (used when CLI flags are omitted).
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Usage tracking.
    #[serde(default)]
    pub quota: QuotaConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Default generation settings from the config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: String,
    /// Default subject gender.
    pub gender: String,
    /// Default outfit id; the first outfit for the gender when unset.
    pub outfit: Option<String>,
    /// Default background tag.
    pub background: String,
    /// Default output format.
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "nano-banana".to_string(),
            gender: "male".to_string(),
            outfit: None,
            background: "off-white".to_string(),
            format: "png".to_string(),
        }
    }
}

/// Usage tracking configuration.
#[derive(Debug, Default, Deserialize)]
pub struct QuotaConfig {
    /// Where the daily usage record is kept.
    pub store_path: Option<PathBuf>,
}

/// Env vars consulted for the Gemini key, in priority order.
const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

impl Config {
    /// Read `path`; a missing file yields the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or not valid TOML.
    pub fn load(path: &Path) -> Result<Self, String> {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .map_err(|e| format!("Failed to parse config {}: {e}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(format!("Failed to read config {}: {e}", path.display())),
        }
    }

    /// The Gemini key from the environment or the `[keys]` table. Blank values
    /// count as absent.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .chain(self.keys.gemini.clone())
            .find(|key| !key.trim().is_empty())
    }

    /// Where the daily usage record lives.
    #[must_use]
    pub fn usage_path(&self) -> PathBuf {
        std::env::var_os("HEADSHOT_USAGE_PATH")
            .map(PathBuf::from)
            .or_else(|| self.quota.store_path.clone())
            .unwrap_or_else(|| config_dir().join("usage.json"))
    }
}

/// Pick the config file: `--config`, then `HEADSHOT_CONFIG`, then
/// `~/.config/headshot/config.toml`.
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HEADSHOT_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| config_dir().join("config.toml"))
}

fn config_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), |home| PathBuf::from(home).join(".config/headshot"))
}
