//! Process-wide configuration
//!
//! Settings are read once at startup from a dotenv-style file
//! (`~/.lizeur.env` unless `LIZEUR_CONFIG` points elsewhere). Variables set in
//! the process environment take precedence over the file.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the settings file location
pub const CONFIG_PATH_ENV: &str = "LIZEUR_CONFIG";

pub const MISTRAL_API_KEY: &str = "MISTRAL_API_KEY";
pub const CACHE_PATH: &str = "CACHE_PATH";
pub const MISTRAL_API_URL: &str = "MISTRAL_API_URL";
pub const OCR_TIMEOUT_SECS: &str = "OCR_TIMEOUT_SECS";

const KNOWN_KEYS: [&str; 4] = [MISTRAL_API_KEY, CACHE_PATH, MISTRAL_API_URL, OCR_TIMEOUT_SECS];

pub const DEFAULT_API_BASE_URL: &str = "https://api.mistral.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Runtime configuration for the server and its OCR backend
#[derive(Clone)]
pub struct Config {
    /// Bearer token for the Mistral API
    pub mistral_api_key: String,
    /// Directory reserved for cached OCR output. Created at startup; nothing
    /// is written into it yet.
    pub cache_path: PathBuf,
    /// Base URL of the OCR service (without the `/v1/ocr` suffix)
    pub api_base_url: String,
    /// Timeout applied to each OCR request
    pub timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mistral_api_key", &"<redacted>")
            .field("cache_path", &self.cache_path)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Location of the settings file: `$LIZEUR_CONFIG`, else `~/.lizeur.env`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".lizeur.env"))
}

/// Default cache directory.
///
/// - **Linux**: `~/.cache/lizeur`
/// - **macOS**: `~/Library/Caches/lizeur`
/// - **Windows**: `%LOCALAPPDATA%\lizeur`
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join("lizeur")
}

impl Config {
    /// Load configuration from the default settings file and the environment.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                tracing::warn!("Could not determine home directory, using environment only");
                Self::from_values(&env_values())
            }
        }
    }

    /// Load configuration from a specific settings file, overlaid with the
    /// environment. A missing file is not an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut values = read_settings_file(path)?;
        overlay(&mut values, env_values());
        Self::from_values(&values)
    }

    /// Build a configuration from already-collected key/value pairs.
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self> {
        let non_empty = |key: &str| {
            values
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mistral_api_key = non_empty(MISTRAL_API_KEY)
            .ok_or_else(|| Error::MissingConfig {
                key: MISTRAL_API_KEY.to_string(),
            })?
            .to_string();

        let cache_path = non_empty(CACHE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_path);

        let api_base_url = non_empty(MISTRAL_API_URL)
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&api_base_url).map_err(|e| Error::InvalidConfig {
            key: MISTRAL_API_URL.to_string(),
            reason: e.to_string(),
        })?;

        let timeout_secs = match non_empty(OCR_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(Error::InvalidConfig {
                        key: OCR_TIMEOUT_SECS.to_string(),
                        reason: format!("expected a positive number of seconds, got {:?}", raw),
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            mistral_api_key,
            cache_path,
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create the cache directory if it does not exist yet.
    pub fn ensure_cache_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.cache_path)?;
        Ok(())
    }
}

fn read_settings_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            tracing::debug!(path = %path.display(), "Settings file not found");
            return Ok(HashMap::new());
        }
        Err(e) => return Err(settings_error(path, e)),
    };

    let mut values = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| settings_error(path, e))?;
        values.insert(key, value);
    }
    tracing::debug!(path = %path.display(), keys = values.len(), "Loaded settings file");
    Ok(values)
}

fn settings_error(path: &Path, e: dotenvy::Error) -> Error {
    Error::InvalidConfig {
        key: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Set variables override file values. Blank ones are ignored so that
/// `MISTRAL_API_KEY=` in the environment cannot mask the file's key.
fn overlay(values: &mut HashMap<String, String>, overrides: HashMap<String, String>) {
    values.extend(
        overrides
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty()),
    );
}

fn env_values() -> HashMap<String, String> {
    KNOWN_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
}
