use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_ENDPOINT: &str = "http://api.wunderground.com/api";
pub const DEFAULT_GEOCODER_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_COUNTRY: &str = "Slovakia";
pub const DEFAULT_LANG: &str = "EN";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;
/// Initial try plus the geocoded and country-qualified fallbacks.
pub const MIN_ATTEMPTS: u32 = 3;
pub const DEFAULT_TEMPLATE: &str = "{city}, {country} -> Day: {daytemp}\u{2103} , \
     Night: {nighttemp}\u{2103} , Wind: {avewind} km/h ({txt})";

/// Everything the weather data source needs to build request URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub api_key: String,
    pub lang: String,
    pub timeout: Duration,
}

/// Immutable settings handed to the resolver at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Appended to the query as the last fallback, e.g. `Nitra,Slovakia`.
    pub country: String,
    /// Hard ceiling on provider round-trips for one query.
    pub max_attempts: u32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self { country: DEFAULT_COUNTRY.to_string(), max_attempts: DEFAULT_MAX_ATTEMPTS }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// country = "Slovakia"
/// lang = "EN"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub country: String,
    pub lang: String,
    pub endpoint: String,
    pub geocoder_url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            country: DEFAULT_COUNTRY.to_string(),
            lang: DEFAULT_LANG.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;

        if cfg.max_attempts < MIN_ATTEMPTS {
            bail!(
                "`max_attempts = {}` is too low, at least {MIN_ATTEMPTS} attempts are needed.\n\
                 Hint: remove `max_attempts` from the config file to use the default ({}).",
                cfg.max_attempts,
                DEFAULT_MAX_ATTEMPTS
            );
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wunderweather", "wunderweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Returns the API key, or an error with a hint if none is configured.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No `api_key` specified in config file.\n\
                 Hint: run `weather configure` and enter your API key."
            )
        })
    }

    pub fn provider_settings(&self) -> Result<ProviderSettings> {
        Ok(ProviderSettings {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key()?.to_string(),
            lang: self.lang.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// The attempt ceiling never drops below [`MIN_ATTEMPTS`].
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            country: self.country.clone(),
            max_attempts: self.max_attempts.max(MIN_ATTEMPTS),
        }
    }
}
