use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Default provider endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Locales the timestamp formatter knows how to render.
pub const SUPPORTED_LOCALES: &[&str] = &["en-US", "en-GB"];

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Preference storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Static provider API key (can also be set via `WEATHER_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Provider endpoint root, without the trailing `current.json`/`forecast.json`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds. Unset means the transport default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Fetch the forecast endpoint and show the hourly table
    #[serde(default = "default_true")]
    pub include_forecast: bool,

    /// Expose day/night/cloudy/rainy theming
    #[serde(default = "default_true")]
    pub include_theming: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_ms: None,
            include_forecast: true,
            include_theming: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Locale used for dates and times (e.g. "en-US")
    #[serde(default = "default_locale")]
    pub locale: String,

    /// IANA timezone for timestamps. Unset uses the location's own zone.
    #[serde(default)]
    pub timezone: Option<String>,
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding city/state/unit preferences
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weathernow");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            display: DisplayConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating a default one if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        match self.weather.timeout_ms {
            Some(0) => result.add_error("weather.timeout_ms", "Timeout must be greater than 0"),
            Some(ms) if ms > 120_000 => {
                result.add_warning("weather.timeout_ms", "Timeout is longer than two minutes")
            }
            _ => {}
        }

        if self.api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured; set {} or weather.api_key", API_KEY_ENV),
            );
        }

        if !SUPPORTED_LOCALES.contains(&self.display.locale.as_str()) {
            result.add_error(
                "display.locale",
                format!(
                    "Unsupported locale '{}', expected one of: {}",
                    self.display.locale,
                    SUPPORTED_LOCALES.join(", ")
                ),
            );
        }

        if let Some(tz) = &self.display.timezone {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                result.add_error("display.timezone", format!("Unknown timezone: {}", tz));
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// The API key to use: environment first, then the config file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.weather
                    .api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    /// Location of the preferences database.
    pub fn preferences_path(&self) -> PathBuf {
        self.storage
            .preferences_path
            .clone()
            .unwrap_or_else(|| self.config_dir.join("preferences.db"))
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("weathernow");

        Ok(config_dir.join("config.toml"))
    }
}
