use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

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

/// Temperature unit used for display. Celsius is the storage unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius reading to this unit, rounded to a whole degree.
    /// Halves round toward positive infinity (-1.5 shows as -1).
    pub fn display(self, celsius: f64) -> i64 {
        let value = match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        };
        (value + 0.5).floor() as i64
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (also holds the local cache)
    pub config_dir: PathBuf,

    /// Weather gateway settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// City search / autocomplete settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Fixed location used by "use my location"
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API key appended to every gateway request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for current weather and forecast endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for the geocoding (city search) endpoint
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,

    /// Unit shown at startup
    #[serde(default)]
    pub default_unit: TemperatureUnit,

    /// How long a cached lookup stays valid, in minutes
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u32,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_base_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_cache_minutes() -> u32 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            geo_base_url: default_geo_base_url(),
            default_unit: TemperatureUnit::Celsius,
            cache_minutes: default_cache_minutes(),
        }
    }
}

impl WeatherConfig {
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.cache_minutes) * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum trimmed query length that triggers a search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Maximum number of suggestions requested from the gateway
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u32,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_suggestion_limit() -> u32 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// A location shared by the user ahead of time.
/// Leaving both fields empty means location access is denied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            search: SearchConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist.
    /// Environment variables override the gateway settings.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
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

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Apply `WEATHER_API_KEY`, `WEATHER_BASE_URL` and `WEATHER_GEO_BASE_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("WEATHER_API_KEY").filter(|k| !k.is_empty()) {
            tracing::debug!("Using API key from WEATHER_API_KEY");
            self.weather.api_key = Some(key);
        }
        if let Some(url) = lookup("WEATHER_BASE_URL").filter(|u| !u.is_empty()) {
            self.weather.base_url = url;
        }
        if let Some(url) = lookup("WEATHER_GEO_BASE_URL").filter(|u| !u.is_empty()) {
            self.weather.geo_base_url = url;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        self.validate_url(
            &self.weather.geo_base_url,
            "weather.geo_base_url",
            &mut result,
        );

        match self.weather.api_key.as_deref() {
            None | Some("") => result.add_warning(
                "weather.api_key",
                "No API key configured - gateway requests will be rejected",
            ),
            Some(_) => {}
        }

        if self.weather.cache_minutes == 0 {
            result.add_error(
                "weather.cache_minutes",
                "Cache duration must be greater than 0",
            );
        } else if self.weather.cache_minutes > 1440 {
            result.add_warning(
                "weather.cache_minutes",
                "Cache duration is more than 24 hours",
            );
        }

        if self.search.debounce_ms > 5000 {
            result.add_warning(
                "search.debounce_ms",
                "Search debounce is unusually long (>5s)",
            );
        }

        if self.search.min_query_len == 0 {
            result.add_warning(
                "search.min_query_len",
                "Every keystroke will trigger a city search",
            );
        }

        if self.search.suggestion_limit == 0 {
            result.add_error(
                "search.suggestion_limit",
                "Suggestion limit must be greater than 0",
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error(
                        "location.longitude",
                        "Longitude must be within -180..=180",
                    );
                }
            }
            (None, None) => {}
            _ => result.add_warning(
                "location",
                "Both latitude and longitude are needed; location is disabled",
            ),
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

    fn save_to(&self, config_path: &Path) -> Result<()> {
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
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
