use serde::{Deserialize, Serialize};

pub use skycast_core::TemperatureUnit;

/// Icon shown when the gateway omits a forecast condition
pub const DEFAULT_ICON: &str = "01d";

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current weather conditions for one place.
/// Temperatures are always Celsius; conversion happens at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country_code: String,
    pub temperature_celsius: f64,
    pub humidity_percent: u8,
    pub wind_speed_mps: f64,
    pub condition_icon: String,
    pub condition_description: String,
}

impl CurrentWeather {
    /// "London, GB", or just the name when the gateway has no country
    pub fn display_name(&self) -> String {
        if self.country_code.is_empty() {
            self.location_name.clone()
        } else {
            format!("{}, {}", self.location_name, self.country_code)
        }
    }
}

/// One raw 3-hour forecast reading.
/// `icon` and `description` are `None` when the gateway sent no usable condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp_unix: i64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Flat forecast as returned by the gateway, in chronological order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub samples: Vec<ForecastSample>,
}

/// Autocomplete candidate from city search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCandidate {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl CityCandidate {
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Value cached under `weather_<city>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedWeather {
    pub current: CurrentWeather,
    pub forecast: Forecast,
}

// Gateway wire shapes. Only the fields we read are declared; anything
// missing from these fails deserialization and surfaces as a malformed
// response.

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrentMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiWind {
    pub speed: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiSys {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrentWeather {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: ApiSys,
    pub main: ApiCurrentMain,
    pub wind: ApiWind,
    pub weather: Vec<ApiCondition>,
}

impl TryFrom<ApiCurrentWeather> for CurrentWeather {
    type Error = WeatherError;

    fn try_from(api: ApiCurrentWeather) -> Result<Self, Self::Error> {
        let condition = api
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("current weather has no condition".into()))?;

        Ok(Self {
            location_name: api.name,
            country_code: api.sys.country.unwrap_or_default(),
            temperature_celsius: api.main.temp,
            humidity_percent: api.main.humidity,
            wind_speed_mps: api.wind.speed,
            condition_icon: condition.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            condition_description: condition.description.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastMain {
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastItem {
    pub dt: i64,
    pub main: ApiForecastMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecast {
    pub list: Vec<ApiForecastItem>,
}

impl From<ApiForecast> for Forecast {
    fn from(api: ApiForecast) -> Self {
        let samples = api
            .list
            .into_iter()
            .map(|item| {
                let condition = item.weather.into_iter().next();
                let (icon, description) = match condition {
                    Some(c) => (c.icon, c.description),
                    None => (None, None),
                };
                ForecastSample {
                    timestamp_unix: item.dt,
                    temp_min_c: item.main.temp_min,
                    temp_max_c: item.main.temp_max,
                    icon: icon.filter(|i| !i.is_empty()),
                    description: description.filter(|d| !d.is_empty()),
                }
            })
            .collect();
        Self { samples }
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Weather client errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error: status {status}")]
    Api { status: u16 },
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Cache error: {0}")]
    Cache(String),
}
