//! HTTP client for the weather gateway (OpenWeatherMap-compatible).

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use skycast_core::Config;

use crate::types::{
    ApiCurrentWeather, ApiForecast, CityCandidate, CurrentWeather, Forecast, WeatherError,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Skycast/0.1.0";

/// Where and how to reach the gateway
#[derive(Clone)]
pub struct WeatherEndpoints {
    pub api_key: String,
    pub base_url: String,
    pub geo_base_url: String,
    pub suggestion_limit: u32,
}

impl std::fmt::Debug for WeatherEndpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherEndpoints")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("geo_base_url", &self.geo_base_url)
            .field("suggestion_limit", &self.suggestion_limit)
            .finish()
    }
}

impl WeatherEndpoints {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.weather.api_key.clone().unwrap_or_default(),
            base_url: config.weather.base_url.clone(),
            geo_base_url: config.weather.geo_base_url.clone(),
            suggestion_limit: config.search.suggestion_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    endpoints: WeatherEndpoints,
}

impl WeatherClient {
    pub fn new(endpoints: WeatherEndpoints) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            endpoints,
        })
    }

    /// Current conditions for a city name
    #[instrument(skip(self), level = "info")]
    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let url = self.weather_url("weather", &[("q", city)])?;
        let api: ApiCurrentWeather = self.fetch_json(url).await?;
        CurrentWeather::try_from(api)
    }

    /// 3-hourly forecast for a city name
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, city: &str) -> Result<Forecast, WeatherError> {
        let url = self.weather_url("forecast", &[("q", city)])?;
        let api: ApiForecast = self.fetch_json(url).await?;
        Ok(Forecast::from(api))
    }

    /// Cities matching a free-text query, for autocomplete
    #[instrument(skip(self), level = "info")]
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CityCandidate>, WeatherError> {
        let limit = self.endpoints.suggestion_limit.to_string();
        let url = self.build_url(
            &self.endpoints.geo_base_url,
            "direct",
            &[("q", query), ("limit", limit.as_str())],
        )?;
        self.fetch_json(url).await
    }

    /// Current conditions at a coordinate pair
    #[instrument(skip(self), level = "info")]
    pub async fn by_coords(&self, lat: f64, lon: f64) -> Result<CurrentWeather, WeatherError> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        let url = self.weather_url("weather", &[("lat", lat.as_str()), ("lon", lon.as_str())])?;
        let api: ApiCurrentWeather = self.fetch_json(url).await?;
        CurrentWeather::try_from(api)
    }

    fn weather_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, WeatherError> {
        let mut params = params.to_vec();
        params.push(("units", "metric"));
        self.build_url(&self.endpoints.base_url, endpoint, &params)
    }

    fn build_url(
        &self,
        base: &str,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, WeatherError> {
        let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), endpoint))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("appid", &self.endpoints.api_key);
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, WeatherError> {
        tracing::debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!("Gateway returned status {}", status);
            return Err(WeatherError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WeatherError::Malformed(e.to_string()))
    }
}
