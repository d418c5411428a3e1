//! Presentation state and text rendering.
//!
//! The view keeps the last fetched weather in Celsius so unit changes
//! re-render without another request.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone};

use skycast_weather::{
    group_by_day, CityCandidate, CurrentWeather, Forecast, TemperatureUnit, Theme,
};

pub const LOADING_MESSAGE: &str = "Loading...";

/// Path of the bundled icon for a gateway icon code
pub fn icon_path(code: &str) -> String {
    format!("asset/icons/{}@2x.png", code)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentCard {
    pub title: String,
    pub temperature: i64,
    pub description: String,
    pub humidity_percent: u8,
    pub wind_speed_mps: f64,
    pub icon_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub weekday: String,
    pub max: i64,
    pub min: i64,
    pub description: String,
    pub icon_path: String,
}

#[derive(Debug, Clone, Default)]
pub struct WeatherView {
    unit: TemperatureUnit,
    theme: Theme,
    current: Option<CurrentWeather>,
    forecast: Option<Forecast>,
    loading: bool,
    error: Option<String>,
    suggestions: Vec<CityCandidate>,
}

impl WeatherView {
    pub fn new(unit: TemperatureUnit, theme: Theme) -> Self {
        Self {
            unit,
            theme,
            ..Self::default()
        }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn suggestions(&self) -> &[CityCandidate] {
        &self.suggestions
    }

    pub fn show_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replace the error line. Previously shown weather stays.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn show_current(&mut self, current: CurrentWeather) {
        self.loading = false;
        self.error = None;
        self.current = Some(current);
    }

    pub fn show_weather(&mut self, current: CurrentWeather, forecast: Forecast) {
        self.show_current(current);
        self.forecast = Some(forecast);
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<CityCandidate>) {
        self.suggestions = suggestions;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = self.unit.toggled();
        self.unit
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn current_card(&self) -> Option<CurrentCard> {
        self.current.as_ref().map(|c| CurrentCard {
            title: c.display_name(),
            temperature: self.unit.display(c.temperature_celsius),
            description: c.condition_description.clone(),
            humidity_percent: c.humidity_percent,
            wind_speed_mps: c.wind_speed_mps,
            icon_path: icon_path(&c.condition_icon),
        })
    }

    /// Daily cards grouped in `tz`, at most five
    pub fn forecast_cards<Tz: TimeZone>(&self, tz: &Tz) -> Vec<ForecastCard>
    where
        Tz::Offset: std::fmt::Display,
    {
        let Some(forecast) = &self.forecast else {
            return Vec::new();
        };

        group_by_day(&forecast.samples, tz)
            .into_iter()
            .map(|day| {
                let weekday = DateTime::from_timestamp(day.representative_timestamp, 0)
                    .map(|utc| utc.with_timezone(tz).format("%a").to_string())
                    .unwrap_or_default();
                ForecastCard {
                    weekday,
                    max: self.unit.display(day.max_temp()),
                    min: self.unit.display(day.min_temp()),
                    description: day.description,
                    icon_path: icon_path(&day.icon),
                }
            })
            .collect()
    }

    /// Render the whole screen as text
    pub fn render<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut out = String::new();
        let symbol = self.unit.symbol();

        let _ = writeln!(
            out,
            "[{}] Switch to °{}",
            self.theme.toggle_label(),
            self.unit.toggled().symbol()
        );

        if self.loading {
            let _ = writeln!(out, "{}", LOADING_MESSAGE);
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "Error: {}", error);
        }

        if let Some(card) = self.current_card() {
            let _ = writeln!(out, "{}", card.title);
            let _ = writeln!(out, "  {}°{}  {}", card.temperature, symbol, card.description);
            let _ = writeln!(
                out,
                "  Humidity: {}%  Wind: {} m/s",
                card.humidity_percent, card.wind_speed_mps
            );
            let _ = writeln!(out, "  Icon: {}", card.icon_path);
        }

        let cards = self.forecast_cards(tz);
        if !cards.is_empty() {
            let _ = writeln!(out, "Forecast:");
            for card in cards {
                let _ = writeln!(
                    out,
                    "  {:<4} {:>4}° / {:>4}°  {}",
                    card.weekday, card.max, card.min, card.description
                );
            }
        }

        if !self.suggestions.is_empty() {
            let _ = writeln!(out, "Suggestions:");
            for (i, city) in self.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, city.label());
            }
        }

        out
    }
}
