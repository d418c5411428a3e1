//! Messages delivered to the controller's event loop.

use skycast_weather::{CachedWeather, CityCandidate, CurrentWeather};

use crate::service::ServiceError;

#[derive(Debug)]
pub enum UiEvent {
    /// The autocomplete quiet period elapsed for `query`
    SearchDue { query: String },

    /// City search finished
    SuggestionsLoaded {
        query: String,
        result: Result<Vec<CityCandidate>, ServiceError>,
    },

    /// Current weather and forecast for a city finished loading
    WeatherLoaded {
        generation: u64,
        city: String,
        result: Result<CachedWeather, ServiceError>,
    },

    /// Weather at the shared location finished loading
    LocationWeatherLoaded {
        generation: u64,
        result: Result<CurrentWeather, ServiceError>,
    },

    /// A click landed outside the search input and suggestion list
    ClickOutside,
}
