//! Interaction controller.
//!
//! Owns the view, the cache and the search input. User actions come in as
//! method calls; network results come back as [`UiEvent`]s on the channel
//! returned by [`Controller::new`] and are applied with
//! [`Controller::handle_event`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use skycast_core::{AppError, Config, TemperatureUnit};
use skycast_weather::{
    weather_key, CacheStore, CachedWeather, CurrentWeather, LocationError, LocationSource, Theme,
    WeatherClient, WeatherError,
};

use crate::click::{ClickBus, ClickSubscription, ClickTarget};
use crate::debounce::Debouncer;
use crate::events::UiEvent;
use crate::service::{self, ServiceError};
use crate::view::WeatherView;

pub const NO_CITY_NAME_MESSAGE: &str = "Unable to detect city name from location";

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
    pub cache_ttl: Duration,
    pub default_unit: TemperatureUnit,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            cache_ttl: Duration::from_secs(10 * 60),
            default_unit: TemperatureUnit::Celsius,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.search.debounce(),
            min_query_len: config.search.min_query_len,
            cache_ttl: config.weather.cache_duration(),
            default_unit: config.weather.default_unit,
        }
    }
}

pub struct Controller {
    client: WeatherClient,
    cache: CacheStore,
    location: LocationSource,
    view: WeatherView,
    input: String,
    settings: ControllerSettings,
    debouncer: Debouncer,
    events_tx: UnboundedSender<UiEvent>,
    // Bumped for every weather load; results tagged with an older value are dropped
    load_generation: u64,
    clicks: Arc<ClickBus>,
    _click_subscription: ClickSubscription,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("input", &self.input)
            .field("load_generation", &self.load_generation)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Build a controller and the receiver its background work reports to.
    /// The theme saved in `cache` is applied immediately.
    pub fn new(
        client: WeatherClient,
        cache: CacheStore,
        location: LocationSource,
        settings: ControllerSettings,
        clicks: &Arc<ClickBus>,
    ) -> (Self, UnboundedReceiver<UiEvent>) {
        let (events_tx, events_rx) = unbounded_channel();
        let theme = Theme::load(&cache);
        let view = WeatherView::new(settings.default_unit, theme);
        let subscription = clicks.subscribe(events_tx.clone());

        let controller = Self {
            client,
            cache,
            location,
            view,
            input: String::new(),
            settings,
            debouncer: Debouncer::new(),
            events_tx,
            load_generation: 0,
            clicks: Arc::clone(clicks),
            _click_subscription: subscription,
        };
        (controller, events_rx)
    }

    pub fn view(&self) -> &WeatherView {
        &self.view
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// A keystroke changed the search input.
    pub fn on_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.debouncer.cancel();

        let query = text.trim();
        if query.chars().count() < self.settings.min_query_len {
            self.view.clear_suggestions();
            return;
        }

        let tx = self.events_tx.clone();
        let query = query.to_string();
        let armed = self.debouncer.arm(self.settings.debounce, async move {
            let _ = tx.send(UiEvent::SearchDue { query });
        });
        if !armed {
            tracing::debug!("City search not scheduled");
        }
    }

    /// Route a click through the shared click bus
    pub fn on_click(&self, target: ClickTarget) -> bool {
        self.clicks.dispatch(target)
    }

    /// Load weather for the current input. Returns false if the input is blank.
    pub fn submit(&mut self) -> bool {
        let city = self.input.trim().to_string();
        if city.is_empty() {
            return false;
        }
        self.debouncer.cancel();
        self.view.clear_suggestions();
        self.load_weather(&city);
        true
    }

    /// Pick the suggestion at `index`. Returns false if there is none.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        let Some(candidate) = self.view.suggestions().get(index).cloned() else {
            return false;
        };
        self.debouncer.cancel();
        self.input = candidate.name.clone();
        self.view.clear_suggestions();
        self.load_weather(&candidate.name);
        true
    }

    /// Show weather for `city`, from the cache while it is fresh
    pub fn load_weather(&mut self, city: &str) {
        self.view.show_loading();
        self.load_generation += 1;

        let key = weather_key(city);
        if let Some(entry) = self
            .cache
            .load_fresh::<CachedWeather>(&key, self.settings.cache_ttl)
        {
            tracing::debug!("Serving {} from cache (stored {})", city, entry.stored_at);
            let CachedWeather { current, forecast } = entry.payload;
            self.view.show_weather(current, forecast);
            return;
        }

        tracing::info!("Fetching weather for {}", city);
        service::request_weather(
            &self.events_tx,
            self.client.clone(),
            city.to_string(),
            self.load_generation,
        );
    }

    /// Load weather at the shared location
    pub fn use_location(&mut self) {
        self.view.show_loading();
        self.load_generation += 1;
        service::request_location_weather(
            &self.events_tx,
            self.client.clone(),
            self.location,
            self.load_generation,
        );
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.view.toggle_unit()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.view.theme().toggled();
        self.view.set_theme(theme);
        if let Err(e) = theme.persist(&mut self.cache) {
            tracing::warn!("Failed to save theme: {}", e);
        }
        theme
    }

    /// Apply a result delivered by background work
    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SearchDue { query } => {
                if query != self.input.trim() {
                    tracing::debug!("Dropping search for outdated query {:?}", query);
                    return;
                }
                service::request_search(&self.events_tx, self.client.clone(), query);
            }

            UiEvent::SuggestionsLoaded { query, result } => {
                if query != self.input.trim() {
                    tracing::debug!("Dropping suggestions for outdated query {:?}", query);
                    return;
                }
                match result {
                    Ok(candidates) => self.view.set_suggestions(candidates),
                    Err(e) => {
                        tracing::debug!("City search failed: {}", e);
                        self.view.clear_suggestions();
                    }
                }
            }

            UiEvent::WeatherLoaded {
                generation,
                city,
                result,
            } => {
                if generation != self.load_generation {
                    tracing::debug!("Dropping superseded weather for {}", city);
                    return;
                }
                match result {
                    Ok(weather) => {
                        if let Err(e) = self.cache.save(&weather_key(&city), &weather) {
                            tracing::warn!("Failed to cache weather for {}: {}", city, e);
                        }
                        let CachedWeather { current, forecast } = weather;
                        self.view.show_weather(current, forecast);
                    }
                    Err(e) => {
                        tracing::warn!("Weather lookup for {} failed: {}", city, e);
                        self.view.show_error(AppError::from(e).user_message());
                    }
                }
            }

            UiEvent::LocationWeatherLoaded { generation, result } => {
                if generation != self.load_generation {
                    tracing::debug!("Dropping superseded location weather");
                    return;
                }
                self.apply_location_weather(result);
            }

            UiEvent::ClickOutside => self.view.clear_suggestions(),
        }
    }

    fn apply_location_weather(&mut self, result: Result<CurrentWeather, ServiceError>) {
        match result {
            Ok(current) => {
                let city = current.location_name.trim().to_string();
                self.view.show_current(current);
                if city.is_empty() {
                    self.view.show_error(NO_CITY_NAME_MESSAGE);
                } else {
                    self.load_weather(&city);
                }
            }
            Err(ServiceError::Weather(WeatherError::Location(LocationError::PermissionDenied))) => {
                tracing::info!("Location permission denied");
                self.view
                    .show_error(AppError::from(skycast_core::LocationError::PermissionDenied).user_message());
            }
            Err(e) => {
                tracing::warn!("Location weather failed: {}", e);
                self.view.show_error(
                    AppError::from(skycast_core::LocationError::Unavailable(e.to_string()))
                        .user_message(),
                );
            }
        }
    }
}
