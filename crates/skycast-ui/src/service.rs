//! Weather backend: network work runs on spawned tasks and reports back
//! to the controller as [`UiEvent`]s.

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use skycast_weather::{CachedWeather, LocationSource, WeatherClient, WeatherError};

use crate::events::UiEvent;

/// Error type for backend operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error("Weather service not initialized")]
    NotInitialized,
}

fn runtime() -> Result<Handle, ServiceError> {
    Handle::try_current().map_err(|_| {
        tracing::error!("No tokio runtime available for weather request");
        ServiceError::NotInitialized
    })
}

/// Fetch current weather then forecast for `city`.
/// Sends `WeatherLoaded` when both succeed or either fails.
pub fn request_weather(
    tx: &UnboundedSender<UiEvent>,
    client: WeatherClient,
    city: String,
    generation: u64,
) {
    let tx = tx.clone();
    let runtime = match runtime() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(UiEvent::WeatherLoaded {
                generation,
                city,
                result: Err(e),
            });
            return;
        }
    };

    runtime.spawn(async move {
        let result = async {
            let current = client.current_weather(&city).await?;
            let forecast = client.forecast(&city).await?;
            Ok::<_, WeatherError>(CachedWeather { current, forecast })
        }
        .await
        .map_err(ServiceError::from);

        let _ = tx.send(UiEvent::WeatherLoaded {
            generation,
            city,
            result,
        });
    });
}

/// Search cities for autocomplete. Sends `SuggestionsLoaded`.
pub fn request_search(tx: &UnboundedSender<UiEvent>, client: WeatherClient, query: String) {
    let tx = tx.clone();
    let runtime = match runtime() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(UiEvent::SuggestionsLoaded {
                query,
                result: Err(e),
            });
            return;
        }
    };

    runtime.spawn(async move {
        let result = client.search_cities(&query).await.map_err(ServiceError::from);
        let _ = tx.send(UiEvent::SuggestionsLoaded { query, result });
    });
}

/// Resolve the shared location, then fetch current weather there.
/// Sends `LocationWeatherLoaded`.
pub fn request_location_weather(
    tx: &UnboundedSender<UiEvent>,
    client: WeatherClient,
    location: LocationSource,
    generation: u64,
) {
    let tx = tx.clone();
    let runtime = match runtime() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(UiEvent::LocationWeatherLoaded {
                generation,
                result: Err(e),
            });
            return;
        }
    };

    runtime.spawn(async move {
        let result = async {
            let position = location.current_location().await?;
            tracing::info!("Got location: {}, {}", position.latitude, position.longitude);
            client.by_coords(position.latitude, position.longitude).await
        }
        .await
        .map_err(ServiceError::from);

        let _ = tx.send(UiEvent::LocationWeatherLoaded { generation, result });
    });
}
