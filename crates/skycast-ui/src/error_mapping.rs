//! Maps backend errors to skycast_core::AppError for consistent user-facing messages.

use skycast_core::{AppError, ConfigError, LocationError, WeatherError};
use skycast_weather::{LocationError as GatewayLocationError, WeatherError as GatewayError};

use crate::service::ServiceError;

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Weather(e) => map_gateway(e),
            ServiceError::NotInitialized => {
                AppError::Weather(WeatherError::Unreachable("service not initialized".into()))
            }
        }
    }
}

fn map_gateway(e: GatewayError) -> AppError {
    match e {
        GatewayError::Network(e) => AppError::Weather(WeatherError::Unreachable(e.to_string())),
        GatewayError::Api { status } => AppError::Weather(WeatherError::ApiError { status }),
        GatewayError::Malformed(s) => AppError::Weather(WeatherError::MalformedResponse(s)),
        GatewayError::InvalidUrl(e) => AppError::Config(ConfigError::Invalid(e.to_string())),
        GatewayError::Location(GatewayLocationError::PermissionDenied) => {
            AppError::Location(LocationError::PermissionDenied)
        }
        GatewayError::Location(GatewayLocationError::Unavailable(s)) => {
            AppError::Location(LocationError::Unavailable(s))
        }
        GatewayError::Cache(s) => AppError::Other(anyhow::anyhow!("cache: {}", s)),
    }
}
