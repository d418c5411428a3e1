//! Centralized error types for Skycast.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Crate-level errors convert into this type at the UI boundary.
/// Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Location(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Weather gateway errors.
///
/// Not-found, auth and server failures are deliberately presented with one
/// message; the status code is kept for logs.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API error: status {status}")]
    ApiError { status: u16 },

    #[error("Weather API unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        "City not found or API error"
    }
}

/// Location errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "Location permission denied",
            LocationError::Unavailable(_) => "Unable to fetch weather for location",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_errors_share_one_message() {
        let not_found = AppError::from(WeatherError::ApiError { status: 404 });
        let unauthorized = AppError::from(WeatherError::ApiError { status: 401 });
        let malformed = AppError::from(WeatherError::MalformedResponse("list".into()));

        assert_eq!(not_found.user_message(), "City not found or API error");
        assert_eq!(unauthorized.user_message(), not_found.user_message());
        assert_eq!(malformed.user_message(), not_found.user_message());
    }

    #[test]
    fn test_status_kept_in_display() {
        let err = WeatherError::ApiError { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_location_messages() {
        let app_err: AppError = LocationError::PermissionDenied.into();
        assert!(matches!(
            app_err,
            AppError::Location(LocationError::PermissionDenied)
        ));
        assert_eq!(app_err.user_message(), "Location permission denied");
    }
}
