//! Where "use my location" gets its coordinates from.
//!
//! A terminal has no geolocation prompt, so the user grants location by
//! configuring coordinates ahead of time. No coordinates means denied.

use skycast_core::LocationConfig;

use crate::types::{Location, LocationError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSource {
    /// A location the user has shared
    Fixed(Location),
    /// The user has not granted location access
    Denied,
}

impl LocationSource {
    pub fn from_config(config: &LocationConfig) -> Self {
        match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Self::Fixed(Location {
                latitude,
                longitude,
            }),
            _ => Self::Denied,
        }
    }

    pub async fn current_location(&self) -> Result<Location, LocationError> {
        match self {
            Self::Fixed(location) => Ok(*location),
            Self::Denied => Err(LocationError::PermissionDenied),
        }
    }
}
