//! Light/dark theme preference, persisted in the cache store.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStore;
use crate::types::WeatherError;

/// Fixed cache key for the theme preference
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The saved theme, or Light when none is saved or it is unreadable
    pub fn load(store: &CacheStore) -> Self {
        store
            .load::<Theme>(THEME_KEY)
            .map(|entry| entry.payload)
            .unwrap_or_default()
    }

    pub fn persist(self, store: &mut CacheStore) -> Result<(), WeatherError> {
        store.save(THEME_KEY, &self)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label for the toggle control, naming the theme it switches to
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark mode",
            Self::Dark => "Light mode",
        }
    }
}
