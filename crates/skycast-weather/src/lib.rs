//! Weather data for Skycast
//!
//! Gateway client, daily forecast grouping and the timestamped local cache
//! that fronts them.

pub mod cache;
pub mod client;
pub mod clock;
pub mod forecast;
pub mod location;
pub mod theme;
pub mod types;

pub use cache::{weather_key, CacheEntry, CacheStore};
pub use client::{WeatherClient, WeatherEndpoints};
pub use clock::{Clock, ManualClock, SystemClock};
pub use forecast::{group_by_day, DayBucket, FORECAST_DAYS};
pub use location::LocationSource;
pub use theme::Theme;
pub use types::*;
