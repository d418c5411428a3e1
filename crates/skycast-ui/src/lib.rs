//! Interaction layer for Skycast: the controller, its background
//! weather tasks and the text view they drive.

pub mod click;
pub mod controller;
pub mod debounce;
mod error_mapping;
pub mod events;
pub mod service;
pub mod view;

pub use click::{ClickBus, ClickSubscription, ClickTarget};
pub use controller::{Controller, ControllerSettings};
pub use debounce::Debouncer;
pub use events::UiEvent;
pub use service::ServiceError;
pub use view::{CurrentCard, ForecastCard, WeatherView};
