pub mod config;
pub mod error;

pub use config::{Config, LocationConfig, SearchConfig, TemperatureUnit, WeatherConfig};
pub use error::{AppError, ConfigError, LocationError, WeatherError};

use anyhow::Result;

/// Initialize logging. Output goes to stderr so it never interleaves with
/// the rendered weather on stdout.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Skycast core initialized");
    Ok(())
}
