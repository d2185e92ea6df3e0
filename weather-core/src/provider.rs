use crate::{Config, WeatherError, WeatherReport, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use tracing::warn;

pub mod openweather;

/// Per-request timeout for outbound HTTP calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.openweather_api_key()?;

    let provider = OpenWeatherProvider::new(api_key.to_owned())
        .with_base_url(config.openweather_base_url());

    Ok(Box::new(provider))
}

/// Shared reqwest client setup.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap_or_else(|err| {
        warn!("Falling back to default HTTP client: {err}");
        reqwest::Client::new()
    })
}
