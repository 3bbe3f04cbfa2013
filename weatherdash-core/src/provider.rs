use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    Config, WeatherError,
    model::{LocationSuggestion, WeatherViewModel},
    provider::weatherapi::WeatherApiClient,
};

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions plus the daily and hourly forecast for `query`
    /// (city name, postal code, "City, Region" or a region name).
    async fn fetch_weather_by_location(
        &self,
        query: &str,
    ) -> Result<WeatherViewModel, WeatherError>;

    /// Candidate locations matching a partial query.
    async fn search_locations(&self, query: &str) -> Result<Vec<LocationSuggestion>, WeatherError>;
}

/// Construct the provider from config. The credential is read here, once.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
    if config.api_key().is_none() {
        return Err(WeatherError::Configuration);
    }

    Ok(Arc::new(WeatherApiClient::from_config(config)))
}
