//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client and its error classification
//! - Normalization of provider payloads into a view model
//! - Display formatters and the state holder a front end renders from
//!
//! It is used by `weatherdash-cli`, but can also back any other front end.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod state;

pub use config::Config;
pub use error::{ErrorKind, WeatherError};
pub use model::{
    CurrentConditions, DailyForecast, HourlyForecast, LocationSuggestion, Temperature,
    TemperatureUnit, WeatherViewModel,
};
pub use provider::{WeatherProvider, provider_from_config, weatherapi::WeatherApiClient};
pub use state::{FetchOutcome, WeatherState, WeatherStore};
