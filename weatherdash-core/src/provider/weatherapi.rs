use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    Config,
    error::{WeatherError, classify_status},
    model::{LocationSuggestion, WeatherViewModel},
    normalize::normalize,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
const FORECAST_DAYS: &str = "7";

/// Client for the WeatherAPI.com forecast and search endpoints.
#[derive(Clone)]
pub struct WeatherApiClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WeatherApiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key().map(str::to_owned)).with_base_url(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(WeatherError::Configuration)
    }

    /// Fetch and normalize the forecast, keeping only hours at or after `now`.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_weather_at(
        &self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<WeatherViewModel, WeatherError> {
        let key = self.api_key()?;

        let body = self
            .get(
                "forecast.json",
                &[("key", key), ("q", query), ("days", FORECAST_DAYS), ("aqi", "no")],
            )
            .await?;

        let payload: ForecastPayload = serde_json::from_str(&body)?;
        let view = normalize(&payload, now)?;

        debug!(
            location = %view.current.location,
            days = view.daily.len(),
            hours = view.hourly.len(),
            "forecast normalized"
        );
        Ok(view)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn lookup_locations(
        &self,
        query: &str,
    ) -> Result<Vec<LocationSuggestion>, WeatherError> {
        let key = self.api_key()?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.get("search.json", &[("key", key), ("q", query)]).await?;
        let raw: Vec<SearchResult> = serde_json::from_str(&body)?;

        Ok(raw.into_iter().map(LocationSuggestion::from).collect())
    }

    /// Single GET with status classification. Returns the body of a 2xx response.
    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self.http.get(&url).query(query).send().await.map_err(|e| {
            let err = WeatherError::from(e);
            warn!(endpoint, detail = ?err.detail(), "request to weather provider failed");
            err
        })?;

        let status = res.status();
        if !status.is_success() {
            // The body is log detail only; the status decides the error.
            let body = res.text().await.unwrap_or_default();
            warn!(
                endpoint,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "weather provider returned an error status"
            );
            return Err(classify_status(status));
        }

        let body = res.text().await?;
        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn fetch_weather_by_location(
        &self,
        query: &str,
    ) -> Result<WeatherViewModel, WeatherError> {
        self.fetch_weather_at(query, Utc::now()).await
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<LocationSuggestion>, WeatherError> {
        self.lookup_locations(query).await
    }
}

// Provider payloads. Temperatures are optional so a response carrying only
// one unit can still be normalized.

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub location: WaLocation,
    pub current: WaCurrent,
    pub forecast: WaForecast,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaCondition {
    pub text: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaCurrent {
    pub temp_f: Option<f64>,
    pub temp_c: Option<f64>,
    pub feelslike_f: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub condition: WaCondition,
    pub humidity: u8,
    pub wind_mph: f64,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub last_updated: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaDay {
    pub maxtemp_f: Option<f64>,
    pub maxtemp_c: Option<f64>,
    pub mintemp_f: Option<f64>,
    pub mintemp_c: Option<f64>,
    pub condition: WaCondition,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
    #[serde(default)]
    pub maxwind_mph: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaHour {
    pub time: String,
    pub time_epoch: Option<i64>,
    pub temp_f: Option<f64>,
    pub temp_c: Option<f64>,
    pub condition: WaCondition,
    #[serde(default)]
    pub chance_of_rain: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaForecastDay {
    pub date: String,
    pub day: WaDay,
    #[serde(default)]
    pub hour: Vec<WaHour>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaForecast {
    #[serde(default)]
    pub forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i64,
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
}

impl From<SearchResult> for LocationSuggestion {
    fn from(r: SearchResult) -> Self {
        LocationSuggestion {
            id: r.id,
            name: r.name,
            region: r.region,
            country: r.country,
            lat: r.lat,
            lon: r.lon,
        }
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = WeatherApiClient::new(None).with_base_url("http://localhost:1234/v1/");
        assert_eq!(client.base_url(), "http://localhost:1234/v1");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let client = WeatherApiClient::new(Some("SECRET".into()));
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let client = WeatherApiClient::new(Some("  ".into()));
        assert!(matches!(client.api_key(), Err(WeatherError::Configuration)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.len() <= 200);
        assert!(cut.chars().all(|c| c == 'é'));
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        // Unroutable base URL: reaching the network would produce a Network error.
        let client = WeatherApiClient::new(None).with_base_url("http://127.0.0.1:9");
        let err = client.fetch_weather_by_location("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Configuration));

        let err = client.search_locations("Lon").await.unwrap_err();
        assert!(matches!(err, WeatherError::Configuration));
    }
}
