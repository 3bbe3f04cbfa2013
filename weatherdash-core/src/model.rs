use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit temperatures are displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Celsius => "C",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            _ => Err(format!("Unknown temperature unit '{s}'. Use 'f' or 'c'.")),
        }
    }
}

/// A temperature as reported by the provider in both units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub fahrenheit: f64,
    pub celsius: f64,
}

impl Temperature {
    pub fn in_unit(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Fahrenheit => self.fahrenheit,
            TemperatureUnit::Celsius => self.celsius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// "City, Region", falling back to the country when the region adds nothing.
    pub location: String,
    pub temperature: Temperature,
    pub feels_like: Temperature,
    pub condition: String,
    pub condition_icon: String,
    pub humidity_pct: u8,
    pub wind_mph: f64,
    pub wind_dir: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Provider date string, e.g. "2025-12-11".
    pub date: String,
    pub day_of_week: String,
    /// Short label such as "Dec 11".
    pub date_display: String,
    pub high: Temperature,
    pub low: Temperature,
    pub condition: String,
    pub condition_icon: String,
    pub precipitation_chance: u8,
    pub max_wind_mph: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Provider wall-clock time, e.g. "2025-12-11 15:00".
    pub time: String,
    pub instant: DateTime<Utc>,
    /// 12-hour clock label, e.g. "3:00 PM".
    pub time_display: String,
    pub temperature: Temperature,
    pub condition: String,
    pub condition_icon: String,
    pub precipitation_chance: u8,
}

/// Normalized weather for one location. Replaced wholesale on every
/// successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherViewModel {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
}

/// A candidate match returned by the location search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub id: i64,
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl LocationSuggestion {
    /// "Name, Region, Country", skipping empty parts.
    pub fn display_name(&self) -> String {
        [self.name.as_str(), self.region.as_str(), self.country.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}
