//! Provider payload to view model.
//!
//! Everything here is pure: the same payload and `now` always produce the
//! same view model.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{
    error::WeatherError,
    format::{format_date, format_day_of_week, format_time, parse_provider_time},
    model::{CurrentConditions, DailyForecast, HourlyForecast, Temperature, WeatherViewModel},
    provider::weatherapi::{ForecastPayload, WaCurrent, WaForecastDay, WaHour, WaLocation},
};

pub const MAX_HOURLY_ENTRIES: usize = 24;

pub fn normalize(
    payload: &ForecastPayload,
    now: DateTime<Utc>,
) -> Result<WeatherViewModel, WeatherError> {
    let current = current_conditions(&payload.location, &payload.current)?;

    let daily = payload
        .forecast
        .forecastday
        .iter()
        .map(daily_forecast)
        .collect::<Result<Vec<_>, _>>()?;

    let hourly = upcoming_hours(&payload.forecast.forecastday, now)?;

    Ok(WeatherViewModel { current, daily, hourly })
}

/// Parse a raw provider body and normalize it.
pub fn normalize_json(body: &str, now: DateTime<Utc>) -> Result<WeatherViewModel, WeatherError> {
    let payload: ForecastPayload = serde_json::from_str(body)?;
    normalize(&payload, now)
}

/// "{name}, {region}", using the country when the region is empty or repeats
/// the name or country.
pub fn display_location(loc: &WaLocation) -> String {
    let name = loc.name.trim();
    let region = loc.region.trim();
    let country = loc.country.trim();

    let suffix = if !region.is_empty() && region != name && region != country {
        region
    } else {
        country
    };

    if suffix.is_empty() || suffix == name {
        name.to_string()
    } else {
        format!("{name}, {suffix}")
    }
}

/// Give icon URLs an explicit https scheme. The provider returns
/// scheme-relative URLs such as `//cdn.weatherapi.com/...`.
pub fn https_icon(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.starts_with("https://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{rest}")
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

/// Both unit values come from the provider. Only when one is absent is it
/// derived from the other.
fn temperature_pair(
    fahrenheit: Option<f64>,
    celsius: Option<f64>,
    field: &str,
) -> Result<Temperature, WeatherError> {
    match (fahrenheit, celsius) {
        (Some(fahrenheit), Some(celsius)) => Ok(Temperature { fahrenheit, celsius }),
        (Some(fahrenheit), None) => Ok(Temperature { fahrenheit, celsius: (fahrenheit - 32.0) * 5.0 / 9.0 }),
        (None, Some(celsius)) => Ok(Temperature { fahrenheit: celsius * 9.0 / 5.0 + 32.0, celsius }),
        (None, None) => Err(WeatherError::Unexpected(format!("provider response is missing {field}"))),
    }
}

fn current_conditions(
    loc: &WaLocation,
    cur: &WaCurrent,
) -> Result<CurrentConditions, WeatherError> {
    Ok(CurrentConditions {
        location: display_location(loc),
        temperature: temperature_pair(cur.temp_f, cur.temp_c, "current temperature")?,
        feels_like: temperature_pair(cur.feelslike_f, cur.feelslike_c, "current feels-like")?,
        condition: cur.condition.text.clone(),
        condition_icon: https_icon(&cur.condition.icon),
        humidity_pct: cur.humidity,
        wind_mph: cur.wind_mph,
        wind_dir: cur.wind_dir.clone(),
        last_updated: cur.last_updated.clone(),
    })
}

fn daily_forecast(fd: &WaForecastDay) -> Result<DailyForecast, WeatherError> {
    let day = &fd.day;
    Ok(DailyForecast {
        date: fd.date.clone(),
        day_of_week: format_day_of_week(&fd.date),
        date_display: format_date(&fd.date),
        high: temperature_pair(day.maxtemp_f, day.maxtemp_c, "daily high")?,
        low: temperature_pair(day.mintemp_f, day.mintemp_c, "daily low")?,
        condition: day.condition.text.clone(),
        condition_icon: https_icon(&day.condition.icon),
        precipitation_chance: day.daily_chance_of_rain,
        max_wind_mph: day.maxwind_mph,
    })
}

fn hour_instant(hour: &WaHour) -> Option<DateTime<Utc>> {
    match hour.time_epoch {
        Some(epoch) => DateTime::from_timestamp(epoch, 0),
        None => parse_provider_time(&hour.time).map(|naive| naive.and_utc()),
    }
}

fn upcoming_hours(
    days: &[WaForecastDay],
    now: DateTime<Utc>,
) -> Result<Vec<HourlyForecast>, WeatherError> {
    let mut upcoming: Vec<(DateTime<Utc>, &WaHour)> = days
        .iter()
        .flat_map(|d| d.hour.iter())
        .filter_map(|h| match hour_instant(h) {
            Some(instant) => Some((instant, h)),
            None => {
                warn!(time = %h.time, "skipping hourly entry with unparseable time");
                None
            }
        })
        .filter(|(instant, _)| *instant >= now)
        .collect();

    upcoming.sort_by_key(|(instant, _)| *instant);

    upcoming
        .into_iter()
        .take(MAX_HOURLY_ENTRIES)
        .map(|(instant, h)| {
            Ok(HourlyForecast {
                time: h.time.clone(),
                instant,
                time_display: format_time(&h.time),
                temperature: temperature_pair(h.temp_f, h.temp_c, "hourly temperature")?,
                condition: h.condition.text.clone(),
                condition_icon: https_icon(&h.condition.icon),
                precipitation_chance: h.chance_of_rain,
            })
        })
        .collect()
}
