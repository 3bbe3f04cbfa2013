//! Display helpers shared by the normalizer and any front end.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::model::TemperatureUnit;

const PROVIDER_DATE: &str = "%Y-%m-%d";
const PROVIDER_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Round half up to a whole degree and append the unit, e.g. `68.5 -> "69°F"`.
pub fn format_temperature(value: f64, unit: TemperatureUnit) -> String {
    let mut rounded = value.round();
    // `round` takes negative halves away from zero; half up means toward +inf.
    if value - rounded == 0.5 {
        rounded += 1.0;
    }
    let rounded = rounded as i64;
    format!("{rounded}°{}", unit.symbol())
}

pub(crate) fn parse_provider_time(s: &str) -> Option<NaiveDateTime> {
    PROVIDER_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
}

pub(crate) fn parse_provider_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), PROVIDER_DATE).ok()
}

/// `"2025-12-11 15:00" -> "3:00 PM"`. Unparseable input is returned as-is.
pub fn format_time(s: &str) -> String {
    match parse_provider_time(s) {
        Some(dt) => dt.format("%-I:%M %p").to_string(),
        None => {
            debug!(input = s, "unparseable provider time");
            s.to_string()
        }
    }
}

/// `"2025-12-11" -> "Dec 11"`. Unparseable input is returned as-is.
pub fn format_date(s: &str) -> String {
    match parse_provider_date(s) {
        Some(d) => d.format("%b %-d").to_string(),
        None => {
            debug!(input = s, "unparseable provider date");
            s.to_string()
        }
    }
}

/// `"2025-12-11" -> "Thursday"`. Empty for unparseable input.
///
/// Dates carry no offset, so the weekday is that of the UTC calendar date and
/// never depends on the local clock.
pub fn format_day_of_week(s: &str) -> String {
    parse_provider_date(s)
        .map(|d| d.format("%A").to_string())
        .unwrap_or_default()
}
