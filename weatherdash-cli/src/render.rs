use std::fmt::Write;

use weatherdash_core::{
    TemperatureUnit, WeatherViewModel,
    format::format_temperature,
};

/// Plain-text dashboard: current conditions, next 24 hours, then the daily forecast.
pub fn dashboard(weather: &WeatherViewModel, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    let cur = &weather.current;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", cur.location);
    let _ = writeln!(
        out,
        "  {}  {} (feels like {})",
        format_temperature(cur.temperature.in_unit(unit), unit),
        cur.condition,
        format_temperature(cur.feels_like.in_unit(unit), unit),
    );
    let _ = writeln!(
        out,
        "  Humidity {}%  Wind {:.0} mph {}  Updated {}",
        cur.humidity_pct, cur.wind_mph, cur.wind_dir, cur.last_updated
    );

    if !weather.hourly.is_empty() {
        let _ = writeln!(out, "\n24-Hour Forecast");
        for h in &weather.hourly {
            let _ = writeln!(
                out,
                "  {:>8}  {:>5}  {:>3}%  {}",
                h.time_display,
                format_temperature(h.temperature.in_unit(unit), unit),
                h.precipitation_chance,
                h.condition,
            );
        }
    }

    if !weather.daily.is_empty() {
        let _ = writeln!(out, "\n7-Day Forecast");
        for d in &weather.daily {
            let _ = writeln!(
                out,
                "  {:<9} {:<6}  {:>5} / {:<5}  {:>3}%  {}",
                d.day_of_week,
                d.date_display,
                format_temperature(d.high.in_unit(unit), unit),
                format_temperature(d.low.in_unit(unit), unit),
                d.precipitation_chance,
                d.condition,
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherdash_core::{CurrentConditions, DailyForecast, Temperature};

    fn weather() -> WeatherViewModel {
        WeatherViewModel {
            current: CurrentConditions {
                location: "San Francisco, California".into(),
                temperature: Temperature { fahrenheit: 68.5, celsius: 20.3 },
                feels_like: Temperature { fahrenheit: 66.2, celsius: 19.0 },
                condition: "Sunny".into(),
                condition_icon: "https://cdn.weatherapi.com/113.png".into(),
                humidity_pct: 60,
                wind_mph: 8.1,
                wind_dir: "W".into(),
                last_updated: "2025-12-11 14:15".into(),
            },
            daily: vec![DailyForecast {
                date: "2025-12-11".into(),
                day_of_week: "Thursday".into(),
                date_display: "Dec 11".into(),
                high: Temperature { fahrenheit: 70.0, celsius: 21.1 },
                low: Temperature { fahrenheit: 52.0, celsius: 11.1 },
                condition: "Sunny".into(),
                condition_icon: "https://cdn.weatherapi.com/113.png".into(),
                precipitation_chance: 10,
                max_wind_mph: 12.0,
            }],
            hourly: vec![],
        }
    }

    #[test]
    fn renders_in_selected_unit() {
        let f = dashboard(&weather(), TemperatureUnit::Fahrenheit);
        assert!(f.contains("69°F"));
        assert!(f.contains("Thursday"));
        assert!(!f.contains("24-Hour Forecast"));

        let c = dashboard(&weather(), TemperatureUnit::Celsius);
        assert!(c.contains("20°C"));
        assert!(c.contains("21°C / 11°C"));
    }
}
