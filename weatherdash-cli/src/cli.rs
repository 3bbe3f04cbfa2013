use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weatherdash_core::{
    Config, FetchOutcome, TemperatureUnit, WeatherProvider, WeatherStore, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Current weather and forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key in the config file.
    Configure,

    /// Show current conditions, the next 24 hours and the 7-day forecast.
    Show {
        /// City, postal code, "City, Region" or region. Defaults to the configured location.
        location: Option<String>,

        /// Temperature unit: f or c. Defaults to the configured unit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// Print the normalized view model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List locations matching a partial query.
    Search {
        query: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, unit, json } => show(location, unit, json).await,
            Command::Search { query } => search(&query).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(key);
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    location: Option<String>,
    unit: Option<TemperatureUnit>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;

    let unit = unit.unwrap_or(config.temperature_unit);
    let location = location.unwrap_or_else(|| config.default_location().to_string());

    let store = WeatherStore::new(provider, unit);
    let outcome = store.load_weather(&location).await;
    let state = store.snapshot();

    match (outcome, state.weather) {
        (FetchOutcome::Updated, Some(weather)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(weather.as_ref())?);
            } else {
                print!("{}", render::dashboard(&weather, state.temperature_unit));
            }
            Ok(())
        }
        (FetchOutcome::Ignored, _) => Err(anyhow!("Please enter a location")),
        _ => Err(anyhow!(
            state.error.unwrap_or_else(|| "Failed to load weather data".to_string())
        )),
    }
}

async fn search(query: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;

    let found = provider.search_locations(query).await?;
    if found.is_empty() {
        println!("No matching locations.");
    }
    for suggestion in &found {
        println!("{}", suggestion.display_name());
    }

    Ok(())
}
