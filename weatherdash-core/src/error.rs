use reqwest::StatusCode;
use thiserror::Error;

/// Tag identifying which failure a [`WeatherError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    LocationNotFound,
    InvalidApiKey,
    RateLimited,
    Provider,
    Network,
    Unexpected,
}

/// Every way fetching weather can fail.
///
/// The `Display` output is the message shown to the user; the variant is the
/// tag callers branch on.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API key is not configured. Run `weatherdash configure` or set WEATHER_API_KEY.")]
    Configuration,

    #[error("Location not found. Please check the spelling and try again.")]
    LocationNotFound,

    #[error("Invalid API key. Please check your weather API configuration.")]
    InvalidApiKey,

    #[error("Weather service is temporarily unavailable. Please try again later.")]
    RateLimited,

    #[error("Unable to fetch weather data. Please try again later.")]
    Provider { status: u16 },

    #[error("Connection lost. Please check your internet connection and try again.")]
    Network(String),

    #[error("An unexpected error occurred while fetching weather data.")]
    Unexpected(String),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration => ErrorKind::Configuration,
            Self::LocationNotFound => ErrorKind::LocationNotFound,
            Self::InvalidApiKey => ErrorKind::InvalidApiKey,
            Self::RateLimited => ErrorKind::RateLimited,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Network(_) => ErrorKind::Network,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Message for display; identical to `to_string()`.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Underlying cause, for logs only. Never shown to the user.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Network(d) | Self::Unexpected(d) => Some(d.as_str()),
            _ => None,
        }
    }
}

/// Map a non-success HTTP status from the provider to an error.
pub fn classify_status(status: StatusCode) -> WeatherError {
    match status {
        StatusCode::BAD_REQUEST => WeatherError::LocationNotFound,
        StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
        StatusCode::FORBIDDEN => WeatherError::RateLimited,
        other => WeatherError::Provider { status: other.as_u16() },
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();
        if err.is_builder() || err.is_decode() {
            WeatherError::Unexpected(err.to_string())
        } else {
            WeatherError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Unexpected(format!("malformed provider response: {err}"))
    }
}
