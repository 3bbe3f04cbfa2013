//! State holder sitting between a front end and the provider.
//!
//! Each search takes a new generation number. Only the newest generation may
//! write its outcome, so a slow earlier request can never overwrite a newer one.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    model::{TemperatureUnit, WeatherViewModel},
    provider::WeatherProvider,
};

/// Snapshot of everything a front end renders.
#[derive(Debug, Clone, Default)]
pub struct WeatherState {
    pub weather: Option<Arc<WeatherViewModel>>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub temperature_unit: TemperatureUnit,
    pub current_location: String,
}

/// What happened to a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New view model stored.
    Updated,
    /// Error message stored; the previous view model is untouched.
    Failed,
    /// A newer search started first; the result was discarded.
    Superseded,
    /// Blank query; nothing was requested.
    Ignored,
}

#[derive(Debug)]
pub struct WeatherStore {
    provider: Arc<dyn WeatherProvider>,
    state: Mutex<WeatherState>,
    generation: AtomicU64,
}

impl WeatherStore {
    pub fn new(provider: Arc<dyn WeatherProvider>, unit: TemperatureUnit) -> Self {
        Self {
            provider,
            state: Mutex::new(WeatherState { temperature_unit: unit, ..WeatherState::default() }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> WeatherState {
        self.state.lock().clone()
    }

    /// Fetch weather for `query` and store the outcome.
    pub async fn search_location(&self, query: &str) -> FetchOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("ignoring blank location query");
            return FetchOutcome::Ignored;
        }

        let generation = {
            let mut state = self.state.lock();
            state.error = None;
            state.is_loading = true;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        debug!(query, generation, "searching location");

        let mut pending = PendingFetch { store: self, generation, finished: false };
        let result = self.provider.fetch_weather_by_location(query).await;
        pending.finished = true;
        drop(pending);

        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(query, generation, "discarding superseded result");
            return FetchOutcome::Superseded;
        }
        state.is_loading = false;

        match result {
            Ok(view) => {
                info!(location = %view.current.location, "weather loaded");
                state.current_location = view.current.location.clone();
                state.weather = Some(Arc::new(view));
                FetchOutcome::Updated
            }
            Err(err) => {
                warn!(query, kind = ?err.kind(), detail = ?err.detail(), "weather fetch failed");
                state.error = Some(err.user_message());
                FetchOutcome::Failed
            }
        }
    }

    /// Same as [`search_location`](Self::search_location); used for the initial load.
    pub async fn load_weather(&self, location: &str) -> FetchOutcome {
        self.search_location(location).await
    }

    pub fn toggle_temperature_unit(&self) -> TemperatureUnit {
        let mut state = self.state.lock();
        state.temperature_unit = state.temperature_unit.toggle();
        debug!(unit = %state.temperature_unit, "temperature unit toggled");
        state.temperature_unit
    }

    pub fn clear_error(&self) {
        self.state.lock().error = None;
    }
}

/// Clears the loading flag if a search future is dropped before the provider
/// answers, as long as no newer search has started since.
struct PendingFetch<'a> {
    store: &'a WeatherStore,
    generation: u64,
    finished: bool,
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.store.state.lock();
        if self.store.generation.load(Ordering::SeqCst) == self.generation {
            debug!(generation = self.generation, "search cancelled");
            state.is_loading = false;
        }
    }
}
