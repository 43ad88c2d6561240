use chrono::{DateTime, Locale, Utc};
use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    WeatherError,
    history::SearchHistory,
    model::{
        CurrentConditions, DailySample, HourlySample, PlaceSpec, PlaceSuggestion, WeatherReport,
    },
    persist::PersistedState,
    projection,
    provider::WeatherProvider,
    settings::Settings,
};

/// Shortest query sent to the autocomplete endpoint.
pub const MIN_SUGGEST_QUERY: usize = 2;
pub const MAX_SUGGESTIONS: usize = 8;

/// Everything a front end renders. Observers always see a whole state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    /// Current conditions and both forecasts from the last good fetch.
    pub report: Option<WeatherReport>,
    pub settings: Settings,
    pub search_history: SearchHistory,
    pub is_loading: bool,
    pub error: Option<String>,
    /// When the last successful fetch completed.
    pub last_updated: Option<DateTime<Utc>>,
}

impl WeatherState {
    pub fn current(&self) -> Option<&CurrentConditions> {
        self.report.as_ref().map(|r| &r.current)
    }

    pub fn hourly(&self) -> &[HourlySample] {
        self.report.as_ref().map_or(&[], |r| r.hourly.as_slice())
    }

    pub fn daily(&self) -> &[DailySample] {
        self.report.as_ref().map_or(&[], |r| r.daily.as_slice())
    }

    /// Name of the place currently shown, if any.
    pub fn place(&self) -> Option<&str> {
        self.current().map(|c| c.place.as_str())
    }
}

/// The weather state container.
///
/// Shared as `Arc<WeatherStore>`. Every mutation is committed through a
/// `watch` channel, so `subscribe()` observers are notified of each change.
/// Overlapping fetches are ordered by issue: only the most recently started
/// fetch may commit, older results are dropped.
#[derive(Debug)]
pub struct WeatherStore {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<WeatherState>,
    generation: AtomicU64,
    locale: Locale,
    storage: Option<PathBuf>,
    /// Held from snapshot to file write so saves land in commit order.
    save_lock: Mutex<()>,
}

impl WeatherStore {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(WeatherState::default());
        Self {
            provider,
            state,
            generation: AtomicU64::new(0),
            locale: Locale::id_ID,
            storage: None,
            save_lock: Mutex::new(()),
        }
    }

    /// Load settings and history from `path` and write them back there on change.
    pub fn with_storage(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let persisted = PersistedState::load_or_default(&path);
        debug!(
            path = %path.display(),
            history = persisted.search_history.len(),
            "loaded preferences"
        );

        self.state.send_modify(|s| {
            s.settings = persisted.settings;
            s.search_history = persisted.search_history;
        });
        self.storage = Some(path);
        self
    }

    /// Locale for weekday and month names in the daily forecast.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn snapshot(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn has_report(&self) -> bool {
        self.state.borrow().report.is_some()
    }

    /// Fetch and replace the report for `place`.
    ///
    /// On failure the report is cleared and the message stored in `error`;
    /// the typed error is returned as well. A successful name search is
    /// recorded in the history under the provider's spelling of the place.
    /// If a newer fetch started meanwhile, this result is dropped unseen.
    pub async fn fetch(&self, place: PlaceSpec) -> Result<(), WeatherError> {
        let mut ticket = 0;
        self.state.send_modify(|s| {
            ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            s.is_loading = true;
            s.error = None;
        });
        let mut guard = LoadingGuard { store: self, ticket, settled: false };
        info!(%place, ticket, "fetching weather");

        let outcome = match self.provider.forecast(&place).await {
            Ok(forecast) => projection::project(&forecast, self.locale),
            Err(err) => Err(err),
        };

        let mut record_place = false;
        let committed = self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != ticket {
                return false;
            }
            match &outcome {
                Ok(report) => {
                    if place.is_name() {
                        s.search_history.push(&report.current.place);
                        record_place = true;
                    }
                    s.report = Some(report.clone());
                    s.error = None;
                    s.last_updated = Some(Utc::now());
                }
                Err(err) => {
                    s.report = None;
                    s.error = Some(err.to_string());
                }
            }
            s.is_loading = false;
            true
        });
        guard.settled = true;

        if !committed {
            debug!(%place, ticket, "discarding stale weather response");
            return outcome.map(|_| ());
        }
        if record_place {
            self.persist();
        }

        match outcome {
            Ok(_) => {
                info!(%place, "weather updated");
                Ok(())
            }
            Err(err) => {
                warn!(%place, error = %err, "weather fetch failed");
                Err(err)
            }
        }
    }

    /// Fetch by position. Never recorded in the search history.
    pub async fn set_location_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), WeatherError> {
        self.fetch(PlaceSpec::coordinates(latitude, longitude)).await
    }

    /// Re-fetch the place currently shown. Returns `false` when there is none.
    pub async fn refresh_weather(&self) -> Result<bool, WeatherError> {
        let place = self.state.borrow().place().map(str::to_owned);
        match place {
            Some(place) => self.fetch(PlaceSpec::Name(place)).await.map(|()| true),
            None => Ok(false),
        }
    }

    pub fn toggle_unit(&self) -> Settings {
        self.update_settings(|s| s.is_celsius = !s.is_celsius)
    }

    pub fn toggle_auto_theme(&self) -> Settings {
        self.update_settings(|s| s.auto_theme = !s.auto_theme)
    }

    pub fn toggle_notifications(&self) -> Settings {
        self.update_settings(|s| s.notifications = !s.notifications)
    }

    pub fn add_to_history(&self, place: &str) {
        self.state.send_modify(|s| s.search_history.push(place));
        self.persist();
    }

    pub fn clear_history(&self) {
        self.state.send_modify(|s| s.search_history.clear());
        self.persist();
    }

    /// Drops the error message; the report is left as is.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Autocomplete for the search box. Does not touch the store state.
    pub async fn suggest_places(&self, query: &str) -> Result<Vec<PlaceSuggestion>, WeatherError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_QUERY {
            return Ok(Vec::new());
        }

        let hits = self.provider.search(query).await?;
        Ok(hits.into_iter().filter(PlaceSuggestion::is_complete).take(MAX_SUGGESTIONS).collect())
    }

    fn update_settings(&self, f: impl FnOnce(&mut Settings)) -> Settings {
        let mut updated = Settings::default();
        self.state.send_modify(|s| {
            f(&mut s.settings);
            updated = s.settings;
        });
        self.persist();
        updated
    }

    fn persist(&self) {
        let Some(path) = &self.storage else {
            return;
        };

        let _saving = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let record = {
            let s = self.state.borrow();
            PersistedState { search_history: s.search_history.clone(), settings: s.settings }
        };

        if let Err(err) = record.save_to(path) {
            warn!("Failed to save preferences: {err:#}");
        }
    }
}

/// Resets `is_loading` when a fetch future is dropped before it commits,
/// unless a newer fetch owns the flag by then.
struct LoadingGuard<'a> {
    store: &'a WeatherStore,
    ticket: u64,
    settled: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let (store, ticket) = (self.store, self.ticket);
        let reset = store.state.send_if_modified(|s| {
            if store.generation.load(Ordering::SeqCst) != ticket || !s.is_loading {
                return false;
            }
            s.is_loading = false;
            true
        });
        if reset {
            debug!(ticket, "fetch dropped before completing");
        }
    }
}
