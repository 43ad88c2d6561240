//! In-process provider for store tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    WeatherError,
    model::{
        Condition, Forecast, ForecastCurrent, ForecastDay, ForecastHour, PlaceSpec,
        PlaceSuggestion,
    },
    provider::WeatherProvider,
};

enum Outcome {
    Ok { place: String, is_day: bool },
    ProviderError(String),
    NoDays,
}

/// One scripted reply. Unscripted calls succeed with a place named after the query.
pub(crate) struct Script {
    delay: Duration,
    outcome: Outcome,
}

impl Script {
    pub fn ok(place: &str) -> Self {
        Self { delay: Duration::ZERO, outcome: Outcome::Ok { place: place.into(), is_day: true } }
    }

    pub fn provider_error(message: &str) -> Self {
        Self { delay: Duration::ZERO, outcome: Outcome::ProviderError(message.into()) }
    }

    pub fn no_days() -> Self {
        Self { delay: Duration::ZERO, outcome: Outcome::NoDays }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn at_night(mut self) -> Self {
        if let Outcome::Ok { is_day, .. } = &mut self.outcome {
            *is_day = false;
        }
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct StubProvider {
    scripts: Mutex<VecDeque<Script>>,
    queries: Mutex<Vec<String>>,
    searches: AtomicUsize,
}

impl std::fmt::Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Script").field("delay", &self.delay).finish_non_exhaustive()
    }
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn forecast(&self, place: &PlaceSpec) -> Result<Forecast, WeatherError> {
        self.queries.lock().unwrap().push(place.query());
        let script = self.scripts.lock().unwrap().pop_front();

        let script = script.unwrap_or_else(|| match place {
            PlaceSpec::Name(name) => Script::ok(&title_case(name)),
            PlaceSpec::Coordinates { .. } => Script::ok("Stubville"),
        });

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        match script.outcome {
            Outcome::Ok { place, is_day } => Ok(sample_forecast(&place, is_day, 7)),
            Outcome::ProviderError(message) => Err(WeatherError::Provider(message)),
            Outcome::NoDays => Ok(sample_forecast("Nowhere", true, 0)),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, WeatherError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok((0..12)
            .map(|i| PlaceSuggestion {
                id: i,
                name: format!("{query} {i}"),
                region: String::new(),
                // every third entry lacks a country
                country: if i % 3 == 2 { String::new() } else { "Indonesia".into() },
                lat: -6.0,
                lon: 106.0,
            })
            .collect())
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn condition(text: &str) -> Condition {
    Condition { text: text.into(), icon: "//cdn.weatherapi.com/weather/64x64/day/116.png".into() }
}

/// `days` days of 24 hours each, starting 2025-10-12.
pub(crate) fn sample_forecast(place: &str, is_day: bool, days: u32) -> Forecast {
    let start = NaiveDate::from_ymd_opt(2025, 10, 12).unwrap();
    Forecast {
        place: place.into(),
        country: "Indonesia".into(),
        current: ForecastCurrent {
            temp_c: 30.0,
            condition: condition("Partly cloudy"),
            humidity: 74,
            wind_kph: 9.4,
            feelslike_c: 34.1,
            pressure_mb: 1010.0,
            vis_km: 10.0,
            uv: 8.0,
            is_day,
            last_updated: "2025-10-12 14:30".into(),
        },
        days: (0..days)
            .map(|d| {
                let date = start + chrono::Days::new(d.into());
                ForecastDay {
                    date,
                    max_temp_c: 32.0,
                    min_temp_c: 24.0,
                    condition: condition("Patchy rain nearby"),
                    hours: (0..24)
                        .map(|h| ForecastHour {
                            time: date.and_hms_opt(h, 0, 0).unwrap(),
                            temp_c: 25.0 + f64::from(h) / 4.0,
                            condition: condition("Partly cloudy"),
                            is_day: (6..18).contains(&h),
                        })
                        .collect(),
                }
            })
            .collect(),
    }
}
