//! Core library for the `weather` front end.
//!
//! This crate defines:
//! - The weather state container (`WeatherStore`) and its actions
//! - Abstraction over the weather provider, with a WeatherAPI.com client
//! - Shared domain models and the projections derived from one forecast
//! - Configuration and the small persisted subset (settings, search history)
//! - Background refresh and chart data preparation
//!
//! It is used by `weather-cli`, but can also back any other front end.

pub mod category;
pub mod chart;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod persist;
pub mod projection;
pub mod provider;
pub mod refresh;
pub mod settings;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use category::WeatherCategory;
pub use config::Config;
pub use error::WeatherError;
pub use history::SearchHistory;
pub use model::{
    CurrentConditions, DailySample, HourlySample, PlaceSpec, PlaceSuggestion, WeatherReport,
};
pub use persist::PersistedState;
pub use provider::{WeatherProvider, provider_from_config, weatherapi::WeatherApiProvider};
pub use refresh::{AutoRefresh, ensure_loaded};
pub use settings::{Settings, celsius_to_fahrenheit};
pub use store::{WeatherState, WeatherStore};
