use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config, WeatherError,
    model::{Forecast, PlaceSpec, PlaceSuggestion},
    provider::weatherapi::WeatherApiProvider,
};

pub mod weatherapi;

/// Source of forecasts and place suggestions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions plus the multi-day forecast for `place`.
    async fn forecast(&self, place: &PlaceSpec) -> Result<Forecast, WeatherError>;

    /// Raw autocomplete hits for `query`; filtering is left to the caller.
    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, WeatherError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = WeatherApiProvider::from_config(config)?;
    Ok(Arc::new(provider))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn truncate_body_is_char_safe() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
