use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    Config, WeatherError,
    config::DEFAULT_BASE_URL,
    model::{
        Condition, Forecast, ForecastCurrent, ForecastDay, ForecastHour, PlaceSpec,
        PlaceSuggestion,
    },
    provider::truncate_body,
};

use super::WeatherProvider;

const HOUR_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Client for WeatherAPI.com's `forecast.json` and `search.json`.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    language: String,
    days: u8,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "id".to_string(),
            days: 7,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            language: config.language.clone(),
            days: config.forecast_days,
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self, place), fields(place = %place))]
    async fn forecast(&self, place: &PlaceSpec) -> Result<Forecast, WeatherError> {
        let query = place.query();
        let days = self.days.to_string();

        let res = self
            .http
            .get(self.endpoint("forecast.json"))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query.as_str()),
                ("days", days.as_str()),
                ("lang", self.language.as_str()),
                ("aqi", "no"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "forecast response");

        if !status.is_success() {
            return Err(WeatherError::Provider(error_message(status, &body)));
        }

        let parsed: WaForecastResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::malformed(format!("{e} in body: {}", truncate_body(&body)))
        })?;

        parsed.into_forecast()
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, WeatherError> {
        let res = self
            .http
            .get(self.endpoint("search.json"))
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::Provider(format!(
                "HTTP {}: failed to fetch suggestions",
                status.as_u16()
            )));
        }

        let body = res.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(format!("search results: {e}")))?;

        // Anything but an array means "no suggestions"; bad entries are skipped.
        let hits = match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<PlaceSuggestion>(item).ok())
                .collect(),
            _ => Vec::new(),
        };

        Ok(hits)
    }
}

/// Provider's `error.message`, or a generic line with the status code.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<WaErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Error {}: failed to fetch weather data", status.as_u16()))
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: Option<WaErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

impl From<WaCondition> for Condition {
    fn from(c: WaCondition) -> Self {
        Condition { text: c.text, icon: c.icon }
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
    humidity: u8,
    wind_kph: f64,
    feelslike_c: f64,
    pressure_mb: f64,
    vis_km: f64,
    uv: f64,
    is_day: u8,
    last_updated: String,
}

#[derive(Debug, Deserialize)]
struct WaHour {
    time: String,
    temp_c: f64,
    condition: WaCondition,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
    #[serde(default)]
    hour: Vec<WaHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaForecastDay>,
}

/// Top-level parts are optional so a missing one reads as malformed data
/// rather than a JSON error.
#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: Option<WaLocation>,
    current: Option<WaCurrent>,
    forecast: Option<WaForecast>,
}

impl WaForecastResponse {
    fn into_forecast(self) -> Result<Forecast, WeatherError> {
        let location = self.location.ok_or_else(|| WeatherError::malformed("missing `location`"))?;
        let current = self.current.ok_or_else(|| WeatherError::malformed("missing `current`"))?;
        let forecast = self.forecast.ok_or_else(|| WeatherError::malformed("missing `forecast`"))?;

        let days = forecast
            .forecastday
            .into_iter()
            .map(WaForecastDay::into_day)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast {
            place: location.name,
            country: location.country,
            current: ForecastCurrent {
                temp_c: current.temp_c,
                condition: current.condition.into(),
                humidity: current.humidity,
                wind_kph: current.wind_kph,
                feelslike_c: current.feelslike_c,
                pressure_mb: current.pressure_mb,
                vis_km: current.vis_km,
                uv: current.uv,
                is_day: current.is_day != 0,
                last_updated: current.last_updated,
            },
            days,
        })
    }
}

impl WaForecastDay {
    fn into_day(self) -> Result<ForecastDay, WeatherError> {
        let hours = self
            .hour
            .into_iter()
            .map(|h| -> Result<ForecastHour, WeatherError> {
                let time = NaiveDateTime::parse_from_str(&h.time, HOUR_FORMAT).map_err(|e| {
                    WeatherError::malformed(format!("bad hour time '{}': {e}", h.time))
                })?;
                Ok(ForecastHour {
                    time,
                    temp_c: h.temp_c,
                    condition: h.condition.into(),
                    is_day: h.is_day != 0,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastDay {
            date: self.date,
            max_temp_c: self.day.maxtemp_c,
            min_temp_c: self.day.mintemp_c,
            condition: self.day.condition.into(),
            hours,
        })
    }
}
