use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::WeatherCategory;

/// What to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceSpec {
    /// Free-text place name, resolved by the provider.
    Name(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl PlaceSpec {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates { latitude, longitude }
    }

    /// Value for the provider's `q` parameter.
    pub fn query(&self) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Coordinates { latitude, longitude } => format!("{latitude},{longitude}"),
        }
    }

    pub fn is_name(&self) -> bool {
        matches!(self, Self::Name(_))
    }
}

impl fmt::Display for PlaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query())
    }
}

/// Snapshot of the conditions right now. Replaced whole on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub place: String,
    pub country: String,
    pub temp_c: i32,
    pub condition: String,
    pub min_temp_c: i32,
    pub max_temp_c: i32,
    pub humidity_pct: u8,
    pub wind_kph: i32,
    pub category: WeatherCategory,
    pub feels_like_c: i32,
    pub pressure_mb: f64,
    pub visibility_km: f64,
    pub uv_index: f64,
    /// Provider's own timestamp text, e.g. "2025-10-12 14:30".
    pub provider_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// "HH:00"
    pub time: String,
    pub temp_c: i32,
    pub icon_url: String,
    pub category: WeatherCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    /// Localized weekday name.
    pub day: String,
    /// Localized short date, e.g. "17 Okt".
    pub date: String,
    pub icon_url: String,
    pub max_temp_c: i32,
    pub min_temp_c: i32,
    pub category: WeatherCategory,
}

/// The three projections of one provider response.
///
/// Kept together so they can only be replaced or cleared as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailySample>,
}

/// Autocomplete hit from the provider's search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl PlaceSuggestion {
    /// "Name, Region, Country", skipping a region that is empty or repeats the name.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if !self.region.is_empty() && self.region != self.name {
            parts.push(&self.region);
        }
        if !self.country.is_empty() {
            parts.push(&self.country);
        }
        parts.join(", ")
    }

    /// Entries without a name, country or a non-zero position are unusable.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.country.is_empty() && self.lat != 0.0 && self.lon != 0.0
    }
}

// Provider-neutral forecast payload. Providers validate their wire format
// into these; `projection` turns them into a `WeatherReport`.

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative path as sent by the provider, e.g. "//cdn.../113.png".
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCurrent {
    pub temp_c: f64,
    pub condition: Condition,
    pub humidity: u8,
    pub wind_kph: f64,
    pub feelslike_c: f64,
    pub pressure_mb: f64,
    pub vis_km: f64,
    pub uv: f64,
    pub is_day: bool,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastHour {
    pub time: NaiveDateTime,
    pub temp_c: f64,
    pub condition: Condition,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub condition: Condition,
    pub hours: Vec<ForecastHour>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub place: String,
    pub country: String,
    pub current: ForecastCurrent,
    pub days: Vec<ForecastDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(name: &str, region: &str, country: &str) -> PlaceSuggestion {
        PlaceSuggestion {
            id: 1,
            name: name.into(),
            region: region.into(),
            country: country.into(),
            lat: -6.21,
            lon: 106.85,
        }
    }

    #[test]
    fn coordinates_query_is_lat_comma_lon() {
        assert_eq!(PlaceSpec::coordinates(-6.2, 106.8).query(), "-6.2,106.8");
        assert_eq!(PlaceSpec::name("Bandung").query(), "Bandung");
    }

    #[test]
    fn display_name_skips_duplicate_region() {
        assert_eq!(
            suggestion("Jakarta", "Jakarta Raya", "Indonesia").display_name(),
            "Jakarta, Jakarta Raya, Indonesia"
        );
        assert_eq!(suggestion("Bali", "Bali", "Indonesia").display_name(), "Bali, Indonesia");
        assert_eq!(suggestion("Bali", "", "Indonesia").display_name(), "Bali, Indonesia");
    }

    #[test]
    fn incomplete_suggestions_are_flagged() {
        assert!(suggestion("Jakarta", "", "Indonesia").is_complete());
        assert!(!suggestion("Jakarta", "", "").is_complete());

        let mut zero = suggestion("Null Island", "", "Nowhere");
        zero.lat = 0.0;
        assert!(!zero.is_complete());
    }
}
