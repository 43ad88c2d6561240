use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse weather bucket that drives icon and background selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Night,
}

impl WeatherCategory {
    /// Classify a provider condition text.
    ///
    /// Night wins over any text. Otherwise the keyword groups are checked in
    /// order, so "Cloudy with thunderstorms" is `Stormy`. Snow has no bucket
    /// of its own and lands in `Stormy`; fog and mist land in `Cloudy`.
    pub fn classify(condition_text: &str, is_day: bool) -> Self {
        if !is_day {
            return Self::Night;
        }

        let text = condition_text.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if has(&["sunny", "clear"]) {
            Self::Sunny
        } else if has(&["storm", "thunder"]) {
            Self::Stormy
        } else if has(&["rain", "drizzle", "sleet"]) {
            Self::Rainy
        } else if has(&["snow", "blizzard"]) {
            Self::Stormy
        } else if has(&["fog", "mist", "cloud", "overcast"]) {
            Self::Cloudy
        } else {
            Self::Sunny
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Stormy => "stormy",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
