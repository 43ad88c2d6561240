use serde::{Deserialize, Serialize};

/// User preferences. Only ever changed through the store's toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub is_celsius: bool,
    pub auto_theme: bool,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { is_celsius: true, auto_theme: true, notifications: true }
    }
}

impl Settings {
    /// Temperature in the preferred unit, rounded for display.
    pub fn display_temp(&self, celsius: impl Into<f64>) -> i32 {
        let celsius = celsius.into();
        if self.is_celsius { round_half_up(celsius) } else { celsius_to_fahrenheit(celsius) }
    }

    pub fn unit_symbol(&self) -> &'static str {
        if self.is_celsius { "°C" } else { "°F" }
    }
}

/// Rounds .5 towards positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Converts and rounds once, on the Fahrenheit value.
pub fn celsius_to_fahrenheit(celsius: f64) -> i32 {
    round_half_up(celsius * 9.0 / 5.0 + 32.0)
}
