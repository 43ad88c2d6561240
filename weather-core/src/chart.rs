//! Data prepared for the forecast charts: the hourly temperature line and
//! the weekly min/max range bars.

use chrono::Locale;
use serde::Serialize;

use crate::{
    category::WeatherCategory,
    model::{DailySample, HourlySample},
    projection::HOURLY_SAMPLES,
    settings::Settings,
};

/// Range-bar markers sit between these percentages of the bar width.
const BAR_INSET: f64 = 10.0;
const BAR_SPAN: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub label: String,
    /// In the unit chosen in settings.
    pub temp: i32,
    pub temp_c: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRow {
    pub label: String,
    pub day: String,
    pub date: String,
    pub max: i32,
    pub min: i32,
    pub icon_url: String,
    pub category: WeatherCategory,
    /// Marker positions on the week's shared range bar, in percent.
    pub min_pos: f64,
    pub max_pos: f64,
}

/// Words for "now" and "today" in the display language.
fn relative_labels(locale: Locale) -> (&'static str, &'static str) {
    match locale {
        Locale::id_ID => ("Sekarang", "Hari ini"),
        _ => ("Now", "Today"),
    }
}

pub fn hourly_chart(
    hourly: &[HourlySample],
    settings: &Settings,
    locale: Locale,
) -> Vec<HourlyPoint> {
    let (now, _) = relative_labels(locale);
    hourly
        .iter()
        .take(HOURLY_SAMPLES)
        .enumerate()
        .map(|(i, h)| HourlyPoint {
            label: if i == 0 { now.to_string() } else { h.time.clone() },
            temp: settings.display_temp(h.temp_c),
            temp_c: h.temp_c,
        })
        .collect()
}

pub fn weekly_rows(daily: &[DailySample], settings: &Settings, locale: Locale) -> Vec<WeeklyRow> {
    let (_, today) = relative_labels(locale);

    let temps: Vec<(i32, i32)> = daily
        .iter()
        .map(|d| (settings.display_temp(d.min_temp_c), settings.display_temp(d.max_temp_c)))
        .collect();
    let lo = temps.iter().map(|(min, _)| *min).min().unwrap_or_default();
    let hi = temps.iter().map(|(_, max)| *max).max().unwrap_or_default();

    daily
        .iter()
        .zip(temps)
        .enumerate()
        .map(|(i, (d, (min, max)))| WeeklyRow {
            label: if i == 0 { today.to_string() } else { d.day.chars().take(3).collect() },
            day: d.day.clone(),
            date: d.date.clone(),
            max,
            min,
            icon_url: d.icon_url.clone(),
            category: d.category,
            min_pos: bar_position(min, lo, hi),
            max_pos: bar_position(max, lo, hi),
        })
        .collect()
}

/// Percent offset of `value` on a bar spanning `lo..=hi`. A flat week centers.
pub fn bar_position(value: i32, lo: i32, hi: i32) -> f64 {
    if hi <= lo {
        return 50.0;
    }
    f64::from(value - lo) / f64::from(hi - lo) * BAR_SPAN + BAR_INSET
}
