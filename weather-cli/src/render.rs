//! Plain-text rendering of the store state.

use chrono::{Local, Locale};
use std::fmt::Write;
use weather_core::{
    SearchHistory, Settings, WeatherCategory, WeatherState,
    chart::{self, WeeklyRow},
};

const BAR_WIDTH: usize = 30;

fn glyph(category: WeatherCategory) -> &'static str {
    match category {
        WeatherCategory::Sunny => "☀",
        WeatherCategory::Cloudy => "☁",
        WeatherCategory::Rainy => "☂",
        WeatherCategory::Stormy => "⚡",
        WeatherCategory::Night => "☾",
    }
}

pub fn dashboard(state: &WeatherState, locale: Locale) -> String {
    let mut out = String::new();
    let s = &state.settings;
    let unit = s.unit_symbol();

    let Some(now) = state.current() else {
        match &state.error {
            Some(err) => writeln!(out, "No weather data: {err}").ok(),
            None => writeln!(out, "No weather data yet.").ok(),
        };
        return out;
    };

    writeln!(out, "{} {}, {}", glyph(now.category), now.place, now.country).ok();
    writeln!(out, "  {}{unit}  {}", s.display_temp(now.temp_c), now.condition).ok();
    writeln!(
        out,
        "  H {}{unit}  L {}{unit}  feels like {}{unit}",
        s.display_temp(now.max_temp_c),
        s.display_temp(now.min_temp_c),
        s.display_temp(now.feels_like_c),
    )
    .ok();
    writeln!(
        out,
        "  humidity {}%  wind {} km/h  pressure {} mb  visibility {} km  UV {}",
        now.humidity_pct, now.wind_kph, now.pressure_mb, now.visibility_km, now.uv_index
    )
    .ok();
    if let Some(at) = state.last_updated {
        writeln!(
            out,
            "  updated {} (provider {})",
            at.with_timezone(&Local).format("%H:%M"),
            now.provider_updated
        )
        .ok();
    }

    out.push('\n');
    let hours: Vec<String> = chart::hourly_chart(state.hourly(), s, locale)
        .iter()
        .map(|p| format!("{} {}°", p.label, p.temp))
        .collect();
    writeln!(out, "  {}", hours.join(" | ")).ok();

    out.push('\n');
    for d in state.daily() {
        writeln!(
            out,
            "  {} {:<10} {:<7} {:>4}{unit} / {:>4}{unit}",
            glyph(d.category),
            d.day,
            d.date,
            s.display_temp(d.max_temp_c),
            s.display_temp(d.min_temp_c),
        )
        .ok();
    }

    out
}

pub fn forecast(state: &WeatherState, locale: Locale) -> String {
    let mut out = String::new();
    let s = &state.settings;

    if let Some(now) = state.current() {
        writeln!(out, "{}, {}", now.place, now.country).ok();
    }

    let points = chart::hourly_chart(state.hourly(), s, locale);
    if let (Some(lo), Some(hi)) =
        (points.iter().map(|p| p.temp).min(), points.iter().map(|p| p.temp).max())
    {
        writeln!(out, "\nHourly ({})", s.unit_symbol()).ok();
        for p in &points {
            let len = if hi > lo {
                1 + ((p.temp - lo) as usize * (BAR_WIDTH - 1)) / (hi - lo) as usize
            } else {
                BAR_WIDTH / 2
            };
            writeln!(out, "  {:>8} {:>4} {}", p.label, p.temp, "▇".repeat(len)).ok();
        }
    }

    let rows = chart::weekly_rows(state.daily(), s, locale);
    if !rows.is_empty() {
        writeln!(out, "\nWeekly ({})", s.unit_symbol()).ok();
        for row in &rows {
            writeln!(
                out,
                "  {} {:<9} {:>4} {} {:<4}",
                glyph(row.category),
                row.label,
                row.min,
                range_bar(row),
                row.max
            )
            .ok();
        }
    }

    if out.is_empty() {
        out.push_str("No forecast available.\n");
    }
    out
}

/// Track of `BAR_WIDTH` cells with the day's span filled between its markers.
fn range_bar(row: &WeeklyRow) -> String {
    let cell = |pos: f64| ((pos / 100.0) * (BAR_WIDTH - 1) as f64).round() as usize;
    let (from, to) = (cell(row.min_pos), cell(row.max_pos));
    (0..BAR_WIDTH)
        .map(|i| if (from..=to).contains(&i) { '━' } else { '·' })
        .collect()
}

pub fn history(history: &SearchHistory) -> String {
    if history.is_empty() {
        return "No recent searches.\n".to_string();
    }
    history.iter().enumerate().map(|(i, place)| format!("{}. {place}\n", i + 1)).collect()
}

pub fn settings(settings: &Settings) -> String {
    let on_off = |b: bool| if b { "on" } else { "off" };
    format!(
        "unit:          {}\nauto theme:    {}\nnotifications: {}\n",
        settings.unit_symbol(),
        on_off(settings.auto_theme),
        on_off(settings.notifications),
    )
}
