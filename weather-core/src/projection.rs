//! Turns one provider `Forecast` into the three views the store holds.

use chrono::{Locale, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::{
    WeatherError,
    category::WeatherCategory,
    model::{CurrentConditions, DailySample, Forecast, ForecastDay, HourlySample, WeatherReport},
    settings::round_half_up,
};

/// Every n-th hour of today goes into the hourly view.
pub const HOURLY_STEP: usize = 3;
pub const HOURLY_SAMPLES: usize = 8;

/// Build the whole report from a single forecast. Fails only when today's entry is missing.
pub fn project(forecast: &Forecast, locale: Locale) -> Result<WeatherReport, WeatherError> {
    let today = forecast
        .days
        .first()
        .ok_or_else(|| WeatherError::malformed("no forecast for today"))?;

    Ok(WeatherReport {
        current: current_conditions(forecast, today),
        hourly: hourly_samples(today),
        daily: forecast.days.iter().map(|d| daily_sample(d, locale)).collect(),
    })
}

fn current_conditions(forecast: &Forecast, today: &ForecastDay) -> CurrentConditions {
    let now = &forecast.current;
    CurrentConditions {
        place: forecast.place.clone(),
        country: forecast.country.clone(),
        temp_c: round_half_up(now.temp_c),
        condition: now.condition.text.clone(),
        min_temp_c: round_half_up(today.min_temp_c),
        max_temp_c: round_half_up(today.max_temp_c),
        humidity_pct: now.humidity,
        wind_kph: round_half_up(now.wind_kph),
        category: WeatherCategory::classify(&now.condition.text, now.is_day),
        feels_like_c: round_half_up(now.feelslike_c),
        pressure_mb: now.pressure_mb,
        visibility_km: now.vis_km,
        uv_index: now.uv,
        provider_updated: now.last_updated.clone(),
    }
}

/// Indices 0, 3, 6, ... of today's hours, at most eight of them.
pub fn hourly_samples(today: &ForecastDay) -> Vec<HourlySample> {
    today
        .hours
        .iter()
        .step_by(HOURLY_STEP)
        .take(HOURLY_SAMPLES)
        .map(|h| HourlySample {
            time: format!("{:02}:00", h.time.hour()),
            temp_c: round_half_up(h.temp_c),
            icon_url: icon_url(&h.condition.icon),
            category: WeatherCategory::classify(&h.condition.text, h.is_day),
        })
        .collect()
}

fn daily_sample(day: &ForecastDay, locale: Locale) -> DailySample {
    DailySample {
        day: weekday_name(day.date, locale),
        date: short_date(day.date, locale),
        icon_url: icon_url(&day.condition.icon),
        max_temp_c: round_half_up(day.max_temp_c),
        min_temp_c: round_half_up(day.min_temp_c),
        // Daily summaries are always classified as daytime.
        category: WeatherCategory::classify(&day.condition.text, true),
    }
}

/// Provider icons are protocol-relative ("//cdn...").
pub fn icon_url(icon: &str) -> String {
    if icon.is_empty() || icon.starts_with("http") {
        icon.to_string()
    } else {
        format!("https:{icon}")
    }
}

pub fn weekday_name(date: NaiveDate, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized("%A", locale)
        .to_string()
}

/// Two-digit day and abbreviated month, e.g. "07 Okt".
pub fn short_date(date: NaiveDate, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized("%d %b", locale)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, ForecastCurrent, ForecastHour};

    fn cond(text: &str) -> Condition {
        Condition {
            text: text.into(),
            icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".into(),
        }
    }

    fn day(date: NaiveDate, hours: usize) -> ForecastDay {
        ForecastDay {
            date,
            max_temp_c: 31.6,
            min_temp_c: 24.4,
            condition: cond("Patchy rain nearby"),
            hours: (0..hours)
                .map(|i| ForecastHour {
                    time: date.and_hms_opt(i as u32, 0, 0).unwrap(),
                    temp_c: 20.0 + i as f64,
                    condition: cond("Partly cloudy"),
                    is_day: (6..18).contains(&i),
                })
                .collect(),
        }
    }

    fn forecast(days: Vec<ForecastDay>) -> Forecast {
        Forecast {
            place: "Jakarta".into(),
            country: "Indonesia".into(),
            current: ForecastCurrent {
                temp_c: 29.5,
                condition: cond("Partly cloudy"),
                humidity: 70,
                wind_kph: 11.2,
                feelslike_c: 33.4,
                pressure_mb: 1009.0,
                vis_km: 10.0,
                uv: 7.0,
                is_day: true,
                last_updated: "2025-10-12 14:30".into(),
            },
            days,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn hourly_takes_every_third_hour() {
        let samples = hourly_samples(&day(date(12), 24));

        let hours: Vec<_> = samples.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(
            hours,
            ["00:00", "03:00", "06:00", "09:00", "12:00", "15:00", "18:00", "21:00"]
        );
        let temps: Vec<_> = samples.iter().map(|s| s.temp_c).collect();
        assert_eq!(temps, [20, 23, 26, 29, 32, 35, 38, 41]);
    }

    #[test]
    fn hourly_uses_night_flag() {
        let samples = hourly_samples(&day(date(12), 24));
        assert_eq!(samples[0].category, WeatherCategory::Night);
        assert_eq!(samples[3].category, WeatherCategory::Cloudy);
    }

    #[test]
    fn short_day_yields_fewer_samples() {
        assert_eq!(hourly_samples(&day(date(12), 10)).len(), 4);
    }

    #[test]
    fn project_builds_all_three_views() {
        let days = (12..19).map(|d| day(date(d), 24)).collect();
        let report = project(&forecast(days), Locale::en_US).unwrap();

        assert_eq!(report.current.place, "Jakarta");
        assert_eq!(report.current.temp_c, 30);
        assert_eq!(report.current.min_temp_c, 24);
        assert_eq!(report.current.max_temp_c, 32);
        assert_eq!(report.current.wind_kph, 11);
        assert_eq!(report.current.feels_like_c, 33);
        assert_eq!(report.current.category, WeatherCategory::Cloudy);
        assert_eq!(report.hourly.len(), 8);
        assert_eq!(report.daily.len(), 7);
        assert_eq!(report.daily[0].day, "Sunday");
        assert_eq!(report.daily[0].date, "12 Oct");
        assert_eq!(report.daily[0].category, WeatherCategory::Rainy);
        assert_eq!(
            report.daily[0].icon_url,
            "https://cdn.weatherapi.com/weather/64x64/day/113.png"
        );
    }

    #[test]
    fn indonesian_names() {
        assert_eq!(weekday_name(date(12), Locale::id_ID), "Minggu");
        assert_eq!(short_date(date(7), Locale::id_ID), "07 Okt");
    }

    #[test]
    fn missing_today_is_malformed() {
        let err = project(&forecast(Vec::new()), Locale::en_US).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn icon_url_leaves_absolute_and_empty_alone() {
        assert_eq!(icon_url(""), "");
        assert_eq!(icon_url("https://x/y.png"), "https://x/y.png");
        assert_eq!(icon_url("//x/y.png"), "https://x/y.png");
    }
}
