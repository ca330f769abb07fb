//! Open-Meteo forecasts: raw payloads and the display-ready shapes.
//!
//! Values keep the unit strings Open-Meteo reports and weather codes stay
//! numeric; the device owns the wording.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// `GET /forecast?current=...` response (fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrentResponse {
    #[serde(default)]
    pub current_units: CurrentUnits,
    pub current: CurrentValues,
}

/// Unit strings Open-Meteo reports for each `current` field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentUnits {
    pub temperature_2m: String,
    pub relative_humidity_2m: String,
    pub apparent_temperature: String,
    pub precipitation: String,
    pub rain: String,
    pub showers: String,
    pub snowfall: String,
    pub cloud_cover: String,
    pub surface_pressure: String,
    pub wind_speed_10m: String,
    pub wind_direction_10m: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentValues {
    pub time: i64,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub is_day: u8,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
    pub snowfall: f64,
    pub weather_code: u16,
    pub cloud_cover: f64,
    pub surface_pressure: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
}

/// Current conditions as display strings for the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CurrentWeather {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub time: i64,
    pub weather_code: u16,
    pub temperature: String,
    pub relative_humidity: String,
    pub apparent_temperature: String,
    pub is_day: bool,
    pub current_precipitation: String,
    pub current_rain: String,
    pub current_showers: String,
    pub current_snowfall: String,
    pub current_cloud_cover: String,
    pub current_surface_pressure: String,
    pub current_wind_speed: String,
    pub current_wind_direction: String,
}

/// Join a value with the unit string Open-Meteo reported for it.
fn with_unit(value: f64, unit: &str) -> String {
    format!("{}{}", value, unit)
}

impl From<RawCurrentResponse> for CurrentWeather {
    fn from(raw: RawCurrentResponse) -> Self {
        let units = &raw.current_units;
        let now = &raw.current;
        Self {
            time: now.time,
            weather_code: now.weather_code,
            temperature: with_unit(now.temperature_2m, &units.temperature_2m),
            relative_humidity: with_unit(now.relative_humidity_2m, &units.relative_humidity_2m),
            apparent_temperature: with_unit(now.apparent_temperature, &units.apparent_temperature),
            is_day: now.is_day == 1,
            current_precipitation: with_unit(now.precipitation, &units.precipitation),
            current_rain: with_unit(now.rain, &units.rain),
            current_showers: with_unit(now.showers, &units.showers),
            current_snowfall: with_unit(now.snowfall, &units.snowfall),
            current_cloud_cover: with_unit(now.cloud_cover, &units.cloud_cover),
            current_surface_pressure: with_unit(now.surface_pressure, &units.surface_pressure),
            current_wind_speed: with_unit(now.wind_speed_10m, &units.wind_speed_10m),
            current_wind_direction: with_unit(now.wind_direction_10m, &units.wind_direction_10m),
        }
    }
}

/// `GET /forecast?hourly=...` response (fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct RawHourlyResponse {
    #[serde(default)]
    pub utc_offset_seconds: i64,
    #[serde(default)]
    pub hourly_units: HourlyUnits,
    pub hourly: HourlyValues,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HourlyUnits {
    pub temperature_2m: String,
    pub precipitation_probability: String,
    pub precipitation: String,
}

/// Parallel series indexed by `time`; Open-Meteo may leave gaps as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HourlyValues {
    pub time: Vec<i64>,
    pub temperature_2m: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u16>>,
}

/// One forecast hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HourForecast {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub unix_time: i64,
    /// Local clock time, e.g. `3pm` or `3:30pm`
    pub time_str: String,
    pub temperature: String,
    pub precipitation_probability: String,
    pub precipitation: String,
    pub weather_code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HourlyForecast {
    pub hours: Vec<HourForecast>,
}

impl From<RawHourlyResponse> for HourlyForecast {
    fn from(raw: RawHourlyResponse) -> Self {
        let units = &raw.hourly_units;
        let series = &raw.hourly;

        let hours = series
            .time
            .iter()
            .enumerate()
            .map(|(i, &unix_time)| HourForecast {
                unix_time,
                time_str: clock_time(unix_time + raw.utc_offset_seconds),
                temperature: value_at(&series.temperature_2m, i, &units.temperature_2m),
                precipitation_probability: value_at(
                    &series.precipitation_probability,
                    i,
                    &units.precipitation_probability,
                ),
                precipitation: value_at(&series.precipitation, i, &units.precipitation),
                weather_code: series.weather_code.get(i).copied().flatten().unwrap_or_default(),
            })
            .collect();

        Self { hours }
    }
}

/// `GET /forecast?daily=...` response (fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct RawDailyResponse {
    #[serde(default)]
    pub utc_offset_seconds: i64,
    #[serde(default)]
    pub daily_units: DailyUnits,
    pub daily: DailyValues,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyUnits {
    pub temperature_2m_max: String,
    pub temperature_2m_min: String,
    pub precipitation_sum: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyValues {
    pub time: Vec<i64>,
    pub weather_code: Vec<Option<u16>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub sunrise: Vec<Option<i64>>,
    pub sunset: Vec<Option<i64>>,
    /// Seconds
    pub daylight_duration: Vec<Option<f64>>,
    pub uv_index_max: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayForecast {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub unix_time: i64,
    /// Local weekday, e.g. `Tue`
    pub time_str: String,
    pub weather_code: u16,
    pub temperature_max: String,
    pub temperature_min: String,
    pub sunrise: String,
    pub sunset: String,
    /// e.g. `10h13m`
    pub daylight_duration: String,
    pub uv_index_max: String,
    pub precipitation_sum: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyForecast {
    pub days: Vec<DayForecast>,
}

impl From<RawDailyResponse> for DailyForecast {
    fn from(raw: RawDailyResponse) -> Self {
        let units = &raw.daily_units;
        let series = &raw.daily;
        let offset = raw.utc_offset_seconds;

        let local_clock = |values: &[Option<i64>], i: usize| {
            values
                .get(i)
                .copied()
                .flatten()
                .map(|t| clock_time(t + offset))
                .unwrap_or_default()
        };

        let days = series
            .time
            .iter()
            .enumerate()
            .map(|(i, &unix_time)| DayForecast {
                unix_time,
                time_str: weekday(unix_time + offset),
                weather_code: series.weather_code.get(i).copied().flatten().unwrap_or_default(),
                temperature_max: value_at(&series.temperature_2m_max, i, &units.temperature_2m_max),
                temperature_min: value_at(&series.temperature_2m_min, i, &units.temperature_2m_min),
                sunrise: local_clock(&series.sunrise, i),
                sunset: local_clock(&series.sunset, i),
                daylight_duration: series
                    .daylight_duration
                    .get(i)
                    .copied()
                    .flatten()
                    .map(short_duration)
                    .unwrap_or_default(),
                uv_index_max: series
                    .uv_index_max
                    .get(i)
                    .copied()
                    .flatten()
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_default(),
                precipitation_sum: value_at(&series.precipitation_sum, i, &units.precipitation_sum),
            })
            .collect();

        Self { days }
    }
}

/// `values[i]` with its unit, or `""` for a gap.
fn value_at(values: &[Option<f64>], i: usize, unit: &str) -> String {
    values
        .get(i)
        .copied()
        .flatten()
        .map(|v| with_unit(v, unit))
        .unwrap_or_default()
}

/// 12-hour clock time with whole hours shortened: `3pm`, `3:30pm`.
///
/// `local_secs` is already shifted by the location's UTC offset.
fn clock_time(local_secs: i64) -> String {
    let Some(time) = DateTime::<Utc>::from_timestamp(local_secs, 0) else {
        return String::new();
    };
    let clock = time.format("%-I:%M").to_string();
    let clock = clock.strip_suffix(":00").unwrap_or(&clock);
    format!("{}{}", clock, time.format("%P"))
}

/// Short weekday name: `Mon`.
fn weekday(local_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(local_secs, 0)
        .map(|time| time.format("%a").to_string())
        .unwrap_or_default()
}

/// Compact duration: `10h13m`, `10h`, `45m12s`, `30s`.
fn short_duration(seconds: f64) -> String {
    let total = seconds as i64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);

    let full = if h > 0 {
        format!("{}h{}m{}s", h, m, s)
    } else if m > 0 {
        format!("{}m{}s", m, s)
    } else {
        return format!("{}s", s);
    };

    let full = full.strip_suffix("m0s").map(|t| format!("{}m", t)).unwrap_or(full);
    full.strip_suffix("h0m").map(|t| format!("{}h", t)).unwrap_or(full)
}
