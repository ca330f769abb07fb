// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Open-Meteo forecast client.

use crate::error::AppError;
use crate::models::weather::{
    CurrentWeather, DailyForecast, HourlyForecast, RawCurrentResponse, RawDailyResponse,
    RawHourlyResponse,
};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;

/// `current=` fields requested from Open-Meteo.
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,\
precipitation,rain,showers,snowfall,weather_code,cloud_cover,surface_pressure,\
wind_speed_10m,wind_direction_10m";

/// `hourly=` fields requested from Open-Meteo.
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,precipitation,weather_code";

/// `daily=` fields requested from Open-Meteo.
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,\
daylight_duration,uv_index_max,precipitation_sum";

pub const DEFAULT_FORECAST_HOURS: i64 = 8;
pub const MAX_FORECAST_HOURS: i64 = 72;
pub const DEFAULT_FORECAST_DAYS: i64 = 5;
pub const MAX_FORECAST_DAYS: i64 = 7;

/// Location a forecast is requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name, or `auto`
    pub timezone: String,
}

/// Open-Meteo client.
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherService {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Current conditions at `location` in imperial units.
    pub async fn current(&self, location: &Location) -> Result<CurrentWeather, AppError> {
        let raw: RawCurrentResponse = self
            .fetch(location, &[("current", CURRENT_FIELDS.to_string())])
            .await?;

        Ok(CurrentWeather::from(raw))
    }

    /// Forecast for the next `num_hours` whole hours (clamped to `0..=72`).
    pub async fn hourly(&self, location: &Location, num_hours: i64) -> Result<HourlyForecast, AppError> {
        let (start_hour, end_hour) = hourly_window(Utc::now(), num_hours.clamp(0, MAX_FORECAST_HOURS));

        let raw: RawHourlyResponse = self
            .fetch(
                location,
                &[
                    ("hourly", HOURLY_FIELDS.to_string()),
                    ("start_hour", start_hour),
                    ("end_hour", end_hour),
                ],
            )
            .await?;

        Ok(HourlyForecast::from(raw))
    }

    /// Forecast from today through `num_days` days ahead (clamped to `0..=7`).
    pub async fn daily(&self, location: &Location, num_days: i64) -> Result<DailyForecast, AppError> {
        let (start_date, end_date) = daily_window(Utc::now(), num_days.clamp(0, MAX_FORECAST_DAYS));

        let raw: RawDailyResponse = self
            .fetch(
                location,
                &[
                    ("daily", DAILY_FIELDS.to_string()),
                    ("start_date", start_date),
                    ("end_date", end_date),
                ],
            )
            .await?;

        Ok(DailyForecast::from(raw))
    }

    /// `GET /forecast` for `location` plus `extra` query pairs.
    async fn fetch<T: DeserializeOwned>(
        &self,
        location: &Location,
        extra: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}/forecast", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", format!("{:.4}", location.latitude)),
                ("longitude", format!("{:.4}", location.longitude)),
                ("temperature_unit", "fahrenheit".to_string()),
                ("wind_speed_unit", "mph".to_string()),
                ("precipitation_unit", "inch".to_string()),
                ("timeformat", "unixtime".to_string()),
                ("timezone", location.timezone.clone()),
            ])
            .query(extra)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch weather data: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Open-Meteo request failed");
            return Err(AppError::Internal(anyhow::anyhow!(
                "Open-Meteo returned status {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to parse weather data: {}", e))
        })
    }
}

/// `start_hour`/`end_hour` in UTC: from the next whole hour, `hours` long.
fn hourly_window(now: DateTime<Utc>, hours: i64) -> (String, String) {
    let this_hour = now - Duration::seconds(now.timestamp().rem_euclid(3600));
    let start = this_hour + Duration::hours(1);
    let end = start + Duration::hours(hours);
    (
        start.format("%Y-%m-%dT%H:%M").to_string(),
        end.format("%Y-%m-%dT%H:%M").to_string(),
    )
}

/// `start_date`/`end_date` in UTC: today through `days` days ahead.
fn daily_window(now: DateTime<Utc>, days: i64) -> (String, String) {
    let end = now + Duration::days(days);
    (
        now.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    )
}
