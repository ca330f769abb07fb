// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather routes (public).

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{CurrentWeather, DailyForecast, HourlyForecast};
use crate::services::weather::{Location, DEFAULT_FORECAST_DAYS, DEFAULT_FORECAST_HOURS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/weather/current", get(current_weather))
        .route("/weather/hourly", get(hourly_weather))
        .route("/weather/daily", get(daily_weather))
}

/// Location query shared by weather endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default, rename = "numHours")]
    num_hours: Option<String>,
    #[serde(default, rename = "numDays")]
    num_days: Option<String>,
}

/// Validate and parse a location query.
fn parse_location(params: &LocationParams) -> Result<Location> {
    let latitude = parse_coordinate(params.latitude.as_deref(), "latitude", 90.0)?;
    let longitude = parse_coordinate(params.longitude.as_deref(), "longitude", 180.0)?;

    let timezone = params
        .timezone
        .as_deref()
        .map(str::trim)
        .filter(|tz| !tz.is_empty())
        .ok_or_else(|| AppError::BadRequest("timezone is required".to_string()))?;

    Ok(Location {
        latitude,
        longitude,
        timezone: timezone.to_string(),
    })
}

fn parse_coordinate(raw: Option<&str>, name: &str, limit: f64) -> Result<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} is not a valid number", name)))?;

    if !(-limit..=limit).contains(&value) {
        return Err(AppError::BadRequest(format!(
            "{} must be between -{} and {}",
            name, limit, limit
        )));
    }

    Ok(value)
}

/// Forecast length from the query. Missing means `default`, garbage means 0;
/// the service clamps whatever comes out.
fn parse_count(raw: Option<&str>, default: i64) -> i64 {
    match raw.map(str::trim) {
        None | Some("") => default,
        Some(raw) => raw.parse().unwrap_or(0),
    }
}

/// Current conditions at the requested location.
async fn current_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<CurrentWeather>> {
    let location = parse_location(&params)?;
    let weather = state.weather.current(&location).await?;
    Ok(Json(weather))
}

async fn hourly_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<HourlyForecast>> {
    let location = parse_location(&params)?;
    let num_hours = parse_count(params.num_hours.as_deref(), DEFAULT_FORECAST_HOURS);
    let forecast = state.weather.hourly(&location, num_hours).await?;
    Ok(Json(forecast))
}

async fn daily_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<DailyForecast>> {
    let location = parse_location(&params)?;
    let num_days = parse_count(params.num_days.as_deref(), DEFAULT_FORECAST_DAYS);
    let forecast = state.weather.daily(&location, num_days).await?;
    Ok(Json(forecast))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: &str, lon: &str, tz: &str) -> LocationParams {
        LocationParams {
            latitude: Some(lat.to_string()),
            longitude: Some(lon.to_string()),
            timezone: Some(tz.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_location_success() {
        let location = parse_location(&params("37.3861", "-122.0839", "America/Los_Angeles")).unwrap();
        assert_eq!(location.latitude, 37.3861);
        assert_eq!(location.longitude, -122.0839);
        assert_eq!(location.timezone, "America/Los_Angeles");
    }

    #[test]
    fn test_parse_location_rejects_out_of_range() {
        assert!(parse_location(&params("91", "0", "UTC")).is_err());
        assert!(parse_location(&params("0", "-180.5", "UTC")).is_err());
    }

    #[test]
    fn test_parse_location_requires_all_fields() {
        assert!(parse_location(&LocationParams::default()).is_err());
        assert!(parse_location(&params("1", "2", " ")).is_err());
        assert!(parse_location(&params("north", "2", "UTC")).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(None, 8), 8);
        assert_eq!(parse_count(Some(""), 8), 8);
        assert_eq!(parse_count(Some("12"), 8), 12);
        assert_eq!(parse_count(Some("-3"), 8), -3);
        assert_eq!(parse_count(Some("lots"), 8), 0);
    }
}
