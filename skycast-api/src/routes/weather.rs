//! The weather bundle endpoint
//!
//! # Endpoint
//!
//! ```text
//! GET /api/weather_bundle?city=<string>
//! ```
//!
//! # Responses
//!
//! - `200` `{"location": {...}, "current": {...}, "forecast": {...},
//!   "air_pollution": {...}}`
//! - `400` `{"error": "City parameter is required"}`
//! - `404` `{"error": "City '<name>' not found."}`
//! - `502` when the provider fails to deliver a complete bundle

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use skycast_shared::weather::{fetch_weather_bundle, WeatherBundle};

/// Query parameters for the bundle endpoint
#[derive(Debug, Deserialize)]
pub struct WeatherBundleQuery {
    /// Free-text city name
    pub city: Option<String>,
}

/// GET /api/weather_bundle
pub async fn weather_bundle(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<WeatherBundleQuery>,
) -> ApiResult<Json<WeatherBundle>> {
    tracing::debug!(user = %user.email, city = ?query.city, "Weather bundle requested");

    let bundle = fetch_weather_bundle(state.weather.as_ref(), query.city.as_deref()).await?;

    Ok(Json(bundle))
}
