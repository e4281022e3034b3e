//! Weather bundle aggregator
//!
//! Orchestrates one geocode plus three data fetches for a single
//! dashboard query and assembles the combined payload. A bundle is only
//! ever returned complete: if the geocode yields nothing the city is
//! reported as not found, and if any of the three data fetches comes
//! back absent or structurally invalid the whole aggregation fails with
//! an upstream error. Partial bundles are never exposed.

use super::{Location, WeatherApi};
use serde::Serialize;
use serde_json::Value;

/// The combined payload for one city query
///
/// Ephemeral; constructed per request and never cached or stored.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherBundle {
    pub location: Location,
    pub current: Value,
    pub forecast: Value,
    pub air_pollution: Value,
}

/// Why an aggregation attempt produced no bundle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BundleError {
    /// The request carried no usable city parameter
    #[error("City parameter is required")]
    MissingCity,

    /// Geocoding produced no candidate for the city
    #[error("City '{0}' not found.")]
    CityNotFound(String),

    /// One or more provider fetches returned no usable data
    #[error("Failed to fetch complete weather information from the weather provider at this time. Please try again later.")]
    UpstreamIncomplete,
}

/// Fetches and combines current conditions, forecast, and air quality
/// for a city
///
/// The three data calls are issued sequentially, and all three are always
/// attempted — an early failure does not short-circuit the later calls;
/// completeness is checked once afterwards.
pub async fn fetch_weather_bundle(
    api: &dyn WeatherApi,
    city: Option<&str>,
) -> Result<WeatherBundle, BundleError> {
    let city = match city.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => return Err(BundleError::MissingCity),
    };

    let location = match api.geocode(city).await {
        Some(location) => location,
        None => return Err(BundleError::CityNotFound(city.to_string())),
    };

    let current = api.current_weather(location.lat, location.lon).await;
    let forecast = api.forecast(location.lat, location.lon).await;
    let air_pollution = api.air_pollution(location.lat, location.lon).await;

    match (current, forecast, air_pollution) {
        (Some(current), Some(forecast), Some(air_pollution))
            if current.get("main").is_some()
                && forecast.get("list").is_some()
                && air_pollution.get("list").is_some() =>
        {
            Ok(WeatherBundle {
                location,
                current,
                forecast,
                air_pollution,
            })
        }
        (current, forecast, air_pollution) => {
            tracing::warn!(
                city,
                current = current.is_some(),
                forecast = forecast.is_some(),
                air_pollution = air_pollution.is_some(),
                "Incomplete weather data from provider"
            );
            Err(BundleError::UpstreamIncomplete)
        }
    }
}
