//! Weather provider façade
//!
//! Four thin HTTP-calling operations behind the [`WeatherApi`] trait
//! (geocoding plus three data endpoints) and the aggregator that combines
//! them into one bundle per dashboard query.
//!
//! Provider failures are not errors at this layer: every operation
//! returns `None` for "no data" — timeouts, non-2xx statuses, and
//! malformed payloads alike — and the detail is logged server-side. The
//! aggregator decides what an incomplete set of answers means for the
//! caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

pub mod bundle;
pub mod client;
pub mod mock;

pub use bundle::{fetch_weather_bundle, BundleError, WeatherBundle};
pub use client::OpenWeatherClient;

/// A geocoded location
///
/// Ephemeral value produced by geocoding a city name; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub country: String,
}

/// The four provider operations
///
/// Each issues a single outbound GET with a bounded timeout and returns
/// `None` on any failure. The three data operations return the provider's
/// decoded JSON body verbatim on success.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Resolves a free-text city name to coordinates
    ///
    /// Multiple candidates resolve to the first result.
    async fn geocode(&self, city: &str) -> Option<Location>;

    /// Fetches current conditions for a coordinate pair
    async fn current_weather(&self, lat: f64, lon: f64) -> Option<Value>;

    /// Fetches the 5-day/3-hour forecast for a coordinate pair
    async fn forecast(&self, lat: f64, lon: f64) -> Option<Value>;

    /// Fetches the air quality index for a coordinate pair
    async fn air_pollution(&self, lat: f64, lon: f64) -> Option<Value>;
}
