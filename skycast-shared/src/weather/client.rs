//! OpenWeatherMap client
//!
//! One thin function per provider endpoint, sharing a contract: a single
//! HTTPS GET with a 10-second timeout, any transport fault or non-2xx
//! status or malformed body is logged at `warn` and surfaced as `None`.
//! No retries.

use super::{Location, WeatherApi};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Production OpenWeatherMap base URL
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the OpenWeatherMap geocoding, weather, forecast, and air
/// pollution endpoints
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    /// Creates a client against the production OpenWeatherMap host
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL)
    }

    /// Creates a client against an alternate host (used by tests)
    pub fn with_base_url(api_key: String, base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build weather HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Issues one GET and decodes the JSON body
    ///
    /// All failure modes collapse to `None`; `label` identifies the
    /// endpoint in the log line.
    async fn fetch_json(&self, label: &str, request: reqwest::RequestBuilder) -> Option<Value> {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("{} request failed: {}", label, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned status {}", label, status);
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("{} returned malformed JSON: {}", label, e);
                None
            }
        }
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn geocode(&self, city: &str) -> Option<Location> {
        let request = self
            .http
            .get(format!("{}/geo/1.0/direct", self.base_url))
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())]);

        let body = self.fetch_json("Geocoding API", request).await?;

        match parse_geocode_response(&body) {
            Some(location) => Some(location),
            None => {
                tracing::warn!("Geocoding API returned no usable location for '{}'", city);
                None
            }
        }
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Option<Value> {
        let request = self
            .http
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ]);

        self.fetch_json("Current Weather API", request).await
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Option<Value> {
        let request = self
            .http
            .get(format!("{}/data/2.5/forecast", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ]);

        self.fetch_json("Forecast API", request).await
    }

    async fn air_pollution(&self, lat: f64, lon: f64) -> Option<Value> {
        let request = self
            .http
            .get(format!("{}/data/2.5/air_pollution", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
            ]);

        self.fetch_json("Air Pollution API", request).await
    }
}

/// Extracts the first location from a geocoding response
///
/// The provider returns an array of candidates; only the first is used.
/// An empty array, missing keys, or non-numeric coordinates yield `None`.
fn parse_geocode_response(body: &Value) -> Option<Location> {
    let entry = body.as_array()?.first()?;

    Some(Location {
        lat: entry.get("lat")?.as_f64()?,
        lon: entry.get("lon")?.as_f64()?,
        name: entry.get("name")?.as_str()?.to_string(),
        country: entry
            .get("country")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    })
}
