//! Scriptable mock provider for tests and demos
//!
//! Each endpoint returns a pre-configured response, and call counters
//! record how often it was hit — which is what lets tests pin down the
//! "all three data calls are always attempted" behavior of the
//! aggregator.
//!
//! All fields are public so tests can script a scenario with
//! struct-update syntax:
//!
//! ```
//! use skycast_shared::weather::mock::MockWeatherApi;
//!
//! let provider = MockWeatherApi {
//!     forecast: None, // simulate a forecast outage
//!     ..MockWeatherApi::succeeding()
//! };
//! # let _ = provider;
//! ```

use super::{Location, WeatherApi};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Per-endpoint hit counters
#[derive(Debug, Default)]
pub struct CallCounters {
    pub geocode: AtomicUsize,
    pub current: AtomicUsize,
    pub forecast: AtomicUsize,
    pub air_pollution: AtomicUsize,
}

/// A [`WeatherApi`] whose answers are fixed at construction
///
/// `None` in any field simulates a provider failure for that endpoint.
#[derive(Debug, Default)]
pub struct MockWeatherApi {
    /// Geocoding answer; `None` means the city resolves to nothing
    pub location: Option<Location>,

    /// Current-conditions payload
    pub current: Option<Value>,

    /// Forecast payload
    pub forecast: Option<Value>,

    /// Air-quality payload
    pub air_pollution: Option<Value>,

    /// How often each endpoint was invoked
    pub calls: CallCounters,

    /// The city string most recently passed to `geocode`
    pub last_city: Mutex<Option<String>>,
}

impl MockWeatherApi {
    /// A mock where every endpoint answers with a plausible payload
    pub fn succeeding() -> Self {
        Self {
            location: Some(Location {
                lat: 51.5073,
                lon: -0.1276,
                name: "London".to_string(),
                country: "GB".to_string(),
            }),
            current: Some(json!({
                "main": {"temp": 18.4, "feels_like": 18.0, "humidity": 72},
                "weather": [{"description": "light rain"}],
                "wind": {"speed": 4.1}
            })),
            forecast: Some(json!({
                "list": [
                    {"dt": 1_700_000_000_i64, "main": {"temp": 17.2}},
                    {"dt": 1_700_010_800_i64, "main": {"temp": 16.8}}
                ],
                "city": {"name": "London", "country": "GB"}
            })),
            air_pollution: Some(json!({
                "list": [{"main": {"aqi": 2}, "components": {"pm2_5": 8.3}}]
            })),
            ..Default::default()
        }
    }

    /// How many times `geocode` was invoked
    pub fn geocode_calls(&self) -> usize {
        self.calls.geocode.load(Ordering::SeqCst)
    }

    /// How many times `current_weather` was invoked
    pub fn current_calls(&self) -> usize {
        self.calls.current.load(Ordering::SeqCst)
    }

    /// How many times `forecast` was invoked
    pub fn forecast_calls(&self) -> usize {
        self.calls.forecast.load(Ordering::SeqCst)
    }

    /// How many times `air_pollution` was invoked
    pub fn air_pollution_calls(&self) -> usize {
        self.calls.air_pollution.load(Ordering::SeqCst)
    }

    /// The city string most recently passed to `geocode`
    pub fn last_geocoded_city(&self) -> Option<String> {
        self.last_city.lock().expect("mock mutex poisoned").clone()
    }
}

#[async_trait]
impl WeatherApi for MockWeatherApi {
    async fn geocode(&self, city: &str) -> Option<Location> {
        self.calls.geocode.fetch_add(1, Ordering::SeqCst);
        *self.last_city.lock().expect("mock mutex poisoned") = Some(city.to_string());
        self.location.clone()
    }

    async fn current_weather(&self, _lat: f64, _lon: f64) -> Option<Value> {
        self.calls.current.fetch_add(1, Ordering::SeqCst);
        self.current.clone()
    }

    async fn forecast(&self, _lat: f64, _lon: f64) -> Option<Value> {
        self.calls.forecast.fetch_add(1, Ordering::SeqCst);
        self.forecast.clone()
    }

    async fn air_pollution(&self, _lat: f64, _lon: f64) -> Option<Value> {
        self.calls.air_pollution.fetch_add(1, Ordering::SeqCst);
        self.air_pollution.clone()
    }
}
