//! Configuration management for the API server
//!
//! Loads configuration from environment variables into a type-safe
//! struct. Both secrets are required: the process refuses to start
//! without them rather than limping along and failing every provider
//! call with an auth error.
//!
//! # Environment Variables
//!
//! - `OPENWEATHER_API_KEY`: weather provider API key (required)
//! - `SESSION_SECRET`: session token signing secret, min 32 chars (required)
//! - `HOST`: host to bind to (default: 0.0.0.0)
//! - `PORT`: port to bind to (default: 8080)
//! - `DATABASE_URL`: SQLite connection string (default: sqlite://skycast.db)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
//! - `ENVIRONMENT`: "production" enables HSTS
//! - `RUST_LOG`: log filter (default: info)

use std::env;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Whether the server runs behind HTTPS in production
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret keying the session-token digests
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Weather provider configuration
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, the session
    /// secret is too short, or a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let production = env::var("ENVIRONMENT")
            .map(|v| v == "production")
            .unwrap_or(false);

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://skycast.db".to_string());
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()?;

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;

        if session_secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 characters long");
        }

        let api_key = env::var("OPENWEATHER_API_KEY").map_err(|_| {
            anyhow::anyhow!("OPENWEATHER_API_KEY environment variable is required")
        })?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                secret: session_secret,
            },
            weather: WeatherConfig { api_key },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
