//! Common test utilities for integration tests
//!
//! Shared infrastructure for driving the full router end to end:
//! - In-memory database with migrations applied
//! - Scriptable mock weather provider
//! - Form-submission and session-cookie helpers

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use skycast_api::app::{build_router, AppState};
use skycast_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig, WeatherConfig};
use skycast_shared::db::migrations::run_migrations;
use skycast_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use skycast_shared::weather::mock::MockWeatherApi;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub weather: Arc<MockWeatherApi>,
}

impl TestContext {
    /// Creates a context whose provider answers every endpoint
    pub async fn new() -> Self {
        Self::with_weather(MockWeatherApi::succeeding()).await
    }

    /// Creates a context with a specific provider script
    pub async fn with_weather(weather: MockWeatherApi) -> Self {
        let db = create_pool(PoolConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        })
        .await
        .expect("test pool should open");

        run_migrations(&db).await.expect("migrations should apply");

        let weather = Arc::new(weather);
        let state = AppState::new(db.clone(), test_config(), weather.clone());
        let app = build_router(state);

        Self { db, app, weather }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().call(request).await.expect("router should respond")
    }

    /// GET a path, optionally with a session cookie
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::empty()).expect("request should build"))
            .await
    }

    /// POST a form body to a path
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in fields {
            serializer.append_pair(key, value);
        }
        let body = serializer.finish();

        self.send(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .expect("request should build"),
        )
        .await
    }

    /// Submits the registration form
    pub async fn register(&self, name: &str, email: &str, password: &str, confirm: &str) -> Response {
        self.post_form(
            "/register",
            &[
                ("name", name),
                ("email", email),
                ("password", password),
                ("confirm_password", confirm),
            ],
        )
        .await
    }

    /// Submits the login form
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Registers and logs in a user, returning the session cookie
    pub async fn login_session(&self, email: &str, password: &str) -> String {
        let response = self.register("Jo Example", email, password, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = self.login(email, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");

        session_cookie(&response).expect("login should set a session cookie")
    }
}

/// Extracts the `name=value` pair from a Set-Cookie header
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(';').next())
        .map(|s| s.to_string())
}

/// Returns the Location header of a redirect
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response should carry a Location header")
        .to_string()
}

/// Reads a response body to a string
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8_lossy(&bytes).to_string()
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        session: SessionConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
        },
        weather: WeatherConfig {
            api_key: "test-key".to_string(),
        },
    }
}
