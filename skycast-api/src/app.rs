//! Application state and router builder
//!
//! Defines the shared application state, the route table (public vs
//! session-guarded), and the session guard middleware that turns the
//! cookie token into a [`CurrentUser`] extension.
//!
//! # Router
//!
//! ```text
//! /
//! ├── GET  /health               # Health check (public)
//! ├── GET|POST /register         # Registration form (public)
//! ├── GET|POST /login            # Login form (public)
//! ├── GET  /                     # Dashboard shell (session required)
//! ├── GET  /logout               # Session teardown (session required)
//! └── GET  /api/weather_bundle   # Combined weather JSON (session required)
//! ```
//!
//! Protected routes without an active session redirect to the login page
//! with the originally requested path preserved as a `next` parameter.

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::CookieJar;
use skycast_shared::auth::session::{hash_session_token, SESSION_COOKIE};
use skycast_shared::models::{session::Session, user::User};
use skycast_shared::weather::WeatherApi;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Weather provider client
    pub weather: Arc<dyn WeatherApi>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config, weather: Arc<dyn WeatherApi>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            weather,
        }
    }

    /// Gets the secret keying session-token digests
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// The authenticated user for the current request
///
/// Inserted into request extensions by the session guard; protected
/// handlers extract it with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Public routes: health probe plus the registration and login forms
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/register",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route(
            "/login",
            get(routes::auth::login_form).post(routes::auth::login),
        );

    // Everything else requires an active session
    let protected_routes = Router::new()
        .route("/", get(routes::pages::dashboard))
        .route("/logout", get(routes::auth::logout))
        .route("/api/weather_bundle", get(routes::weather::weather_bundle))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Resolves the session cookie to a user, if any
///
/// Returns `Ok(None)` when there is no cookie, the session is unknown or
/// expired, or the user behind it no longer exists. Database faults are
/// the only error path.
pub(crate) async fn session_user(
    state: &AppState,
    jar: &CookieJar,
) -> Result<Option<User>, ApiError> {
    let token = match jar.get(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => return Ok(None),
    };

    let token_hash = hash_session_token(state.session_secret(), &token);

    let session = match Session::find_active(&state.db, &token_hash).await? {
        Some(session) => session,
        None => return Ok(None),
    };

    Ok(User::find_by_id(&state.db, session.user_id).await?)
}

/// Builds the login redirect preserving the originally requested target
pub(crate) fn login_redirect_target(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("/login?next={}", encoded)
}

/// Session guard middleware
///
/// Resolves the session cookie and injects [`CurrentUser`] into request
/// extensions; without an active session the request is redirected to
/// the login page instead of being served.
async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match session_user(&state, &jar).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(None) => {
            let target = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string());
            Redirect::to(&login_redirect_target(&target)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_target_encodes_query() {
        assert_eq!(login_redirect_target("/"), "/login?next=%2F");
        assert_eq!(
            login_redirect_target("/api/weather_bundle?city=New+York"),
            "/login?next=%2Fapi%2Fweather_bundle%3Fcity%3DNew%2BYork"
        );
    }
}
