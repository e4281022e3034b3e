//! Integration tests for the Skycast server
//!
//! These drive the full router end to end with an in-memory database and
//! a scripted weather provider:
//! - Registration and login validation
//! - Session guard behavior on protected routes
//! - The weather bundle endpoint's 200/400/404/502 contract

mod common;

use axum::http::StatusCode;
use common::{body_json, body_string, location, session_cookie, TestContext};
use skycast_shared::models::user::User;
use skycast_shared::weather::mock::MockWeatherApi;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_protected_routes_redirect_without_session() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2F");

    let response = ctx.get("/api/weather_bundle?city=London", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/login?next=%2Fapi%2Fweather_bundle%3Fcity%3DLondon"
    );
}

#[tokio::test]
async fn test_register_login_roundtrip() {
    let ctx = TestContext::new().await;

    let response = ctx
        .register("Jo Example", "jo@example.com", "secret123", "secret123")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?notice=registered");

    let response = ctx.login("jo@example.com", "secret123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = session_cookie(&response).expect("login should set a session cookie");

    // The cookie is HttpOnly and names the session token
    let raw = ctx.login("jo@example.com", "secret123").await;
    let header = raw
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie should be present");
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Lax"));

    // The session grants access to the dashboard
    let response = ctx.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Jo Example"));
}

#[tokio::test]
async fn test_register_password_mismatch_creates_no_user() {
    let ctx = TestContext::new().await;

    let response = ctx
        .register("Jo Example", "jo@example.com", "secret123", "different")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Passwords do not match."));

    assert_eq!(User::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_short_password_creates_no_user() {
    let ctx = TestContext::new().await;

    let response = ctx
        .register("Jo Example", "jo@example.com", "tiny", "tiny")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response)
        .await
        .contains("Password must be at least 6 characters."));

    assert_eq!(User::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_missing_field_creates_no_user() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/register",
            &[("name", "Jo"), ("email", "jo@example.com"), ("password", "secret123")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Please fill out all fields."));

    assert_eq!(User::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_duplicate_email_creates_no_second_user() {
    let ctx = TestContext::new().await;

    ctx.register("Jo Example", "jo@example.com", "secret123", "secret123")
        .await;
    let response = ctx
        .register("Other Jo", "jo@example.com", "other-password", "other-password")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response)
        .await
        .contains("Email address already registered."));
    assert_eq!(User::count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_failures_are_non_enumerable() {
    let ctx = TestContext::new().await;
    ctx.register("Jo Example", "jo@example.com", "secret123", "secret123")
        .await;

    // Wrong password for a real account vs. an account that doesn't
    // exist: byte-identical responses.
    let wrong_password = ctx.login("jo@example.com", "not-the-password").await;
    assert_eq!(wrong_password.status(), StatusCode::OK);
    let wrong_password = body_string(wrong_password).await;

    let unknown_email = ctx.login("nobody@example.com", "whatever").await;
    assert_eq!(unknown_email.status(), StatusCode::OK);
    let unknown_email = body_string(unknown_email).await;

    assert_eq!(wrong_password, unknown_email);
    assert!(wrong_password.contains("Login Unsuccessful. Please check email and password."));
}

#[tokio::test]
async fn test_login_redirects_to_safe_next_target() {
    let ctx = TestContext::new().await;
    ctx.register("Jo Example", "jo@example.com", "secret123", "secret123")
        .await;

    let response = ctx
        .post_form(
            "/login?next=%2Fapi%2Fweather_bundle%3Fcity%3DOslo",
            &[("email", "jo@example.com"), ("password", "secret123")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/weather_bundle?city=Oslo");
}

#[tokio::test]
async fn test_login_rejects_unsafe_next_target() {
    let ctx = TestContext::new().await;
    ctx.register("Jo Example", "jo@example.com", "secret123", "secret123")
        .await;

    for next in ["%2F%2Fevil.example.com", "https%3A%2F%2Fevil.example.com", "relative"] {
        let response = ctx
            .post_form(
                &format!("/login?next={}", next),
                &[("email", "jo@example.com"), ("password", "secret123")],
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/", "unsafe target {} should fall back", next);
    }
}

#[tokio::test]
async fn test_login_page_redirects_when_already_authenticated() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login_session("jo@example.com", "secret123").await;

    let response = ctx.get("/login", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login_session("jo@example.com", "secret123").await;

    let response = ctx.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?notice=logged_out");

    // The old cookie no longer opens the dashboard
    let response = ctx.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2F");
}

#[tokio::test]
async fn test_weather_bundle_success() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login_session("jo@example.com", "secret123").await;

    let response = ctx.get("/api/weather_bundle?city=London", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["location"]["name"], "London");
    assert_eq!(body["location"]["country"], "GB");
    assert!(body["current"]["main"].is_object());
    assert!(body["forecast"]["list"].is_array());
    assert!(body["air_pollution"]["list"].is_array());
}

#[tokio::test]
async fn test_weather_bundle_missing_city() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login_session("jo@example.com", "secret123").await;

    for path in ["/api/weather_bundle", "/api/weather_bundle?city=+++"] {
        let response = ctx.get(path, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({"error": "City parameter is required"}));
    }
}

#[tokio::test]
async fn test_weather_bundle_unknown_city() {
    let ctx = TestContext::with_weather(MockWeatherApi {
        location: None,
        ..MockWeatherApi::succeeding()
    })
    .await;
    let cookie = ctx.login_session("jo@example.com", "secret123").await;

    let response = ctx
        .get("/api/weather_bundle?city=zzzzznotacity123", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(
        body,
        serde_json::json!({"error": "City 'zzzzznotacity123' not found."})
    );
}

#[tokio::test]
async fn test_weather_bundle_upstream_failure_never_returns_partial_data() {
    let ctx = TestContext::with_weather(MockWeatherApi {
        forecast: None,
        ..MockWeatherApi::succeeding()
    })
    .await;
    let cookie = ctx.login_session("jo@example.com", "secret123").await;

    let response = ctx.get("/api/weather_bundle?city=London", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // Only the error message, no partial bundle keys
    let body = body_json(response).await;
    let keys: Vec<&String> = body.as_object().expect("body should be an object").keys().collect();
    assert_eq!(keys, ["error"]);

    // All three data fetches were still attempted
    assert_eq!(ctx.weather.current_calls(), 1);
    assert_eq!(ctx.weather.forecast_calls(), 1);
    assert_eq!(ctx.weather.air_pollution_calls(), 1);
}

#[tokio::test]
async fn test_weather_bundle_trims_city_parameter() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login_session("jo@example.com", "secret123").await;

    let response = ctx
        .get("/api/weather_bundle?city=++London++", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.weather.last_geocoded_city().as_deref(), Some("London"));
}
