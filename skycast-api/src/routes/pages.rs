//! Server-rendered page shells
//!
//! The dashboard and the two auth forms are deliberately minimal inline
//! documents — small enough that a template engine would be more code
//! than the pages themselves. Notices are rendered inline on the form
//! being redisplayed.

use crate::app::{AppState, CurrentUser};
use axum::{
    extract::State,
    response::Html,
    Extension,
};

/// GET / — the dashboard shell
///
/// Greets the signed-in user and exposes the provider API key in a meta
/// tag for the map tile layer. The city search form targets the bundle
/// endpoint directly.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Html<String> {
    dashboard_page(&user.name, &state.config.weather.api_key)
}

fn dashboard_page(name: &str, map_api_key: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="map-api-key" content="{map_key}">
<title>Skycast</title>
</head>
<body>
<header>
<h1>Skycast</h1>
<nav>Signed in as {name} &middot; <a href="/logout">Log out</a></nav>
</header>
<main>
<form action="/api/weather_bundle" method="get">
<label for="city">City</label>
<input id="city" name="city" type="text" placeholder="e.g. London" required>
<button type="submit">Search</button>
</form>
</main>
</body>
</html>
"#,
        map_key = escape_html(map_api_key),
        name = escape_html(name),
    ))
}

/// Renders the login form, optionally with a notice and a `next` target
pub(crate) fn login_page(notice: Option<&str>, next: Option<&str>) -> Html<String> {
    let action = match next {
        Some(next) => {
            let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
            format!("/login?next={}", encoded)
        }
        None => "/login".to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Log in - Skycast</title>
</head>
<body>
<main>
<h1>Log in</h1>
{notice}<form action="{action}" method="post">
<label for="email">Email</label>
<input id="email" name="email" type="email" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
<label><input name="remember" type="checkbox"> Remember me</label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/register">Register</a></p>
</main>
</body>
</html>
"#,
        notice = notice_block(notice),
        action = action,
    ))
}

/// Renders the registration form, optionally with a notice
pub(crate) fn register_page(notice: Option<&str>) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Register - Skycast</title>
</head>
<body>
<main>
<h1>Register</h1>
{notice}<form action="/register" method="post">
<label for="name">Name</label>
<input id="name" name="name" type="text" required>
<label for="email">Email</label>
<input id="email" name="email" type="email" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
<label for="confirm_password">Confirm password</label>
<input id="confirm_password" name="confirm_password" type="password" required>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>
</main>
</body>
</html>
"#,
        notice = notice_block(notice),
    ))
}

fn notice_block(notice: Option<&str>) -> String {
    match notice {
        Some(text) => format!("<p class=\"notice\">{}</p>\n", escape_html(text)),
        None => String::new(),
    }
}

/// Escapes text for safe interpolation into HTML
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
