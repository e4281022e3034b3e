//! Registration, login, and logout
//!
//! Form-based flows: validation failures redisplay the form with a
//! specific notice, successes redirect. Login failures for an unknown
//! email and a wrong password produce the same generic notice so
//! accounts cannot be enumerated.

use crate::{
    app::{session_user, AppState},
    error::ApiResult,
    routes::pages,
};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use serde::Deserialize;
use skycast_shared::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use skycast_shared::auth::session::{
    generate_session_token, hash_session_token, SessionLifetime, SESSION_COOKIE,
};
use skycast_shared::models::session::{CreateSession, Session};
use skycast_shared::models::user::{CreateUser, User};
use validator::ValidateEmail;

const INVALID_CREDENTIALS_NOTICE: &str = "Login Unsuccessful. Please check email and password.";
const MISSING_CREDENTIALS_NOTICE: &str = "Please enter both email and password.";
const REGISTRATION_FAILED_NOTICE: &str =
    "Registration failed due to a server error. Please try again later.";

/// Registration form fields
///
/// All fields optional at the type level so an incomplete submission is
/// reported as a validation notice rather than a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Login form fields
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,

    /// Checkbox; present ("on") when the user asked to stay signed in
    pub remember: Option<String>,
}

/// Query parameters shared by the login page and login submission
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Originally requested path, round-tripped through the form action
    pub next: Option<String>,

    /// Notice code set by redirects (registration, logout)
    pub notice: Option<String>,
}

/// Why a registration submission was rejected
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum RegisterError {
    #[error("Please fill out all fields.")]
    MissingFields,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Email address already registered.")]
    EmailTaken,
}

/// A registration submission that passed field validation
#[derive(Debug)]
struct ValidRegistration {
    name: String,
    email: String,
    password: String,
}

/// Validates registration fields, in the order the notices are promised:
/// presence, email format, password match, password length. The
/// email-taken check needs the database and happens in the handler.
fn validate_registration(form: &RegisterForm) -> Result<ValidRegistration, RegisterError> {
    let (name, email, password, confirm) = match (
        form.name.as_deref().map(str::trim),
        form.email.as_deref().map(str::trim),
        form.password.as_deref(),
        form.confirm_password.as_deref(),
    ) {
        (Some(n), Some(e), Some(p), Some(c))
            if !n.is_empty() && !e.is_empty() && !p.is_empty() && !c.is_empty() =>
        {
            (n, e, p, c)
        }
        _ => return Err(RegisterError::MissingFields),
    };

    if !email.validate_email() {
        return Err(RegisterError::InvalidEmail);
    }
    if password != confirm {
        return Err(RegisterError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RegisterError::PasswordTooShort);
    }

    Ok(ValidRegistration {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Only same-origin relative paths may be used as a post-login redirect
fn is_safe_redirect_target(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains(':')
}

/// GET /register
pub async fn register_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<Response> {
    if session_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(pages::register_page(None).into_response())
}

/// POST /register
///
/// On success redirects to the login page with a success notice; on any
/// validation failure redisplays the form with the specific notice. A
/// storage fault (including losing the email-uniqueness race to a
/// concurrent registration) surfaces as a generic failure notice with
/// the detail logged server-side.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Response> {
    if session_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let valid = match validate_registration(&form) {
        Ok(valid) => valid,
        Err(e) => return Ok(pages::register_page(Some(&e.to_string())).into_response()),
    };

    // Check-then-act; the unique constraint is the backstop for races.
    if User::find_by_email(&state.db, &valid.email).await?.is_some() {
        return Ok(
            pages::register_page(Some(&RegisterError::EmailTaken.to_string())).into_response(),
        );
    }

    let password_hash = hash_password(&valid.password)?;

    match User::create(
        &state.db,
        CreateUser {
            email: valid.email,
            password_hash,
            name: valid.name,
        },
    )
    .await
    {
        Ok(user) => {
            tracing::info!(user_id = user.id, "New user registered");
            Ok(Redirect::to("/login?notice=registered").into_response())
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            Ok(pages::register_page(Some(REGISTRATION_FAILED_NOTICE)).into_response())
        }
    }
}

/// GET /login
pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> ApiResult<Response> {
    if session_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let notice = match query.notice.as_deref() {
        Some("registered") => Some("Registration successful! Please log in."),
        Some("logged_out") => Some("You have been logged out."),
        None if query.next.is_some() => Some("Please log in to access this page."),
        _ => None,
    };

    Ok(pages::login_page(notice, query.next.as_deref()).into_response())
}

/// POST /login
///
/// On a verified email/password pair, opens a session (long-lived when
/// "remember" is checked), sets the session cookie, and redirects to the
/// validated `next` target or the dashboard. Unknown email and wrong
/// password are indistinguishable to the client.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    if session_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let next = query.next.as_deref();

    let (email, password) = match (form.email.as_deref().map(str::trim), form.password.as_deref())
    {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Ok(pages::login_page(Some(MISSING_CREDENTIALS_NOTICE), next).into_response())
        }
    };

    let user = User::find_by_email(&state.db, email).await?;

    let verified = match &user {
        Some(user) => verify_password(password, &user.password_hash)?,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            return Ok(pages::login_page(Some(INVALID_CREDENTIALS_NOTICE), next).into_response())
        }
    };

    let lifetime = if form.remember.is_some() {
        SessionLifetime::Remember
    } else {
        SessionLifetime::Standard
    };

    let token = generate_session_token();
    let token_hash = hash_session_token(state.session_secret(), &token);

    Session::create(
        &state.db,
        CreateSession {
            user_id: user.id,
            token_hash,
            expires_at: Utc::now() + lifetime.duration(),
        },
    )
    .await?;

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        lifetime.max_age_seconds()
    );
    let jar = jar.add(Cookie::parse(cookie).expect("session cookie is well-formed"));

    let target = next.filter(|n| is_safe_redirect_target(n)).unwrap_or("/");

    tracing::info!(user_id = user.id, "User logged in");
    Ok((jar, Redirect::to(target)).into_response())
}

/// GET /logout
///
/// Deletes the session row and clears the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token_hash = hash_session_token(state.session_secret(), cookie.value());
        Session::delete_by_token_hash(&state.db, &token_hash).await?;
    }

    let clear = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    let jar = jar.add(Cookie::parse(clear).expect("clear cookie is well-formed"));

    Ok((jar, Redirect::to("/login?notice=logged_out")).into_response())
}
