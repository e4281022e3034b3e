//! Opaque session tokens
//!
//! A login issues a random alphanumeric token that lives only in the
//! client's cookie. The database stores an HMAC-SHA256 digest keyed by
//! the server's session secret, so neither a leaked database nor a
//! leaked cookie alone is enough to forge or reuse a session.
//!
//! # Example
//!
//! ```
//! use skycast_shared::auth::session::{
//!     generate_session_token, hash_session_token, SessionLifetime,
//! };
//!
//! let token = generate_session_token();
//! let digest = hash_session_token("a-32-byte-minimum-signing-secret!!", &token);
//!
//! assert_eq!(digest.len(), 64); // SHA-256 hex
//! assert_eq!(SessionLifetime::Standard.duration().num_hours(), 24);
//! ```

use chrono::Duration;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the raw session token
pub const SESSION_COOKIE: &str = "skycast_session";

/// Length of a session token (characters)
const TOKEN_LENGTH: usize = 48;

/// How long a session stays valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifetime {
    /// Standard browser session (24 hours)
    Standard,

    /// Long-lived "remember me" session (30 days)
    Remember,
}

impl SessionLifetime {
    /// Gets the validity duration for this lifetime
    pub fn duration(&self) -> Duration {
        match self {
            SessionLifetime::Standard => Duration::hours(24),
            SessionLifetime::Remember => Duration::days(30),
        }
    }

    /// Gets the cookie Max-Age in seconds
    pub fn max_age_seconds(&self) -> i64 {
        self.duration().num_seconds()
    }
}

/// Generates a random session token
///
/// Uses `rand::thread_rng()` for cryptographic randomness; 48
/// alphanumeric characters give well over 256 bits of entropy.
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}

/// Computes the keyed digest of a session token
///
/// The digest, not the token, is what the sessions table stores and
/// looks up. Output is 64 lowercase hex characters.
pub fn hash_session_token(secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
