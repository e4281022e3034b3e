//! Login session model
//!
//! Sessions are server-side rows keyed by the HMAC digest of the opaque
//! cookie token (see [`crate::auth::session`]). A session is valid until
//! its `expires_at` passes or it is deleted on logout; expired rows are
//! swept by [`Session::purge_expired`] at startup.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// A server-side login session
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Unique session ID (autoincrement)
    pub id: i64,

    /// The user this session authenticates
    pub user_id: i64,

    /// HMAC-SHA256 digest of the cookie token (hex)
    pub token_hash: String,

    /// When the session was opened
    pub created_at: DateTime<Utc>,

    /// When the session stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Input for creating a new session
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Opens a new session for a user
    pub async fn create(pool: &SqlitePool, data: CreateSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.token_hash)
        .bind(Utc::now())
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds an unexpired session by token digest
    ///
    /// Expired sessions are treated as absent; they are physically removed
    /// by [`Session::purge_expired`].
    pub async fn find_active(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token_hash, created_at, expires_at
            FROM sessions
            WHERE token_hash = ? AND expires_at > ?
            "#,
        )
        .bind(token_hash)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session by token digest (logout)
    ///
    /// Returns true if a session was deleted.
    pub async fn delete_by_token_hash(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes all expired sessions
    ///
    /// Returns the number of rows removed.
    pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
