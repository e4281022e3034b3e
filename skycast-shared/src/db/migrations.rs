//! Embedded database migration runner
//!
//! Migrations live in the `migrations/` directory of this crate and are
//! compiled into the binary with `sqlx::migrate!`, so a fresh database
//! file is brought to the current schema on startup without any external
//! tooling.

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Safe to call on every startup; already-applied migrations are skipped.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the migrations
/// table cannot be created.
///
/// # Example
///
/// ```no_run
/// use skycast_shared::db::pool::{create_pool, DatabaseConfig};
/// use skycast_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
