//! Database layer for Skycast
//!
//! This module provides connection pooling and embedded migrations for the
//! file-backed SQLite store. Models live in the `models` module at crate
//! root level.
//!
//! # Example
//!
//! ```no_run
//! use skycast_shared::db::pool::{create_pool, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig {
//!         url: "sqlite://skycast.db".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let pool = create_pool(config).await?;
//!     skycast_shared::db::migrations::run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

pub mod migrations;
pub mod pool;
