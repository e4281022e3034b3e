//! # Skycast Shared Library
//!
//! This crate contains the types, storage layer, and weather provider
//! client shared by the Skycast API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, sessions)
//! - `auth`: Password hashing and session token primitives
//! - `db`: SQLite connection pool and embedded migrations
//! - `weather`: Weather provider client and bundle aggregator

pub mod auth;
pub mod db;
pub mod models;
pub mod weather;

/// Current version of the Skycast shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
