//! Database models for Skycast
//!
//! # Models
//!
//! - `user`: Credential records (create/read only; accounts are never
//!   mutated or deleted by the application)
//! - `session`: Server-side login sessions keyed by token digest

pub mod session;
pub mod user;
