//! Route handlers
//!
//! Organized by resource:
//!
//! - `health`: Health check endpoint
//! - `auth`: Registration, login, and logout
//! - `pages`: Server-rendered page shells
//! - `weather`: The weather bundle JSON endpoint

pub mod auth;
pub mod health;
pub mod pages;
pub mod weather;
