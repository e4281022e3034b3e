//! Authentication primitives for Skycast
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`session`]: Opaque session token generation, keyed digests, and
//!   lifetime policy
//!
//! # Example
//!
//! ```
//! use skycast_shared::auth::password::{hash_password, verify_password};
//! use skycast_shared::auth::session::{generate_session_token, hash_session_token};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password("user_password")?;
//! assert!(verify_password("user_password", &hash)?);
//!
//! let token = generate_session_token();
//! let digest = hash_session_token("a-32-byte-minimum-signing-secret!!", &token);
//! assert_eq!(digest.len(), 64);
//! # Ok(())
//! # }
//! ```

pub mod password;
pub mod session;
