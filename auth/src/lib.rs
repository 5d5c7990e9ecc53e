//! Authentication utilities library
//!
//! Provides reusable credential primitives for the identity service:
//! - Password hashing (Argon2id, tunable cost)
//! - Time-bounded JWT issuance and verification (HS256)
//!
//! Services define their own token subject type; this crate only wraps it in
//! issuance metadata and signs it.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(8, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, JwtHandler, TokenIssuer};
//! use chrono::Duration;
//! use std::collections::HashMap;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(handler, "identity-service", Duration::hours(1));
//!
//! let mut subject = HashMap::new();
//! subject.insert("id".to_string(), "user123".to_string());
//!
//! let issued = issuer.issue(&subject).unwrap();
//! let claims: Claims<HashMap<String, String>> = issuer.verify(&issued.token).unwrap();
//! assert_eq!(claims.into_subject(), subject);
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenIssuer;
pub use password::PasswordError;
pub use password::PasswordHasher;
