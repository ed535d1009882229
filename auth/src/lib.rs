//! Authentication utilities library
//!
//! Credential primitives shared by the marketplace services:
//! - Password hashing (Argon2id, fail-closed verification)
//! - HS256 JWT signing and signature validation
//! - Authentication coordination
//!
//! The library knows nothing about accounts or roles; each service defines its
//! own claims type and maps these errors into its own taxonomy.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "corrupted"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Claims {
//!     sub: String,
//!     exp: i64,
//! }
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = Claims { sub: "alice@example.com".into(), exp: 4_102_444_800 };
//! let token = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token signature
//! let decoded: Claims = auth.validate_token(&token).unwrap();
//! assert_eq!(decoded.sub, "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
