//! Credential and token authority for the chirpy service.
//!
//! Provides the security-critical pieces a service needs to authenticate users:
//! - Password hashing (Argon2id, fixed cost)
//! - Session token minting and validation (HS256 JWT, fixed issuer)
//! - Opaque refresh token generation
//! - Bearer credential extraction from authorization headers
//!
//! Every component is stateless. The signing secret is owned by the host
//! service and passed in on each call; persistence, transport and revocation
//! stay with the host.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use chirpy_auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use chirpy_auth::{Identity, SigningSecret, TokenAuthority};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let subject = Identity::new(Uuid::new_v4());
//!
//! let authority = TokenAuthority::new();
//! let token = authority.mint(&subject, &secret, Duration::hours(1)).unwrap();
//! assert_eq!(authority.validate(&token, &secret).unwrap(), subject);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use chirpy_auth::{AuthConfig, Authenticator, Identity, SigningSecret};
//! use uuid::Uuid;
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(AuthConfig::default()).unwrap();
//! let user_id = Identity::new(Uuid::new_v4());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue tokens
//! let tokens = auth.login("password123", &hash, &user_id, &secret, None).unwrap();
//!
//! // Authenticated request
//! let header = format!("Bearer {}", tokens.access_token);
//! let authenticated = auth.authenticate_request(Some(&header), &secret).unwrap();
//! assert_eq!(authenticated, user_id);
//! ```

pub mod authenticator;
pub mod bearer;
pub mod config;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod secret;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::LoginTokens;
pub use bearer::extract_bearer_token;
pub use bearer::BearerError;
pub use config::AuthConfig;
pub use identity::Identity;
pub use identity::IdentityError;
pub use jwt::SessionClaims;
pub use jwt::TokenAuthority;
pub use jwt::TokenError;
pub use jwt::ISSUER;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::RefreshTokenError;
pub use refresh::RefreshTokenGenerator;
pub use secret::SecretError;
pub use secret::SigningSecret;
