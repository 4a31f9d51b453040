use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use config::ConfigError;
use rand::rngs::OsRng;
use rand::CryptoRng;
use rand::RngCore;

use crate::bearer::extract_bearer_token;
use crate::bearer::BearerError;
use crate::config::AuthConfig;
use crate::identity::Identity;
use crate::jwt::TokenAuthority;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::RefreshTokenError;
use crate::refresh::RefreshTokenGenerator;
use crate::secret::SigningSecret;

/// Authentication coordinator.
///
/// Composes password verification, session token minting and validation,
/// refresh token generation and bearer extraction into the login and
/// per-request flows a service needs. Holds configuration only; the signing
/// secret is passed on each call.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
    password_hasher: PasswordHasher,
    token_authority: TokenAuthority,
    refresh_tokens: RefreshTokenGenerator,
}

/// Result of successful login.
#[derive(Debug, Clone)]
pub struct LoginTokens {
    /// Signed session token
    pub access_token: String,
    /// Opaque token for the caller's refresh store
    pub refresh_token: String,
    /// When `access_token` stops validating
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Refresh token error: {0}")]
    RefreshToken(#[from] RefreshTokenError),

    #[error("Credential error: {0}")]
    Bearer(#[from] BearerError),
}

impl AuthenticationError {
    /// True when the failure should be treated as a server fault rather than
    /// answered with "unauthorized".
    pub fn is_environment_fault(&self) -> bool {
        match self {
            Self::Password(e) => e.is_environment_fault(),
            Self::Token(e) => e.is_environment_fault(),
            Self::RefreshToken(RefreshTokenError::Entropy(_)) => true,
            Self::InvalidCredentials | Self::Bearer(_) => false,
        }
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Session token settings
    ///
    /// # Errors
    /// * `ConfigError` - Settings fail `AuthConfig::validate`
    pub fn new(config: AuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            password_hasher: PasswordHasher::new(),
            token_authority: TokenAuthority::new(),
            refresh_tokens: RefreshTokenGenerator::new(),
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Resolve a client-requested session lifetime.
    ///
    /// Absent, zero or negative requests get the configured default; anything
    /// else is capped at the configured maximum.
    pub fn session_ttl(&self, requested_seconds: Option<i64>) -> Duration {
        match requested_seconds {
            Some(seconds) if seconds > 0 => {
                let max = self.config.max_access_token_ttl().num_seconds();
                Duration::seconds(seconds.min(max))
            }
            _ => self.config.access_token_ttl(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a session token plus a refresh token.
    ///
    /// A wrong password and a corrupt stored hash both come back as
    /// `InvalidCredentials`; only the log tells them apart.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identity of the user the hash belongs to
    /// * `secret` - Signing secret
    /// * `requested_ttl_seconds` - Client-requested session lifetime, if any
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or the hash is unusable
    /// * `Password` - Verification failed for environmental reasons
    /// * `Token` - Token signing failed
    /// * `RefreshToken` - The entropy source failed
    pub fn login(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &Identity,
        secret: &SigningSecret,
        requested_ttl_seconds: Option<i64>,
    ) -> Result<LoginTokens, AuthenticationError> {
        self.login_with_rng(
            password,
            stored_hash,
            subject,
            secret,
            requested_ttl_seconds,
            &mut OsRng,
        )
    }

    pub(crate) fn login_with_rng<R: RngCore + CryptoRng>(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &Identity,
        secret: &SigningSecret,
        requested_ttl_seconds: Option<i64>,
        rng: &mut R,
    ) -> Result<LoginTokens, AuthenticationError> {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(subject = %subject, "Password mismatch");
                return Err(AuthenticationError::InvalidCredentials);
            }
            Err(PasswordError::MalformedHash(reason)) => {
                tracing::warn!(subject = %subject, error = %reason, "Stored password hash is malformed");
                return Err(AuthenticationError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        }

        let ttl = self.session_ttl(requested_ttl_seconds);
        let now = Utc::now();
        let access_token = self.token_authority.mint_at(subject, secret, ttl, now)?;
        let refresh_token = self.refresh_tokens.generate_with(rng)?;

        tracing::debug!(subject = %subject, ttl_seconds = ttl.num_seconds(), "Login succeeded");

        Ok(LoginTokens {
            access_token,
            refresh_token,
            expires_at: now + ttl,
        })
    }

    /// Mint a fresh session token with the default lifetime.
    ///
    /// The caller has already resolved a refresh token to `subject` through
    /// its own store.
    ///
    /// # Errors
    /// * `Token` - Token signing failed
    pub fn refresh_session(
        &self,
        subject: &Identity,
        secret: &SigningSecret,
    ) -> Result<String, AuthenticationError> {
        let token = self
            .token_authority
            .mint(subject, secret, self.config.access_token_ttl())?;

        tracing::debug!(subject = %subject, "Session refreshed");

        Ok(token)
    }

    /// Generate a refresh token without a login, e.g. on rotation.
    ///
    /// # Errors
    /// * `RefreshToken` - The entropy source failed
    pub fn issue_refresh_token(&self) -> Result<String, AuthenticationError> {
        Ok(self.refresh_tokens.generate()?)
    }

    /// Authenticate an inbound request from its authorization header value.
    ///
    /// # Arguments
    /// * `header_value` - Raw `Authorization` header value, if present
    /// * `secret` - Signing secret
    ///
    /// # Returns
    /// The Identity the session token was minted for
    ///
    /// # Errors
    /// * `Bearer` - Header is missing or has no credential field
    /// * `Token` - Session token was rejected
    pub fn authenticate_request(
        &self,
        header_value: Option<&str>,
        secret: &SigningSecret,
    ) -> Result<Identity, AuthenticationError> {
        let token = extract_bearer_token(header_value).map_err(|e| {
            tracing::debug!(error = %e, "Bearer credential rejected");
            e
        })?;

        let subject = self.validate_token(token, secret)?;

        Ok(subject)
    }

    /// Validate a session token.
    ///
    /// # Errors
    /// * `TokenError` - Token validation failed
    pub fn validate_token(
        &self,
        token: &str,
        secret: &SigningSecret,
    ) -> Result<Identity, TokenError> {
        self.token_authority.validate(token, secret).map_err(|e| {
            if e.is_environment_fault() {
                tracing::error!(kind = e.kind(), error = %e, "Session token validation failed");
            } else {
                tracing::debug!(kind = e.kind(), error = %e, "Session token rejected");
            }
            e
        })
    }
}
