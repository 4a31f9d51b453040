use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::SessionClaims;
use super::claims::ISSUER;
use super::errors::TokenError;
use crate::identity::Identity;
use crate::secret::SigningSecret;

/// The only algorithm minted or accepted.
const ALGORITHM: Algorithm = Algorithm::HS256;
const ALGORITHM_NAME: &str = "HS256";

/// Only the `alg` field is inspected before the signature is checked.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Session token authority.
///
/// Mints and validates HS256 JWTs bound to a subject identity, the fixed
/// issuer and an expiry. Holds no key material: the signing secret is lent
/// on each call, so one instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenAuthority;

impl TokenAuthority {
    pub fn new() -> Self {
        Self
    }

    /// Mint a session token for `subject`.
    ///
    /// A zero or negative `ttl` yields a token that is already expired.
    ///
    /// # Arguments
    /// * `subject` - Identity the token asserts
    /// * `secret` - Signing secret
    /// * `ttl` - Lifetime measured from now
    ///
    /// # Returns
    /// JWT token string
    ///
    /// # Errors
    /// * `Signing` - Claims could not be serialized or signed
    pub fn mint(
        &self,
        subject: &Identity,
        secret: &SigningSecret,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.mint_at(subject, secret, ttl, Utc::now())
    }

    pub(crate) fn mint_at(
        &self,
        subject: &Identity,
        secret: &SigningSecret,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims::for_subject(subject, now, ttl)
            .ok_or_else(|| TokenError::Signing("Token expiry out of range".to_string()))?;

        let header = Header::new(ALGORITHM);

        encode(&header, &claims, &EncodingKey::from_secret(secret.as_bytes())).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session token");
            TokenError::Signing(e.to_string())
        })
    }

    /// Validate a session token and recover its subject.
    ///
    /// Checks run in a fixed order and the first failure wins: structure,
    /// declared algorithm, signature, issuer, expiry, subject.
    ///
    /// `nbf` is not checked: tokens minted here never carry it, so a future
    /// `nbf` on an otherwise valid token is accepted.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    /// * `secret` - Signing secret
    ///
    /// # Returns
    /// The Identity named by the `sub` claim
    ///
    /// # Errors
    /// * `Malformed` - Token is not a three-part JWT or a segment fails to decode
    /// * `Signature` - Algorithm is not HS256 or the signature does not verify
    /// * `IssuerMismatch` - `iss` is not the fixed issuer
    /// * `Expired` - `exp` is missing or not in the future
    /// * `MissingSubject` - `sub` is empty
    /// * `InvalidSubject` - `sub` is not a valid Identity
    pub fn validate(&self, token: &str, secret: &SigningSecret) -> Result<Identity, TokenError> {
        self.validate_at(token, secret, Utc::now())
    }

    pub(crate) fn validate_at(
        &self,
        token: &str,
        secret: &SigningSecret,
        now: DateTime<Utc>,
    ) -> Result<Identity, TokenError> {
        check_declared_algorithm(token)?;

        let mut validation = Validation::new(ALGORITHM);
        // Expiry, issuer and subject are checked below so each gets its own error
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::Signature(e.to_string())
            }
            _ => TokenError::Malformed(e.to_string()),
        })?;

        let claims = token_data.claims;

        if claims.iss != ISSUER {
            return Err(TokenError::IssuerMismatch(claims.iss));
        }

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        if claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        Identity::from_string(&claims.sub).map_err(|e| TokenError::InvalidSubject(e.to_string()))
    }
}

/// Reject anything that is not a three-segment token declaring HS256.
///
/// Runs before signature verification so that `none` and foreign algorithms
/// are reported as signature failures even when the header names an
/// algorithm the JWT library cannot parse.
fn check_declared_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let header_segment = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(_), Some(_), None) => header,
        _ => {
            return Err(TokenError::Malformed(
                "Expected three dot-separated segments".to_string(),
            ))
        }
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|e| TokenError::Malformed(format!("Invalid header encoding: {}", e)))?;

    let header: RawHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| TokenError::Malformed(format!("Invalid header: {}", e)))?;

    if header.alg != ALGORITHM_NAME {
        return Err(TokenError::Signature(format!(
            "Unexpected signing method: {}",
            header.alg
        )));
    }

    Ok(())
}
