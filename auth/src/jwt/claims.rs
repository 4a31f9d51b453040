use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::identity::Identity;

/// Issuer name written by `mint` and required by `validate`.
pub const ISSUER: &str = "chirpy";

/// Claims carried by a session token.
///
/// String claims default to empty on decode so that a missing `iss` or `sub`
/// surfaces as an issuer or subject failure rather than a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Issuer
    #[serde(default)]
    pub iss: String,

    /// Subject (canonical Identity string)
    #[serde(default)]
    pub sub: String,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl SessionClaims {
    /// Build claims for `subject` issued at `now`, expiring `ttl` later.
    ///
    /// Returns `None` if the expiry falls outside the representable time range.
    pub fn for_subject(subject: &Identity, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expiration = now.checked_add_signed(ttl)?;

        Some(Self {
            iss: ISSUER.to_string(),
            sub: subject.to_string(),
            iat: Some(now.timestamp()),
            exp: Some(expiration.timestamp()),
        })
    }

    /// Check if token is expired.
    ///
    /// A token without `exp` counts as expired, as does one whose expiry equals
    /// the current second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(true, |exp| exp <= current_timestamp)
    }
}
