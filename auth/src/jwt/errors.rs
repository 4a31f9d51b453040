use thiserror::Error;

/// Error type for session token operations.
///
/// Every variant other than `Signing` means "unauthenticated"; callers should
/// answer uniformly and keep the specific kind for their logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature rejected: {0}")]
    Signature(String),

    #[error("Unexpected issuer: {0:?}")]
    IssuerMismatch(String),

    #[error("Token is expired")]
    Expired,

    #[error("Missing required claim: sub")]
    MissingSubject,

    #[error("Invalid subject claim: {0}")]
    InvalidSubject(String),
}

impl TokenError {
    /// True when the failure comes from the platform rather than the input.
    pub fn is_environment_fault(&self) -> bool {
        matches!(self, Self::Signing(_))
    }

    /// Short stable name, suitable as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Signing(_) => "signing",
            Self::Malformed(_) => "malformed",
            Self::Signature(_) => "signature",
            Self::IssuerMismatch(_) => "issuer_mismatch",
            Self::Expired => "expired",
            Self::MissingSubject => "missing_subject",
            Self::InvalidSubject(_) => "invalid_subject",
        }
    }
}
