use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}

impl PasswordError {
    /// True when the failure comes from the platform rather than the input.
    pub fn is_environment_fault(&self) -> bool {
        matches!(self, Self::HashingFailed(_))
    }
}
