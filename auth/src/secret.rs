use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Signing secret must not be empty")]
    Empty,
}

/// Shared symmetric key used to sign and verify session tokens.
///
/// Owned by the host service and lent to each call; never cached by this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Wrap a secret string.
    ///
    /// # Errors
    /// * `Empty` - The secret is an empty string
    pub fn new(secret: impl Into<String>) -> Result<Self, SecretError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        assert_eq!(SigningSecret::new(""), Err(SecretError::Empty));
    }

    #[test]
    fn test_debug_does_not_leak() {
        let secret = SigningSecret::new("super-secret-value").unwrap();
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("super-secret-value"));
    }

    #[test]
    fn test_as_bytes() {
        let secret = SigningSecret::new("abc").unwrap();
        assert_eq!(secret.as_bytes(), b"abc");
    }
}
