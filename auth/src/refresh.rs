use rand::rngs::OsRng;
use rand::CryptoRng;
use rand::RngCore;
use thiserror::Error;

/// Random bytes per token (256 bits, 64 hex characters).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Length of a rendered refresh token.
pub const REFRESH_TOKEN_LEN: usize = REFRESH_TOKEN_BYTES * 2;

/// Error type for refresh token generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Entropy source failed: {0}")]
    Entropy(String),
}

/// Opaque refresh token generator.
///
/// Tokens carry no structure or expiry; their meaning is whatever the
/// external store that records them decides.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTokenGenerator;

impl RefreshTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a refresh token from the operating system CSPRNG.
    ///
    /// # Returns
    /// 64-character lowercase hex string
    ///
    /// # Errors
    /// * `Entropy` - The random source could not fill the buffer
    pub fn generate(&self) -> Result<String, RefreshTokenError> {
        self.generate_with(&mut OsRng)
    }

    /// Generate a refresh token from the given cryptographic random source.
    ///
    /// A failed draw is returned as an error; no token is ever built from a
    /// partially filled buffer.
    pub fn generate_with<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<String, RefreshTokenError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!(error = %e, "Entropy source failed while generating refresh token");
            RefreshTokenError::Entropy(e.to_string())
        })?;

        Ok(hex::encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::test_support::FailingRng;

    #[test]
    fn test_generate_fixed_width_lowercase_hex() {
        let token = RefreshTokenGenerator::new().generate().unwrap();

        assert_eq!(token.len(), REFRESH_TOKEN_LEN);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_generate_is_unique() {
        let generator = RefreshTokenGenerator::new();
        let tokens: HashSet<String> = (0..1000).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_generate_is_not_zero_filled() {
        let token = RefreshTokenGenerator::new().generate().unwrap();
        assert_ne!(token, "0".repeat(REFRESH_TOKEN_LEN));
    }

    #[test]
    fn test_generate_with_uses_supplied_source() {
        let generator = RefreshTokenGenerator::new();
        let first = generator
            .generate_with(&mut StdRng::seed_from_u64(7))
            .unwrap();
        let second = generator
            .generate_with(&mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_entropy_failure_is_fatal() {
        let result = RefreshTokenGenerator::new().generate_with(&mut FailingRng);
        assert!(matches!(result, Err(RefreshTokenError::Entropy(_))));
    }
}
