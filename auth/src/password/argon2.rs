use argon2::password_hash::Error as PhcError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use argon2::ARGON2ID_IDENT;
use rand::rngs::OsRng;
use rand::CryptoRng;
use rand::RngCore;

use super::errors::PasswordError;

/// Memory cost in KiB (19 MiB).
const MEMORY_COST_KIB: u32 = 19 * 1024;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// Credential hashing implementation.
///
/// Argon2id with fixed cost parameters. Callers cannot tune the cost per call;
/// verification always honours the parameters embedded in the stored hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Any string is accepted, including the empty string.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - The entropy source could not supply a salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.hash_with_rng(password, &mut OsRng)
    }

    pub(crate) fn hash_with_rng<R: RngCore + CryptoRng>(
        &self,
        password: &str,
        rng: &mut R,
    ) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rng.try_fill_bytes(&mut salt_bytes).map_err(|e| {
            tracing::error!(error = %e, "Entropy source failed while generating salt");
            PasswordError::HashingFailed(format!("Salt generation failed: {}", e))
        })?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        argon2id()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison is constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Hash is not a complete argon2id PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::MalformedHash(format!("Invalid password hash: {}", e)))?;

        if parsed_hash.algorithm != ARGON2ID_IDENT {
            return Err(PasswordError::MalformedHash(format!(
                "Unsupported algorithm: {}",
                parsed_hash.algorithm
            )));
        }

        if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
            return Err(PasswordError::MalformedHash(
                "Hash is missing salt or digest".to_string(),
            ));
        }

        match argon2id()?.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}

fn argon2id() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
