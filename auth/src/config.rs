use chrono::Duration;
use config::Config;
use config::ConfigError;
use serde::Deserialize;

/// Hard ceiling on any configured lifetime (one year).
const TTL_CEILING_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Session token settings.
///
/// Meant to be embedded as the `auth` section of the host service's own
/// configuration tree; this crate reads no files or environment variables
/// itself. Missing fields fall back to their defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of a session token when the client does not ask for one.
    pub access_token_ttl_seconds: i64,
    /// Upper bound on any client-requested lifetime.
    pub max_access_token_ttl_seconds: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_seconds: 3600,
            max_access_token_ttl_seconds: 3600,
        }
    }
}

impl AuthConfig {
    pub const SECTION: &'static str = "auth";

    /// Read the `auth` section of an already built configuration.
    ///
    /// An absent section yields the defaults.
    ///
    /// # Errors
    /// * `ConfigError` - Section cannot be deserialized or fails validation
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let auth = match config.get::<AuthConfig>(Self::SECTION) {
            Ok(auth) => auth,
            Err(ConfigError::NotFound(_)) => AuthConfig::default(),
            Err(e) => return Err(e),
        };

        auth.validate()?;

        Ok(auth)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(format!(
                "auth.access_token_ttl_seconds must be positive, got {}",
                self.access_token_ttl_seconds
            )));
        }

        if self.max_access_token_ttl_seconds < self.access_token_ttl_seconds {
            return Err(ConfigError::Message(format!(
                "auth.max_access_token_ttl_seconds ({}) is below auth.access_token_ttl_seconds ({})",
                self.max_access_token_ttl_seconds, self.access_token_ttl_seconds
            )));
        }

        if self.max_access_token_ttl_seconds > TTL_CEILING_SECONDS {
            return Err(ConfigError::Message(format!(
                "auth.max_access_token_ttl_seconds must not exceed {}, got {}",
                TTL_CEILING_SECONDS, self.max_access_token_ttl_seconds
            )));
        }

        Ok(())
    }

    pub fn access_token_ttl(&self) -> Duration {
        bounded(self.access_token_ttl_seconds)
    }

    pub fn max_access_token_ttl(&self) -> Duration {
        bounded(self.max_access_token_ttl_seconds)
    }
}

fn bounded(seconds: i64) -> Duration {
    Duration::seconds(seconds.clamp(0, TTL_CEILING_SECONDS))
}

#[cfg(test)]
mod tests {
    use config::File;
    use config::FileFormat;

    use super::*;

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = Config::builder().build().unwrap();
        let auth = AuthConfig::from_config(&config).unwrap();

        assert_eq!(auth, AuthConfig::default());
        assert_eq!(auth.access_token_ttl(), Duration::hours(1));
    }

    #[test]
    fn test_reads_section_from_file() {
        let config = Config::builder()
            .add_source(File::from_str(
                "[auth]\naccess_token_ttl_seconds = 900\nmax_access_token_ttl_seconds = 7200\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let auth = AuthConfig::from_config(&config).unwrap();
        assert_eq!(auth.access_token_ttl_seconds, 900);
        assert_eq!(auth.max_access_token_ttl(), Duration::hours(2));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::builder()
            .set_override("auth.max_access_token_ttl_seconds", 86_400_i64)
            .unwrap()
            .build()
            .unwrap();

        let auth = AuthConfig::from_config(&config).unwrap();
        assert_eq!(auth.access_token_ttl_seconds, 3600);
        assert_eq!(auth.max_access_token_ttl_seconds, 86_400);
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        let config = Config::builder()
            .set_override("auth.access_token_ttl_seconds", 0_i64)
            .unwrap()
            .build()
            .unwrap();

        assert!(AuthConfig::from_config(&config).is_err());
    }

    #[test]
    fn test_rejects_default_above_maximum() {
        let auth = AuthConfig {
            access_token_ttl_seconds: 7200,
            max_access_token_ttl_seconds: 3600,
        };
        assert!(auth.validate().is_err());
    }

    #[test]
    fn test_rejects_maximum_above_ceiling() {
        let auth = AuthConfig {
            access_token_ttl_seconds: 3600,
            max_access_token_ttl_seconds: i64::MAX,
        };
        assert!(auth.validate().is_err());
        assert_eq!(auth.max_access_token_ttl(), Duration::days(365));
    }
}
