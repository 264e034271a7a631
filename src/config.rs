//! Configuration for token issuance.
//!
//! The process secret is injected here at construction time rather than read
//! from a global, so tests can supply fixed secrets.

use chrono::Duration;

use crate::error::{Error, Result};
use crate::tokens::{KdfParams, TokenPurpose, TokenSecret};

/// Environment variable holding the token secret.
pub const SECRET_ENV: &str = "ESIGN_TOKEN_SECRET";

/// Environment variable holding an optional key-derivation salt.
pub const SALT_ENV: &str = "ESIGN_TOKEN_SALT";

/// Salt used when none is configured.
pub const DEFAULT_SALT: &[u8] = b"esign_oxide/token-key/v1";

/// Token service configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret the AEAD key is derived from.
    pub secret: TokenSecret,

    /// Key-derivation salt.
    pub salt: Vec<u8>,

    /// Argon2id cost parameters.
    pub kdf: KdfParams,

    /// Default validity for contract signing links.
    pub contract_signing_validity: Duration,

    /// Default validity for e-mail verification links.
    pub email_verification_validity: Duration,

    /// Default validity for password reset links.
    pub password_reset_validity: Duration,
}

impl TokenConfig {
    /// Create configuration with defaults around the given secret.
    pub fn new(secret: TokenSecret) -> Self {
        Self {
            secret,
            salt: DEFAULT_SALT.to_vec(),
            kdf: KdfParams::default(),
            contract_signing_validity: Duration::hours(168),
            email_verification_validity: Duration::hours(24),
            password_reset_validity: Duration::hours(1),
        }
    }

    /// Load configuration from `ESIGN_TOKEN_SECRET` and `ESIGN_TOKEN_SALT`.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var(SECRET_ENV)
            .map_err(|_| Error::InvalidConfig(format!("{} is not set", SECRET_ENV)))?;
        let mut config = Self::new(TokenSecret::new(secret.into_bytes())?);

        if let Ok(salt) = std::env::var(SALT_ENV) {
            config = config.with_salt(salt.into_bytes());
        }

        log::debug!("Loaded token configuration from environment");
        Ok(config)
    }

    /// Set the key-derivation salt.
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Set the Argon2id cost parameters.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Override the default validity for one purpose.
    pub fn with_validity(mut self, purpose: TokenPurpose, validity: Duration) -> Self {
        match purpose {
            TokenPurpose::ContractSigning => self.contract_signing_validity = validity,
            TokenPurpose::EmailVerification => self.email_verification_validity = validity,
            TokenPurpose::PasswordReset => self.password_reset_validity = validity,
        }
        self
    }

    /// Default validity for a purpose.
    pub fn default_validity(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::ContractSigning => self.contract_signing_validity,
            TokenPurpose::EmailVerification => self.email_verification_validity,
            TokenPurpose::PasswordReset => self.password_reset_validity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TokenConfig {
        TokenConfig::new(TokenSecret::new(vec![9u8; 32]).unwrap())
    }

    #[test]
    fn test_default_validities() {
        let c = config();
        assert_eq!(c.default_validity(TokenPurpose::ContractSigning), Duration::hours(168));
        assert_eq!(c.default_validity(TokenPurpose::EmailVerification), Duration::hours(24));
        assert_eq!(c.default_validity(TokenPurpose::PasswordReset), Duration::hours(1));
        assert_eq!(c.salt, DEFAULT_SALT);
    }

    #[test]
    fn test_builder() {
        let c = config()
            .with_salt(b"custom-salt".to_vec())
            .with_kdf(KdfParams::fast())
            .with_validity(TokenPurpose::PasswordReset, Duration::minutes(15));
        assert_eq!(c.salt, b"custom-salt");
        assert_eq!(c.kdf, KdfParams::fast());
        assert_eq!(c.default_validity(TokenPurpose::PasswordReset), Duration::minutes(15));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
    }
}
