//! Business rules on top of [`TokenCodec`]: default validity windows, expiry
//! and purpose checks.
//!
//! [`TokenPolicy::validate`] is the entry point for untrusted input. It never
//! tells the caller why a token was rejected; the reason is logged server-side
//! instead, so the response cannot be used as an oracle.

use std::sync::Arc;

use chrono::Duration;

use super::clock::Clock;
use super::codec::TokenCodec;
use super::types::{TokenClaims, TokenContext, TokenPayload, TokenPurpose};
use crate::config::TokenConfig;
use crate::error::{Error, Result};

/// Issues and validates purpose-scoped tokens.
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    codec: TokenCodec,
    contract_signing_validity: Duration,
    email_verification_validity: Duration,
    password_reset_validity: Duration,
}

impl TokenPolicy {
    /// Build a policy and its codec from configuration.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        Ok(Self {
            codec: TokenCodec::new(config)?,
            contract_signing_validity: config.default_validity(TokenPurpose::ContractSigning),
            email_verification_validity: config.default_validity(TokenPurpose::EmailVerification),
            password_reset_validity: config.default_validity(TokenPurpose::PasswordReset),
        })
    }

    /// Replace the time source used for stamping and expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.codec = self.codec.with_clock(clock);
        self
    }

    /// Underlying codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Default validity for a purpose.
    pub fn default_validity(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::ContractSigning => self.contract_signing_validity,
            TokenPurpose::EmailVerification => self.email_verification_validity,
            TokenPurpose::PasswordReset => self.password_reset_validity,
        }
    }

    /// Issue a token for an already-authenticated subject.
    ///
    /// `validity` falls back to the purpose default (168 hours for contract
    /// signing) when `None`.
    pub fn issue(
        &self,
        subject_id: &str,
        secondary_subject_id: &str,
        purpose: TokenPurpose,
        context: Option<TokenContext>,
        validity: Option<Duration>,
    ) -> Result<String> {
        if subject_id.trim().is_empty() {
            return Err(Error::InvalidInput("subject id must not be blank".to_string()));
        }

        let validity = validity.unwrap_or_else(|| self.default_validity(purpose));
        let mut claims = TokenClaims::new(purpose, subject_id, secondary_subject_id);
        if let Some(context) = context {
            claims = claims.with_context(context);
        }

        let token = self.codec.encode(claims, validity)?;
        log::info!(
            "Issued {} token for subject {} valid for {}s",
            purpose,
            subject_id,
            validity.num_seconds()
        );
        Ok(token)
    }

    /// Validate a token and report the precise reason on failure.
    ///
    /// For server-side use only; never forward the error to the token holder.
    pub fn verify(&self, token: &str, required_purpose: Option<TokenPurpose>) -> Result<TokenPayload> {
        let payload = self.codec.decode(token)?;

        let now = self.codec.clock().now();
        if payload.is_expired_at(now) {
            return Err(Error::ExpiredToken {
                expired_at: payload.expires_at,
            });
        }

        if let Some(expected) = required_purpose {
            if payload.purpose != expected {
                return Err(Error::PurposeMismatch {
                    expected,
                    found: payload.purpose,
                });
            }
        }

        Ok(payload)
    }

    /// Validate a token, returning the payload only if every check passes.
    pub fn validate(&self, token: &str, required_purpose: Option<TokenPurpose>) -> Option<TokenPayload> {
        match self.verify(token, required_purpose) {
            Ok(payload) => {
                log::debug!("Accepted {} token for subject {}", payload.purpose, payload.subject_id);
                Some(payload)
            },
            Err(e @ Error::ExpiredToken { .. }) | Err(e @ Error::PurposeMismatch { .. }) => {
                log::info!("Rejected token: {}", e);
                None
            },
            Err(e) => {
                log::warn!("Rejected token: {}", e);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{KdfParams, ManualClock, TokenSecret};
    use chrono::{TimeZone, Utc};

    fn policy() -> (TokenPolicy, Arc<ManualClock>) {
        let config =
            TokenConfig::new(TokenSecret::new(vec![3u8; 32]).unwrap()).with_kdf(KdfParams::fast());
        let clock = Arc::new(ManualClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
        let policy = TokenPolicy::new(&config).unwrap().with_clock(clock.clone());
        (policy, clock)
    }

    #[test]
    fn test_issue_uses_purpose_default() {
        let (policy, clock) = policy();
        let token = policy
            .issue("u1", "a@x.com", TokenPurpose::PasswordReset, None, None)
            .unwrap();
        let payload = policy.verify(&token, None).unwrap();
        assert_eq!(payload.expires_at, clock.now() + Duration::hours(1));

        let token = policy
            .issue("u1", "a@x.com", TokenPurpose::ContractSigning, None, None)
            .unwrap();
        let payload = policy.verify(&token, None).unwrap();
        assert_eq!(payload.expires_at - payload.issued_at, Duration::hours(168));
    }

    #[test]
    fn test_issue_rejects_blank_subject() {
        let (policy, _) = policy();
        let result = policy.issue("  ", "a@x.com", TokenPurpose::ContractSigning, None, None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_expiry_boundary() {
        let (policy, clock) = policy();
        let token = policy
            .issue(
                "u1",
                "a@x.com",
                TokenPurpose::EmailVerification,
                None,
                Some(Duration::seconds(60)),
            )
            .unwrap();

        clock.advance(Duration::seconds(59));
        assert!(policy.validate(&token, None).is_some());

        clock.advance(Duration::seconds(1));
        assert!(policy.validate(&token, None).is_some());

        clock.advance(Duration::seconds(1));
        assert!(policy.validate(&token, None).is_none());
        assert!(matches!(policy.verify(&token, None), Err(Error::ExpiredToken { .. })));
    }

    #[test]
    fn test_purpose_isolation() {
        let (policy, _) = policy();
        let token = policy
            .issue("u1", "a@x.com", TokenPurpose::PasswordReset, None, None)
            .unwrap();

        assert!(policy
            .validate(&token, Some(TokenPurpose::ContractSigning))
            .is_none());
        assert!(matches!(
            policy.verify(&token, Some(TokenPurpose::ContractSigning)),
            Err(Error::PurposeMismatch {
                expected: TokenPurpose::ContractSigning,
                found: TokenPurpose::PasswordReset,
            })
        ));
        assert!(policy
            .validate(&token, Some(TokenPurpose::PasswordReset))
            .is_some());
    }

    #[test]
    fn test_validate_collapses_decode_failures() {
        let (policy, _) = policy();
        assert!(policy.validate("garbage", None).is_none());
        assert!(policy.validate("", Some(TokenPurpose::ContractSigning)).is_none());
    }

    #[test]
    fn test_tokens_remain_valid_for_repeated_checks() {
        let (policy, _) = policy();
        let token = policy
            .issue("u1", "a@x.com", TokenPurpose::ContractSigning, None, None)
            .unwrap();
        for _ in 0..3 {
            assert!(policy
                .validate(&token, Some(TokenPurpose::ContractSigning))
                .is_some());
        }
    }
}
