//! Error types for the signing subsystem.
//!
//! This module defines all error types that can occur while issuing and
//! validating tokens, capturing signatures and binding signature records.

use crate::tokens::TokenPurpose;

/// Result type alias for signing subsystem operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during a signing ceremony.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// Token is not structurally a token (bad encoding, wrong length, unknown version)
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Token failed authentication; it was altered or sealed under another key
    #[error("Token integrity check failed")]
    TamperedToken,

    /// Token authenticated but its `expires_at` lies in the past
    #[error("Token expired at {expired_at}")]
    ExpiredToken {
        /// Expiry timestamp carried by the token
        expired_at: chrono::DateTime<chrono::Utc>,
    },

    /// Token was issued for a different purpose than the one required
    #[error("Token purpose mismatch: expected {expected}, found {found}")]
    PurposeMismatch {
        /// Purpose required by the caller
        expected: TokenPurpose,
        /// Purpose carried by the token
        found: TokenPurpose,
    },

    /// Token decrypted but the payload is not a valid token payload
    #[error("Corrupt token payload: {0}")]
    CorruptPayload(String),

    /// Token could not be serialized or sealed
    #[error("Token encoding failed: {0}")]
    EncodingFailure(String),

    /// Generic token rejection surfaced to untrusted callers
    #[error("Invalid or expired link")]
    InvalidToken,

    /// Token validity was under one second or pushes the expiry out of range
    #[error("Token validity out of range: {0} seconds")]
    InvalidValidity(i64),

    /// Key derivation from the configured secret failed
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// No signature was drawn, or the signature image is empty
    #[error("No signature has been captured")]
    MissingSignature,

    /// Signer e-mail does not match the subject bound to the token
    #[error("Signer {signer} does not match the invited signer")]
    IdentityMismatch {
        /// E-mail entered by the signer
        signer: String,
    },

    /// The compliance notice must be acknowledged before signing
    #[error("Compliance notice has not been acknowledged")]
    NoticeNotAcknowledged,

    /// Invalid caller-supplied value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rasterization or image encoding error
    #[error("Render error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error originates from token decoding or validation.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedToken(_)
                | Error::TamperedToken
                | Error::ExpiredToken { .. }
                | Error::PurposeMismatch { .. }
                | Error::CorruptPayload(_)
                | Error::InvalidToken
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_mismatch_error() {
        let err = Error::PurposeMismatch {
            expected: TokenPurpose::ContractSigning,
            found: TokenPurpose::PasswordReset,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("contract_signing"));
        assert!(msg.contains("password_reset"));
    }

    #[test]
    fn test_identity_mismatch_error() {
        let err = Error::IdentityMismatch {
            signer: "b@x.com".to_string(),
        };
        assert!(format!("{}", err).contains("b@x.com"));
    }

    #[test]
    fn test_invalid_token_hides_reason() {
        let msg = format!("{}", Error::InvalidToken);
        assert!(!msg.contains("expired at"));
        assert!(!msg.contains("integrity"));
    }

    #[test]
    fn test_token_error_classification() {
        assert!(Error::TamperedToken.is_token_error());
        assert!(Error::MalformedToken("x".into()).is_token_error());
        assert!(!Error::MissingSignature.is_token_error());
        assert!(!Error::NoticeNotAcknowledged.is_token_error());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
