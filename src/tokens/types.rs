//! Token payload types.
//!
//! Field names on the wire are shortened to keep encoded tokens well under
//! practical URL length limits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declared use of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Link to a contract signing ceremony
    ContractSigning,
    /// Link confirming ownership of an e-mail address
    EmailVerification,
    /// Link authorising a password reset
    PasswordReset,
}

impl TokenPurpose {
    /// All known purposes.
    pub const ALL: [TokenPurpose; 3] = [
        TokenPurpose::ContractSigning,
        TokenPurpose::EmailVerification,
        TokenPurpose::PasswordReset,
    ];

    /// Get the canonical name of this purpose.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::ContractSigning => "contract_signing",
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenPurpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "contract_signing" => Ok(TokenPurpose::ContractSigning),
            "email_verification" => Ok(TokenPurpose::EmailVerification),
            "password_reset" => Ok(TokenPurpose::PasswordReset),
            other => Err(Error::InvalidInput(format!("unknown token purpose '{}'", other))),
        }
    }
}

/// Request context recorded when a token is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenContext {
    /// Client IP address of the issuing request
    #[serde(rename = "ip", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Client user agent of the issuing request
    #[serde(rename = "ua", default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl TokenContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the IP address.
    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.ip_address.is_none() && self.user_agent.is_none()
    }
}

/// The caller-controlled part of a token, before timestamps are stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Purpose the token is scoped to
    pub purpose: TokenPurpose,
    /// Primary subject (e.g. user or employee id)
    pub subject_id: String,
    /// Secondary subject (e.g. e-mail address of the invited signer)
    pub secondary_subject_id: String,
    /// Optional issuing context
    pub context: Option<TokenContext>,
}

impl TokenClaims {
    /// Create claims without context.
    pub fn new(
        purpose: TokenPurpose,
        subject_id: impl Into<String>,
        secondary_subject_id: impl Into<String>,
    ) -> Self {
        Self {
            purpose,
            subject_id: subject_id.into(),
            secondary_subject_id: secondary_subject_id.into(),
            context: None,
        }
    }

    /// Attach an issuing context.
    pub fn with_context(mut self, context: TokenContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Stamp the claims with an issue and expiry time.
    pub(crate) fn stamp(self, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> TokenPayload {
        TokenPayload {
            purpose: self.purpose,
            subject_id: self.subject_id,
            secondary_subject_id: self.secondary_subject_id,
            issued_at,
            expires_at,
            context: self.context.filter(|c| !c.is_empty()),
        }
    }
}

/// Decoded and authenticated token contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Purpose the token is scoped to
    #[serde(rename = "p")]
    pub purpose: TokenPurpose,
    /// Primary subject
    #[serde(rename = "s")]
    pub subject_id: String,
    /// Secondary subject
    #[serde(rename = "s2")]
    pub secondary_subject_id: String,
    /// Issue time (second precision)
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    /// Expiry time (second precision)
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
    /// Issuing context
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TokenContext>,
}

impl TokenPayload {
    /// Check structural invariants that serde cannot express.
    pub(crate) fn check_invariants(&self) -> Result<()> {
        if self.expires_at <= self.issued_at {
            return Err(Error::CorruptPayload("expires_at is not after issued_at".to_string()));
        }
        if self.subject_id.trim().is_empty() {
            return Err(Error::CorruptPayload("empty subject".to_string()));
        }
        Ok(())
    }

    /// Whether the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Remaining validity at `now`, clamped at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> chrono::Duration {
        (self.expires_at - now).max(chrono::Duration::zero())
    }
}
