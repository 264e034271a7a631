//! Signature record types and data structures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user_agent::{BrowserFamily, DeviceClass};
use crate::tokens::TokenPayload;

/// Role of the signer in the signed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignerRole {
    /// Employer / contracting organisation
    Employer,
    /// Employee / contracted person
    Employee,
    /// Witness to the signing
    Witness,
}

impl SignerRole {
    /// Get the canonical name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerRole::Employer => "EMPLOYER",
            SignerRole::Employee => "EMPLOYEE",
            SignerRole::Witness => "WITNESS",
        }
    }
}

impl fmt::Display for SignerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity the signer declares during the ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    /// Full name as typed by the signer
    pub name: String,
    /// E-mail address
    pub email: String,
    /// Role in the document
    pub role: SignerRole,
}

impl Signer {
    /// Create a signer.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: SignerRole) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

/// Request context captured at bind time.
#[derive(Debug, Clone)]
pub struct SigningContext {
    /// Client IP address
    pub ip_address: Option<String>,
    /// Client user agent
    pub user_agent: Option<String>,
    /// Moment the signer completed the signature
    pub timestamp: DateTime<Utc>,
    /// Host session id; a random one is generated when absent
    pub session_id: Option<String>,
    /// Validated payload of the token that opened the ceremony
    pub token: Option<TokenPayload>,
}

impl SigningContext {
    /// Create a context at `timestamp`.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            timestamp,
            session_id: None,
            token: None,
        }
    }

    /// Create a context at the current time.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Set the client IP address.
    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Set the client user agent.
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the host session id.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attach the validated token payload the signer arrived with.
    pub fn with_token(mut self, payload: TokenPayload) -> Self {
        self.token = Some(payload);
        self
    }
}

/// Environment details stored with a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureMetadata {
    /// Browser family
    pub browser_family: BrowserFamily,
    /// Device class
    pub device_class: DeviceClass,
    /// Session id
    pub session_id: String,
}

/// Auditable record of one completed signing ceremony.
///
/// Records are immutable; corrections are made by binding an amendment, which
/// produces a new record that names this one in `supersedes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalSignatureRecord {
    pub(crate) document_id: String,
    pub(crate) signer_name: String,
    pub(crate) signer_email: String,
    pub(crate) signer_role: SignerRole,
    pub(crate) signature_image: String,
    pub(crate) signed_at: DateTime<Utc>,
    pub(crate) ip_address: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) document_hash: String,
    pub(crate) verification_code: String,
    pub(crate) is_verified: bool,
    pub(crate) metadata: SignatureMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) supersedes: Option<String>,
}

impl DigitalSignatureRecord {
    /// Id of the signed document.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Signer's name.
    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }

    /// Signer's e-mail address.
    pub fn signer_email(&self) -> &str {
        &self.signer_email
    }

    /// Signer's role.
    pub fn signer_role(&self) -> SignerRole {
        self.signer_role
    }

    /// Signature image as a `data:` URI.
    pub fn signature_image(&self) -> &str {
        &self.signature_image
    }

    /// Signing time (millisecond precision).
    pub fn signed_at(&self) -> DateTime<Utc> {
        self.signed_at
    }

    /// Client IP address.
    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    /// Client user agent.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Hash of the signed document content.
    pub fn document_hash(&self) -> &str {
        &self.document_hash
    }

    /// Deterministic audit code.
    pub fn verification_code(&self) -> &str {
        &self.verification_code
    }

    /// Whether the signer's identity was confirmed against the invitation token.
    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Environment metadata.
    pub fn metadata(&self) -> &SignatureMetadata {
        &self.metadata
    }

    /// Verification code of the record this one amends.
    pub fn supersedes(&self) -> Option<&str> {
        self.supersedes.as_deref()
    }

    /// First 16 characters of the code in groups of four, for printing on documents.
    pub fn short_code(&self) -> String {
        self.verification_code
            .chars()
            .take(16)
            .collect::<Vec<_>>()
            .chunks(4)
            .map(|c| c.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("-")
            .to_uppercase()
    }
}

/// Outcome of auditing a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    /// Code recomputes and the document is unchanged
    Valid,
    /// Valid, but the signer was not verified against a token
    ValidWithWarnings,
    /// The code does not recompute or the document changed
    Invalid,
}

impl AuditStatus {
    /// Check if the status indicates a valid record.
    pub fn is_valid(&self) -> bool {
        matches!(self, AuditStatus::Valid)
    }

    /// Check if the status indicates any form of validity (including warnings).
    pub fn is_ok(&self) -> bool {
        matches!(self, AuditStatus::Valid | AuditStatus::ValidWithWarnings)
    }
}

/// Result of auditing a stored record.
#[derive(Debug, Clone)]
pub struct AuditResult {
    /// Overall status
    pub status: AuditStatus,
    /// Whether the stored verification code matches its inputs
    pub code_matches: bool,
    /// Whether the document hash differs from the one signed
    pub document_modified: bool,
    /// Audit messages (errors, warnings)
    pub messages: Vec<String>,
}
