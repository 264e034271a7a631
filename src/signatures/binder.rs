//! Signature binding.
//!
//! This module combines a captured signature image with the signer's identity,
//! the document hash and request context into a [`DigitalSignatureRecord`].

use chrono::{DateTime, DurationRound, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use super::types::{DigitalSignatureRecord, SignatureMetadata, Signer, SigningContext};
use super::user_agent::{BrowserFamily, DeviceClass};
use crate::capture::SignatureImage;
use crate::error::{Error, Result};
use crate::tokens::TokenPurpose;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap();
}

/// Separates verification-code fields so adjacent values cannot alias.
const FIELD_SEPARATOR: u8 = 0x1F;

/// Compute the verification code for a record.
///
/// `hex(SHA-256(document_hash ␟ signer_email ␟ signed_at ␟ document_id))`, with
/// `signed_at` rendered as RFC 3339 in UTC with millisecond precision.
pub fn verification_code(
    document_hash: &str,
    signer_email: &str,
    signed_at: DateTime<Utc>,
    document_id: &str,
) -> String {
    let timestamp = signed_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut hasher = Sha256::new();
    hasher.update(document_hash.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(signer_email.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(timestamp.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(document_id.as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Binds captured signatures into auditable records.
#[derive(Debug, Default)]
pub struct SignatureBinder {}

impl SignatureBinder {
    /// Create a new binder.
    pub fn new() -> Self {
        Self {}
    }

    /// Bind a signature image to a signer and document.
    ///
    /// When the context carries the originating token, the signer's e-mail must
    /// match the token's secondary subject and the record is marked verified.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingSignature`] if the image is empty, does not decode or
    ///   carries no ink
    /// - [`Error::InvalidInput`] if name, e-mail, document id or hash are blank
    /// - [`Error::PurposeMismatch`] if the token was not issued for signing
    /// - [`Error::IdentityMismatch`] if the e-mail differs from the token subject
    pub fn bind(
        &self,
        image: &SignatureImage,
        signer: &Signer,
        document_id: &str,
        document_hash: &str,
        context: &SigningContext,
    ) -> Result<DigitalSignatureRecord> {
        self.build(image, signer, document_id, document_hash, context, None)
    }

    /// Bind an amendment to an existing record.
    ///
    /// The new record keeps the previous signer and document id and names the
    /// previous verification code in `supersedes`. The previous record is left
    /// untouched.
    pub fn amend(
        &self,
        previous: &DigitalSignatureRecord,
        image: &SignatureImage,
        document_hash: &str,
        context: &SigningContext,
    ) -> Result<DigitalSignatureRecord> {
        let signer = Signer::new(
            previous.signer_name.clone(),
            previous.signer_email.clone(),
            previous.signer_role,
        );
        self.build(
            image,
            &signer,
            &previous.document_id,
            document_hash,
            context,
            Some(previous.verification_code.clone()),
        )
    }

    fn build(
        &self,
        image: &SignatureImage,
        signer: &Signer,
        document_id: &str,
        document_hash: &str,
        context: &SigningContext,
        supersedes: Option<String>,
    ) -> Result<DigitalSignatureRecord> {
        if image.is_empty() || !image.has_ink() {
            log::warn!("Refused to bind a blank or unreadable signature image");
            return Err(Error::MissingSignature);
        }

        let name = signer.name.trim();
        let email = signer.email.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("signer name must not be blank".to_string()));
        }
        if !EMAIL_RE.is_match(email) {
            return Err(Error::InvalidInput(format!("'{}' is not an e-mail address", email)));
        }
        if document_id.trim().is_empty() {
            return Err(Error::InvalidInput("document id must not be blank".to_string()));
        }
        if document_hash.trim().is_empty() {
            return Err(Error::InvalidInput("document hash must not be blank".to_string()));
        }

        let is_verified = self.check_identity(email, context)?;

        let signed_at = context
            .timestamp
            .duration_trunc(chrono::Duration::milliseconds(1))
            .unwrap_or(context.timestamp);
        let code = verification_code(document_hash, email, signed_at, document_id);

        let user_agent = context.user_agent.as_deref().unwrap_or_default();
        let metadata = SignatureMetadata {
            browser_family: BrowserFamily::from_user_agent(user_agent),
            device_class: DeviceClass::from_user_agent(user_agent),
            session_id: context
                .session_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        };

        log::info!(
            "Bound {} signature for document {} (verified: {}, code {})",
            signer.role,
            document_id,
            is_verified,
            &code[..16]
        );

        Ok(DigitalSignatureRecord {
            document_id: document_id.to_string(),
            signer_name: name.to_string(),
            signer_email: email.to_string(),
            signer_role: signer.role,
            signature_image: image.to_data_uri(),
            signed_at,
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
            document_hash: document_hash.to_string(),
            verification_code: code,
            is_verified,
            metadata,
            supersedes,
        })
    }

    /// Re-check the signer against the token the ceremony was opened with.
    fn check_identity(&self, email: &str, context: &SigningContext) -> Result<bool> {
        let Some(token) = context.token.as_ref() else {
            log::debug!("No token bound to signing context, record will be unverified");
            return Ok(false);
        };

        if token.purpose != TokenPurpose::ContractSigning {
            return Err(Error::PurposeMismatch {
                expected: TokenPurpose::ContractSigning,
                found: token.purpose,
            });
        }

        if !token.secondary_subject_id.trim().eq_ignore_ascii_case(email) {
            log::warn!(
                "Signer e-mail does not match token subject {}",
                token.subject_id
            );
            return Err(Error::IdentityMismatch {
                signer: email.to_string(),
            });
        }

        Ok(true)
    }
}
