//! Signature record auditing.
//!
//! This module re-derives the verification code of a stored record and checks
//! it against the document as it exists now.

use super::binder::verification_code;
use super::types::{AuditResult, AuditStatus, DigitalSignatureRecord};
use crate::capture::SignatureImage;

/// Auditor for stored signature records.
#[derive(Debug, Default)]
pub struct RecordVerifier {}

impl RecordVerifier {
    /// Create a new record verifier.
    pub fn new() -> Self {
        Self {}
    }

    /// Recompute the verification code from the record's own fields.
    pub fn recompute_code(&self, record: &DigitalSignatureRecord) -> String {
        verification_code(
            &record.document_hash,
            &record.signer_email,
            record.signed_at,
            &record.document_id,
        )
    }

    /// Audit a record against the current hash of the document.
    pub fn audit(&self, record: &DigitalSignatureRecord, current_document_hash: &str) -> AuditResult {
        let mut messages = Vec::new();

        let code_matches = self.recompute_code(record) == record.verification_code;
        if !code_matches {
            messages.push("Verification code does not match the record contents".to_string());
        }

        let document_modified = record.document_hash != current_document_hash;
        if document_modified {
            messages.push("Document has changed since it was signed".to_string());
        }

        let image_ok = SignatureImage::from_data_uri(&record.signature_image)
            .map(|image| image.has_ink())
            .unwrap_or(false);
        if !image_ok {
            messages.push("Record carries no legible signature image".to_string());
        }

        let status = if !code_matches || document_modified || !image_ok {
            AuditStatus::Invalid
        } else if !record.is_verified {
            messages.push("Signer identity was not confirmed against an invitation".to_string());
            AuditStatus::ValidWithWarnings
        } else {
            AuditStatus::Valid
        };

        log::debug!(
            "Audited record for document {}: {:?}",
            record.document_id,
            status
        );

        AuditResult {
            status,
            code_matches,
            document_modified,
            messages,
        }
    }

    /// Check a verification code presented by a third party (e.g. printed on
    /// a document) against a record, accepting the full or grouped short form.
    pub fn matches_code(&self, record: &DigitalSignatureRecord, presented: &str) -> bool {
        let normalized: String = presented
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect::<String>()
            .to_lowercase();

        normalized.len() >= 16 && record.verification_code.starts_with(&normalized)
    }
}
