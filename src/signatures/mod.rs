//! Electronic signature records.
//!
//! This module binds a captured signature to the signer's identity, the signed
//! document and the request context, producing an auditable record comparable
//! to a simple or advanced electronic signature.
//!
//! ## Features
//!
//! - **Binding**: combine image, signer, document hash and context into a record
//! - **Identity re-check**: signer e-mail must match the invitation token
//! - **Verification codes**: deterministic SHA-256 over the audit inputs
//! - **Auditing**: recompute codes and detect changed documents
//! - **Amendments**: append-only corrections referencing the superseded record
//!
//! ## Example
//!
//! ```ignore
//! use esign_oxide::signatures::{SignatureBinder, Signer, SignerRole, SigningContext};
//!
//! let record = SignatureBinder::new().bind(
//!     &capture.export_image()?,
//!     &Signer::new("Ada Lovelace", "a@x.com", SignerRole::Employee),
//!     "contract-42",
//!     &document_hash,
//!     &SigningContext::now().with_token(payload),
//! )?;
//! println!("verification code {}", record.short_code());
//! ```
//!
//! Qualified signatures backed by a trust service provider are out of scope.

mod binder;
mod types;
mod user_agent;
mod verifier;

pub use binder::{verification_code, SignatureBinder};
pub use types::{
    AuditResult, AuditStatus, DigitalSignatureRecord, SignatureMetadata, Signer, SignerRole,
    SigningContext,
};
pub use user_agent::{BrowserFamily, DeviceClass};
pub use verifier::RecordVerifier;
