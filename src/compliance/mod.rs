//! Compliance notice shown before a signing ceremony.
//!
//! This module produces the fixed-format disclaimer a signer must see before
//! signature capture begins. It covers the purpose of the electronic
//! signature, its legal basis, the signer's responsibilities and how to
//! contest a signature.
//!
//! ## Jurisdictions
//!
//! - **EU**: Regulation (EU) No 910/2014 (eIDAS) Art. 25, GDPR
//! - **US**: ESIGN Act, UETA
//! - **Generic**: framework-neutral wording
//!
//! ## Example
//!
//! ```ignore
//! use esign_oxide::compliance::{compliance_notice, Jurisdiction};
//!
//! let notice = compliance_notice(Jurisdiction::Eu);
//! println!("{}", notice.render_text());
//! ```

mod notice;
mod types;

pub use notice::compliance_notice;
pub use types::{ComplianceNotice, Jurisdiction, NoticeSection, SectionKind, SignatureLevel};
