// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::wrong_self_convention)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # esign_oxide
//!
//! Electronic signature ceremonies in Rust: purpose-scoped signing links,
//! toolkit-independent stroke capture and auditable signature records.
//!
//! ## Core Features
//!
//! ### Tokens
//! - **Authenticated encryption**: AES-256-GCM, key stretched from the process secret with Argon2id
//! - **Purpose scoping**: contract signing, e-mail verification and password reset links never cross over
//! - **Expiry**: per-purpose default validity windows, injectable clock
//! - **No oracle**: validation failures collapse to a single outcome; reasons are only logged
//!
//! ### Capture
//! - **State machine**: `Empty → Drawing → HasContent`, with `clear()` from any state
//! - **Rasterization**: smoothed strokes rendered with tiny-skia, PNG or JPEG output
//! - **No blank artifacts**: exporting an empty capture is an error
//!
//! ### Records
//! - **Binding**: signature image, signer, document hash and request context in one record
//! - **Identity re-check**: the signer must match the invited e-mail address
//! - **Verification codes**: deterministic SHA-256 for later audit
//! - **Compliance notice**: eIDAS / ESIGN / generic disclaimer before capture
//!
//! Qualified electronic signatures backed by a trust service provider are not
//! in scope.
//!
//! ## Quick Start
//!
//! ```ignore
//! use esign_oxide::api::SigningService;
//! use esign_oxide::capture::StrokePoint;
//! use esign_oxide::compliance::Jurisdiction;
//! use esign_oxide::config::TokenConfig;
//! use esign_oxide::signatures::{SignatureBinder, Signer, SignerRole};
//! use esign_oxide::tokens::TokenPolicy;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = TokenPolicy::new(&TokenConfig::from_env()?)?;
//! let service = SigningService::new(policy, SignatureBinder::new());
//!
//! let token = service.invite("u1", "a@x.com", None)?;
//! let mut ceremony = service.start(&token, Jurisdiction::Eu)?;
//! ceremony.acknowledge_notice();
//!
//! let capture = ceremony.capture_mut();
//! capture.begin_stroke(StrokePoint::new(10.0, 10.0))?;
//! capture.extend_stroke(StrokePoint::new(90.0, 40.0))?;
//! capture.end_stroke();
//!
//! let context = ceremony.context().with_ip_address("203.0.113.7");
//! let record = ceremony.finish(
//!     &Signer::new("Ada Lovelace", "a@x.com", SignerRole::Employee),
//!     "contract-42",
//!     "sha256:9f86d0...",
//!     context,
//! )?;
//! println!("{}", record.short_code());
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Signing and verification tokens
pub mod tokens;

// Stroke capture and rasterization
pub mod capture;

// Signature binding and auditing
pub mod signatures;

// Pre-capture disclaimer
pub mod compliance;

// High-level ceremony API
pub mod api;

// Re-exports
pub use api::{SigningCeremony, SigningService};
pub use capture::{SignatureCapture, SignatureImage, StrokePoint};
pub use config::TokenConfig;
pub use error::{Error, Result};
pub use signatures::{DigitalSignatureRecord, SignatureBinder, Signer, SignerRole, SigningContext};
pub use tokens::{TokenPayload, TokenPolicy, TokenPurpose};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
