//! Purpose-scoped signing tokens.
//!
//! This module issues and validates the opaque credentials embedded in signing
//! and verification links.
//!
//! ## Components
//!
//! - **TokenCodec**: authenticated encode/decode (AES-256-GCM, Argon2id-derived key)
//! - **TokenPolicy**: default validity windows, expiry and purpose checks
//! - **Clock**: injectable time source for deterministic tests
//!
//! ## Example
//!
//! ```ignore
//! use esign_oxide::config::TokenConfig;
//! use esign_oxide::tokens::{TokenPolicy, TokenPurpose};
//!
//! let policy = TokenPolicy::new(&TokenConfig::from_env()?)?;
//! let token = policy.issue("u1", "a@x.com", TokenPurpose::ContractSigning, None, None)?;
//!
//! // Later, when the signer follows the link:
//! if let Some(payload) = policy.validate(&token, Some(TokenPurpose::ContractSigning)) {
//!     println!("signing as {}", payload.secondary_subject_id);
//! }
//! ```

mod clock;
mod codec;
mod kdf;
mod policy;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{TokenCodec, MAX_TOKEN_LEN, TOKEN_VERSION};
pub use kdf::{KdfParams, TokenSecret, MIN_SECRET_LEN};
pub use policy::TokenPolicy;
pub use types::{TokenClaims, TokenContext, TokenPayload, TokenPurpose};
