//! High-level API for running signing ceremonies.
//!
//! This module ties the token policy, compliance notice, stroke capture and
//! signature binder together in the order a ceremony runs:
//!
//! 1. Host issues an invitation token for an authenticated subject
//! 2. Signer returns with the token; it is validated for `contract_signing`
//! 3. The compliance notice is shown and acknowledged
//! 4. Pointer input is fed into the capture
//! 5. The token is re-validated and the signature is bound into a record
//!
//! ## Quick Start
//!
//! ```ignore
//! use esign_oxide::api::SigningService;
//! use esign_oxide::compliance::Jurisdiction;
//! use esign_oxide::signatures::{SignatureBinder, Signer, SignerRole};
//! use esign_oxide::tokens::TokenPolicy;
//!
//! let service = SigningService::new(TokenPolicy::new(&config)?, SignatureBinder::new());
//! let token = service.invite("u1", "a@x.com", None)?;
//!
//! let mut ceremony = service.start(&token, Jurisdiction::Eu)?;
//! show(ceremony.notice());
//! ceremony.acknowledge_notice();
//! feed_pointer_events(ceremony.capture_mut());
//!
//! let record = ceremony.finish(
//!     &Signer::new("Ada Lovelace", "a@x.com", SignerRole::Employee),
//!     "contract-42",
//!     &document_hash,
//!     ceremony.context().with_ip_address(ip).with_user_agent(ua),
//! )?;
//! persist(record);
//! ```

mod ceremony;

pub use ceremony::{SigningCeremony, SigningService};
