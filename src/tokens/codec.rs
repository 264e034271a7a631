//! Authenticated token encoding.
//!
//! Tokens are sealed with AES-256-GCM under a key derived from the process
//! secret. The encoded form is
//!
//! ```text
//! base64url( version (1) || nonce (12) || tag (16) || ciphertext )
//! ```
//!
//! The version byte is bound as associated data. A fresh random nonce is drawn
//! for every token, so identical claims never produce identical tokens.

use std::sync::Arc;

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, DurationRound};
use rand::rngs::OsRng;
use rand::RngCore;

use super::clock::{Clock, SystemClock};
use super::kdf::derive_token_key;
use super::types::{TokenClaims, TokenPayload};
use crate::config::TokenConfig;
use crate::error::{Error, Result};

/// Current token format version.
pub const TOKEN_VERSION: u8 = 1;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Bytes preceding the ciphertext.
pub const HEADER_LEN: usize = 1 + NONCE_LEN + TAG_LEN;

/// Longest encoded token accepted by [`TokenCodec::decode`].
pub const MAX_TOKEN_LEN: usize = 4096;

/// Encodes claims into opaque tokens and authenticates them back.
#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec, deriving the sealing key from the configured secret.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        let key = derive_token_key(&config.secret, &config.salt, config.kdf)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| Error::KeyDerivation(format!("invalid key length: {}", e)))?;

        Ok(Self {
            cipher,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The codec's time source.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Stamp the claims with `now` and `now + validity` and seal them.
    ///
    /// Validity must be at least one second and the resulting expiry must be
    /// representable; timestamps carry second precision.
    pub fn encode(&self, claims: TokenClaims, validity: Duration) -> Result<String> {
        if validity < Duration::seconds(1) {
            return Err(Error::InvalidValidity(validity.num_seconds()));
        }

        let now = self.clock.now();
        let issued_at = now.duration_trunc(Duration::seconds(1)).unwrap_or(now);
        let expires_at = issued_at
            .checked_add_signed(validity)
            .ok_or(Error::InvalidValidity(validity.num_seconds()))?;
        let payload = claims.stamp(issued_at, expires_at);

        self.encode_payload(&payload)
    }

    /// Seal an already-stamped payload.
    pub fn encode_payload(&self, payload: &TokenPayload) -> Result<String> {
        payload
            .check_invariants()
            .map_err(|e| Error::EncodingFailure(e.to_string()))?;

        let plaintext =
            serde_json::to_vec(payload).map_err(|e| Error::EncodingFailure(e.to_string()))?;

        let token = self.seal(plaintext)?;
        log::debug!(
            "Encoded {} token for subject {} ({} chars)",
            payload.purpose,
            payload.subject_id,
            token.len()
        );
        Ok(token)
    }

    /// Authenticate and decode a token.
    ///
    /// Expiry and purpose are not checked here; see [`super::TokenPolicy`].
    pub fn decode(&self, token: &str) -> Result<TokenPayload> {
        let plaintext = self.open(token)?;

        let payload: TokenPayload = serde_json::from_slice(&plaintext)
            .map_err(|e| Error::CorruptPayload(e.to_string()))?;
        payload.check_invariants()?;

        Ok(payload)
    }

    fn seal(&self, mut buffer: Vec<u8>) -> Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), &[TOKEN_VERSION], &mut buffer)
            .map_err(|e| Error::EncodingFailure(format!("encryption failed: {}", e)))?;

        let mut raw = Vec::with_capacity(HEADER_LEN + buffer.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(tag.as_slice());
        raw.extend_from_slice(&buffer);

        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    fn open(&self, token: &str) -> Result<Vec<u8>> {
        if token.is_empty() {
            return Err(Error::MalformedToken("empty token".to_string()));
        }
        if token.len() > MAX_TOKEN_LEN {
            return Err(Error::MalformedToken(format!("token longer than {} chars", MAX_TOKEN_LEN)));
        }

        let raw = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|e| Error::MalformedToken(e.to_string()))?;

        if raw.len() <= HEADER_LEN {
            return Err(Error::MalformedToken(format!("token too short: {} bytes", raw.len())));
        }

        let (version, rest) = raw.split_at(1);
        if version[0] != TOKEN_VERSION {
            return Err(Error::MalformedToken(format!("unsupported version {}", version[0])));
        }

        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let mut buffer = ciphertext.to_vec();
        self.cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                version,
                &mut buffer,
                Tag::from_slice(tag),
            )
            .map_err(|_| Error::TamperedToken)?;

        Ok(buffer)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("cipher", &"AES-256-GCM [REDACTED]")
            .finish()
    }
}
