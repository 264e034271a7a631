//! Key derivation for token sealing.
//!
//! The process secret is stretched once into a 256-bit AEAD key with Argon2id.
//! Derivation is deliberately slow, so codecs derive at construction and keep
//! the key for their lifetime.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Length of the derived AEAD key in bytes.
pub const KEY_LEN: usize = 32;

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Minimum salt length accepted by Argon2.
pub const MIN_SALT_LEN: usize = 8;

/// Process secret tokens are sealed under.
///
/// Zeroized on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct TokenSecret(Vec<u8>);

impl TokenSecret {
    /// Wrap raw secret bytes. Secrets shorter than [`MIN_SECRET_LEN`] are rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(Error::InvalidConfig(format!(
                "token secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TokenSecret").field(&"[REDACTED]").finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// 19 MiB, 2 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Create custom parameters.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Minimal cost, for tests and fixtures only.
    pub fn fast() -> Self {
        Self::new(Params::MIN_M_COST, 1, 1)
    }

    fn to_argon2(self) -> Result<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, Some(KEY_LEN))
            .map_err(|e| Error::KeyDerivation(format!("invalid Argon2 params: {}", e)))
    }
}

/// Derived AEAD key. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Derive the token key from the secret and salt with Argon2id.
pub(crate) fn derive_token_key(
    secret: &TokenSecret,
    salt: &[u8],
    params: KdfParams,
) -> Result<DerivedKey> {
    if salt.len() < MIN_SALT_LEN {
        return Err(Error::KeyDerivation(format!(
            "salt must be at least {} bytes",
            MIN_SALT_LEN
        )));
    }

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(secret.expose(), salt, &mut key)
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;

    let derived = DerivedKey(key);
    key.zeroize();
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(fill: u8) -> TokenSecret {
        TokenSecret::new(vec![fill; 32]).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(matches!(TokenSecret::new(b"short".to_vec()), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let debug = format!("{:?}", secret(7));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("7, 7"));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let k1 = derive_token_key(&secret(1), b"esign-salt", KdfParams::fast()).unwrap();
        let k2 = derive_token_key(&secret(1), b"esign-salt", KdfParams::fast()).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_derivation_depends_on_secret_and_salt() {
        let base = derive_token_key(&secret(1), b"esign-salt", KdfParams::fast()).unwrap();
        let other_secret = derive_token_key(&secret(2), b"esign-salt", KdfParams::fast()).unwrap();
        let other_salt = derive_token_key(&secret(1), b"other-salt", KdfParams::fast()).unwrap();
        assert_ne!(base.as_bytes(), other_secret.as_bytes());
        assert_ne!(base.as_bytes(), other_salt.as_bytes());
    }

    #[test]
    fn test_short_salt_rejected() {
        let result = derive_token_key(&secret(1), b"salt", KdfParams::fast());
        assert!(matches!(result, Err(Error::KeyDerivation(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = derive_token_key(&secret(1), b"esign-salt", KdfParams::new(8, 0, 1));
        assert!(matches!(result, Err(Error::KeyDerivation(_))));
    }
}
