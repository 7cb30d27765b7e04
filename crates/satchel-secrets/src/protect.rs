//! Protection backends.
//!
//! A [`Protector`] turns plaintext into a confidential blob bound to the
//! current user's OS identity, and back. No key material is managed by the
//! caller. [`KeychainProtector`] works on every platform by sealing with
//! AES-256-GCM under a master key held in the OS keychain; on Windows the
//! DPAPI backend in [`crate::dpapi`] transforms bytes through the system
//! service directly.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use keyring::Entry;
use log::debug;
use rand::RngCore;

use crate::error::ProtectError;

/// AES-256-GCM key size in bytes.
pub(crate) const KEY_SIZE: usize = 32;

/// AES-GCM nonce size in bytes.
const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes.
const TAG_SIZE: usize = 16;

/// Minimum sealed blob: nonce plus tag around an empty plaintext.
const MIN_SEALED_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// A user-scoped confidentiality transform.
///
/// Implementations encrypt with key material bound to the current user or
/// machine identity; a blob protected in one context fails to unprotect in
/// another. Plaintext never leaves the process through an implementation.
pub trait Protector {
    /// Encrypt `plaintext` into an opaque blob.
    fn protect(&self, plaintext: &[u8]) -> Result<Vec<u8>, ProtectError>;

    /// Recover the plaintext from a blob produced by [`Protector::protect`].
    fn unprotect(&self, blob: &[u8]) -> Result<Vec<u8>, ProtectError>;
}

/// Protection through a keychain-held master key.
///
/// A 256-bit master key is created on first use and stored in the OS
/// keychain under the given service label, so the key is guarded by the
/// user's login identity rather than by anything on disk. Data is sealed as
/// `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
pub struct KeychainProtector {
    service: String,
}

impl KeychainProtector {
    /// Keychain account name holding the master key.
    const KEY_ACCOUNT: &'static str = "master-key";

    /// Create a protector whose master key lives under `service` in the OS
    /// keychain. The label also disambiguates the blob owner in keychain
    /// tooling; it carries no semantic weight.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Load the master key, creating and storing a fresh one on first use.
    fn master_key(&self) -> Result<[u8; KEY_SIZE], ProtectError> {
        let entry = Entry::new(&self.service, Self::KEY_ACCOUNT)
            .map_err(|e| ProtectError::new(format!("keychain entry: {e}")))?;
        match entry.get_password() {
            Ok(encoded) => {
                let bytes = BASE64
                    .decode(encoded)
                    .map_err(|e| ProtectError::new(format!("stored master key: {e}")))?;
                bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| ProtectError::new("stored master key has the wrong length"))
            }
            Err(keyring::Error::NoEntry) => {
                let mut key = [0u8; KEY_SIZE];
                rand::thread_rng().fill_bytes(&mut key);
                entry
                    .set_password(&BASE64.encode(key))
                    .map_err(|e| ProtectError::new(format!("keychain store: {e}")))?;
                debug!("created master key under keychain service {}", self.service);
                Ok(key)
            }
            Err(e) => Err(ProtectError::new(format!("keychain read: {e}"))),
        }
    }
}

impl Protector for KeychainProtector {
    fn protect(&self, plaintext: &[u8]) -> Result<Vec<u8>, ProtectError> {
        let key = self.master_key()?;
        let mut nonce = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce);
        seal(&key, &nonce, plaintext)
    }

    fn unprotect(&self, blob: &[u8]) -> Result<Vec<u8>, ProtectError> {
        let key = self.master_key()?;
        unseal(&key, blob)
    }
}

/// Seal `plaintext` as `nonce || ciphertext || tag`.
pub(crate) fn seal(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, ProtectError> {
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| ProtectError::new("invalid key size"))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| ProtectError::new("encryption failed"))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Reverse [`seal`]. Rejects blobs too short to carry a nonce and tag, and
/// any blob whose authentication tag does not verify under `key`.
pub(crate) fn unseal(key: &[u8; KEY_SIZE], sealed: &[u8]) -> Result<Vec<u8>, ProtectError> {
    if sealed.len() < MIN_SEALED_SIZE {
        return Err(ProtectError::new("blob too short"));
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| ProtectError::new("invalid key size"))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| ProtectError::new("decryption failed"))
}
