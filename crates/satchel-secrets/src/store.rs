//! Encrypted credential persistence.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::{debug, warn};
use secrecy::SecretSlice;

use crate::error::SecretStoreError;
use crate::protect::Protector;

/// Persists a secret as a protected blob at a file path.
///
/// The store never writes plaintext: the only bytes that reach disk are the
/// ciphertext output of the protection backend, stored verbatim with no
/// header, versioning or length prefix. A blob is only readable in the
/// user/machine context that produced it.
pub struct SecretStore<P: Protector> {
    protector: P,
}

impl<P: Protector> SecretStore<P> {
    /// Create a store over the given protection backend.
    pub const fn new(protector: P) -> Self {
        Self { protector }
    }

    /// Encrypt `data` and write the resulting blob to `path`.
    ///
    /// An existing file is truncated. Failure leaves no guarantees about
    /// `path`: a half-written file may remain, and will fail to decrypt.
    ///
    /// # Errors
    ///
    /// [`SecretStoreError::ProtectionFailed`] if the backend rejects the
    /// plaintext, [`SecretStoreError::FileUnwritable`] if the file cannot be
    /// created or written in full.
    pub fn encrypt_and_save(&self, path: &Path, data: &[u8]) -> Result<(), SecretStoreError> {
        let blob = self
            .protector
            .protect(data)
            .map_err(SecretStoreError::ProtectionFailed)?;

        let mut file = File::create(path).map_err(|source| SecretStoreError::FileUnwritable {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(&blob)
            .map_err(|source| SecretStoreError::FileUnwritable {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("saved {} protected bytes to {}", blob.len(), path.display());
        Ok(())
    }

    /// Read the blob at `path` and recover the plaintext.
    ///
    /// The returned buffer's length is exactly the recovered data's length
    /// (never the ciphertext's), and its contents are wiped when it is
    /// dropped. Reading requires `expose_secret()`.
    ///
    /// # Errors
    ///
    /// [`SecretStoreError::FileUnreadable`] if the file cannot be read,
    /// [`SecretStoreError::UnprotectionFailed`] if the blob was protected
    /// under a different user context or is corrupted.
    pub fn load_and_decrypt(&self, path: &Path) -> Result<SecretSlice<u8>, SecretStoreError> {
        let blob = std::fs::read(path).map_err(|source| SecretStoreError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let plaintext = self.protector.unprotect(&blob).map_err(|e| {
            warn!("cannot unprotect {}: {e}", path.display());
            SecretStoreError::UnprotectionFailed(e)
        })?;

        debug!(
            "recovered {} plaintext bytes from {}",
            plaintext.len(),
            path.display()
        );
        Ok(SecretSlice::from(plaintext))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use secrecy::ExposeSecret;

    use super::*;
    use crate::error::ProtectError;
    use crate::protect::{seal, unseal, KEY_SIZE};

    /// Deterministic protector keyed per simulated user context.
    struct ContextProtector {
        key: [u8; KEY_SIZE],
    }

    impl ContextProtector {
        fn for_context(context: u8) -> Self {
            Self {
                key: [context; KEY_SIZE],
            }
        }
    }

    impl Protector for ContextProtector {
        fn protect(&self, plaintext: &[u8]) -> Result<Vec<u8>, ProtectError> {
            seal(&self.key, &[0x24; 12], plaintext)
        }

        fn unprotect(&self, blob: &[u8]) -> Result<Vec<u8>, ProtectError> {
            unseal(&self.key, blob)
        }
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential.bin");
        let store = SecretStore::new(ContextProtector::for_context(1));

        store.encrypt_and_save(&path, b"sk-test-credential-1234").unwrap();
        let secret = store.load_and_decrypt(&path).unwrap();
        assert_eq!(secret.expose_secret(), b"sk-test-credential-1234");
    }

    #[test]
    fn empty_secret_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        let store = SecretStore::new(ContextProtector::for_context(1));

        store.encrypt_and_save(&path, b"").unwrap();
        let secret = store.load_and_decrypt(&path).unwrap();
        assert!(secret.expose_secret().is_empty());
    }

    #[test]
    fn plaintext_never_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential.bin");
        let store = SecretStore::new(ContextProtector::for_context(1));

        let secret = b"sk-test-credential-1234";
        store.encrypt_and_save(&path, secret).unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert!(!on_disk.windows(secret.len()).any(|w| w == secret));
    }

    #[test]
    fn overwrites_an_existing_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential.bin");
        let store = SecretStore::new(ContextProtector::for_context(1));

        store.encrypt_and_save(&path, b"first").unwrap();
        store.encrypt_and_save(&path, b"second").unwrap();
        let secret = store.load_and_decrypt(&path).unwrap();
        assert_eq!(secret.expose_secret(), b"second");
    }

    #[test]
    fn blob_from_another_context_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential.bin");

        SecretStore::new(ContextProtector::for_context(1))
            .encrypt_and_save(&path, b"sk-test")
            .unwrap();

        let err = SecretStore::new(ContextProtector::for_context(2))
            .load_and_decrypt(&path)
            .unwrap_err();
        assert!(err.is_crypto());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::new(ContextProtector::for_context(1));

        let err = store
            .load_and_decrypt(&dir.path().join("absent.bin"))
            .unwrap_err();
        assert!(err.is_io());
        assert!(matches!(err, SecretStoreError::FileUnreadable { .. }));
    }

    #[test]
    fn corrupted_blob_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential.bin");
        std::fs::write(&path, b"not a protected blob").unwrap();

        let err = SecretStore::new(ContextProtector::for_context(1))
            .load_and_decrypt(&path)
            .unwrap_err();
        assert!(matches!(err, SecretStoreError::UnprotectionFailed(_)));
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::new(ContextProtector::for_context(1));

        // The directory itself cannot be opened as a file for writing.
        let err = store.encrypt_and_save(dir.path(), b"sk-test").unwrap_err();
        assert!(err.is_io());
        assert!(matches!(err, SecretStoreError::FileUnwritable { .. }));
    }
}
