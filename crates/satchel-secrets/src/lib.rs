//! # satchel-secrets
//!
//! Encrypted-at-rest storage for a single API credential.
//!
//! A [`SecretStore`] protects a plaintext byte blob with key material bound
//! to the local user identity and persists the resulting ciphertext —
//! verbatim, no framing — to a file path. The reverse operation recovers the
//! plaintext only for the same user/machine context, returned in a
//! zeroize-on-drop container.
//!
//! Protection backends plug in through the [`Protector`] trait:
//! [`KeychainProtector`] seals with AES-256-GCM under a master key held in
//! the OS keychain and works on every platform; on Windows,
//! [`DpapiProtector`] hands the bytes to the system's Data Protection API
//! directly.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use satchel_secrets::{KeychainProtector, SecretStore};
//! use secrecy::ExposeSecret;
//!
//! # fn main() -> Result<(), satchel_secrets::SecretStoreError> {
//! let store = SecretStore::new(KeychainProtector::new("satchel"));
//! let path = Path::new("credential.bin");
//!
//! store.encrypt_and_save(path, b"sk-...")?;
//!
//! let secret = store.load_and_decrypt(path)?;
//! assert_eq!(secret.expose_secret(), b"sk-...");
//! # Ok(())
//! # }
//! ```

#[cfg(windows)]
pub mod dpapi;
pub mod error;
pub mod protect;
pub mod store;

#[cfg(windows)]
pub use dpapi::DpapiProtector;
pub use error::{ProtectError, SecretStoreError};
pub use protect::{KeychainProtector, Protector};
pub use store::SecretStore;
