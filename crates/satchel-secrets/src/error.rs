//! Error types for the secret store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a protection backend.
///
/// Backends collapse their platform detail into a message; the store maps
/// the failure onto the protect or unprotect side of its own taxonomy.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProtectError {
    message: String,
}

impl ProtectError {
    /// Wrap a backend failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while persisting or recovering a secret.
///
/// The store reports plain success or failure to its callers; these
/// variants keep the filesystem-versus-cryptography distinction for logs
/// and tests. Callers that only need the pass/fail contract collapse the
/// result with [`Result::is_ok`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SecretStoreError {
    /// The blob file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    FileUnreadable {
        /// Path of the blob file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The blob file could not be created or written in full.
    #[error("cannot write {}: {source}", path.display())]
    FileUnwritable {
        /// Path of the blob file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The protection service rejected the plaintext.
    #[error("protection failed: {0}")]
    ProtectionFailed(#[source] ProtectError),

    /// The protection service rejected the blob: it was protected under a
    /// different user context, or it is corrupted.
    #[error("unprotection failed: {0}")]
    UnprotectionFailed(#[source] ProtectError),
}

impl SecretStoreError {
    /// Check if this is a filesystem failure.
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileUnreadable { .. } | Self::FileUnwritable { .. }
        )
    }

    /// Check if this is a protection-service failure.
    pub const fn is_crypto(&self) -> bool {
        matches!(self, Self::ProtectionFailed(_) | Self::UnprotectionFailed(_))
    }
}
