//! Error types for the transport.

use thiserror::Error;

/// Errors that can occur while performing a request/response exchange.
///
/// The transport reports plain success or failure to its callers; these
/// variants exist so the implementation can tell an I/O failure from a
/// request-composition failure in logs and tests. Callers that only need the
/// pass/fail contract collapse the result with [`Result::is_ok`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The HTTP session could not be constructed.
    #[error("session error: {0}")]
    Session(#[source] reqwest::Error),

    /// The request URL could not be parsed, or uses a scheme the transport
    /// does not speak.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A line in the caller-supplied header set is not a valid
    /// `Name: Value` pair.
    #[error("invalid header line: {0:?}")]
    InvalidHeader(String),

    /// The connection could not be established or the request could not be
    /// sent.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A chunk read failed partway through the response body. Any data
    /// accumulated before the failure has been discarded.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

impl TransportError {
    /// Check if this is a socket-level failure (connect, send, body read).
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Read(_))
    }

    /// Check if this is a request-composition failure (URL or header set).
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::InvalidHeader(_))
    }
}
