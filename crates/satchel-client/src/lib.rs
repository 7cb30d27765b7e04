//! # satchel-client
//!
//! Blocking HTTP transport for a small local API client.
//!
//! This crate performs single synchronous request/response exchanges against
//! an HTTP(S) endpoint and materializes the full response body in memory:
//! - GET with a caller-supplied header set attached verbatim
//! - JSON POST with `Content-Type` normalization
//! - Streamed body accumulation in fixed 16 KiB chunks, trimmed to the
//!   exact received length
//!
//! There is no retry policy, no concurrency and no cancellation: each call
//! blocks until the exchange completes and tears its resources down on every
//! exit path. Callers that must not block (a UI thread, say) offload the
//! call themselves.
//!
//! ## Example
//!
//! ```no_run
//! use satchel_client::{authorization_bearer, Transport};
//!
//! # fn main() -> Result<(), satchel_client::TransportError> {
//! let transport = Transport::new()?;
//! let header = authorization_bearer("sk-...");
//!
//! let body = transport.get("https://api.openai.com/v1/models", &header)?;
//! println!("{}", String::from_utf8_lossy(&body));
//! # Ok(())
//! # }
//! ```

mod body;
pub mod endpoint;
pub mod error;
pub mod headers;
mod transport;

pub use endpoint::UrlParts;
pub use error::TransportError;
pub use headers::{authorization_bearer, contains_ci, ensure_content_type, CONTENT_TYPE_JSON};
pub use transport::Transport;
