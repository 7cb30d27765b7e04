//! Blocking HTTP exchange against a remote API.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use url::Url;

use crate::body::read_streamed;
use crate::endpoint::UrlParts;
use crate::error::TransportError;
use crate::headers::{ensure_content_type, parse_header_set};

/// User-Agent advertised on every request.
const USER_AGENT: &str = concat!("satchel/", env!("CARGO_PKG_VERSION"));

/// Overall deadline for a single exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Deadline for establishing the connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A synchronous HTTP transport.
///
/// Owns one HTTP session that is reused across calls. Every operation runs
/// to completion on the calling thread and returns the full response body;
/// ownership of the returned buffer moves to the caller.
///
/// An HTTP error status is not a transport failure: the body of a 4xx/5xx
/// response is returned like any other. Only session, connection, request
/// and read failures produce an error, and a failed call never yields
/// partial data.
#[derive(Debug)]
pub struct Transport {
    client: Client,
}

impl Transport {
    /// Create a transport with the default session settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Session`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        // Connections are not kept alive between calls; each exchange
        // stands on its own.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(TransportError::Session)?;
        Ok(Self { client })
    }

    /// Issue a GET and accumulate the full response body.
    ///
    /// `extra_header` is a CRLF-delimited `Name: Value` set attached to the
    /// request verbatim; it may be empty.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable URL, a malformed header line, a connection or
    /// send failure, or a read failure partway through the body.
    pub fn get(&self, url: &str, extra_header: &str) -> Result<Vec<u8>, TransportError> {
        let target =
            Url::parse(url).map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;
        let headers = parse_header_set(extra_header)?;
        debug!("GET {url}");

        let mut response = self
            .client
            .get(target)
            .headers(headers)
            .send()
            .map_err(|e| {
                warn!("GET {url} failed: {e}");
                e
            })?;

        let body = read_streamed(&mut response)?;
        debug!("GET {url} returned {} bytes", body.len());
        Ok(body)
    }

    /// Issue a POST with a JSON payload and accumulate the full response
    /// body.
    ///
    /// The URL is decomposed into host, path, scheme and port first; the
    /// header set is normalized to carry exactly one `Content-Type` (the
    /// caller's wins, otherwise `application/json` is appended). An empty
    /// body is permitted.
    ///
    /// # Errors
    ///
    /// Fails on URL decomposition, a malformed header line, a connection or
    /// send failure, or a read failure partway through the body.
    pub fn post_json(
        &self,
        url: &str,
        extra_header: &str,
        json_body: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let parts = UrlParts::parse(url)?;
        let header_set = ensure_content_type(extra_header);
        let headers = parse_header_set(&header_set)?;
        debug!(
            "POST {} (host {}, port {}, secure {})",
            parts.path, parts.host, parts.port, parts.secure
        );

        let mut response = self
            .client
            .post(parts.into_url())
            .headers(headers)
            .body(json_body.to_owned())
            .send()
            .map_err(|e| {
                warn!("POST {url} failed: {e}");
                e
            })?;

        let body = read_streamed(&mut response)?;
        debug!("POST {url} returned {} bytes", body.len());
        Ok(body)
    }
}
