//! URL decomposition for request setup.

use url::Url;

use crate::error::TransportError;

/// Default port for `https` URLs that do not spell one out.
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Default port for plain `http`.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Host, path, scheme and port of a request URL.
///
/// Extracted before a non-GET request is issued. `port` falls back to the
/// scheme default when the URL carries no explicit one; `secure` is true for
/// `https`. Schemes other than `http` and `https` are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Host name or address, without port.
    pub host: String,
    /// Absolute request path (`/` when the URL names none).
    pub path: String,
    /// Whether the exchange goes over TLS.
    pub secure: bool,
    /// Effective connection port.
    pub port: u16,
    url: Url,
}

impl UrlParts {
    /// Decompose a URL string.
    pub fn parse(raw: &str) -> Result<Self, TransportError> {
        let url = Url::parse(raw)
            .map_err(|e| TransportError::InvalidUrl(format!("{raw}: {e}")))?;
        let secure = match url.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(TransportError::InvalidUrl(format!(
                    "{raw}: unsupported scheme {other:?}"
                )));
            }
        };
        let host = url
            .host_str()
            .ok_or_else(|| TransportError::InvalidUrl(format!("{raw}: missing host")))?
            .to_string();
        let port = url.port().unwrap_or(if secure {
            DEFAULT_HTTPS_PORT
        } else {
            DEFAULT_HTTP_PORT
        });
        let path = url.path().to_string();
        Ok(Self {
            host,
            path,
            secure,
            port,
            url,
        })
    }

    /// The parsed URL, handed to the HTTP layer when the request is issued.
    pub(crate) fn into_url(self) -> Url {
        self.url
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn decomposes_https_url_with_default_port() {
        let parts = UrlParts::parse("https://api.example.com/v1/models").unwrap();
        assert_eq!(parts.host, "api.example.com");
        assert_eq!(parts.path, "/v1/models");
        assert!(parts.secure);
        assert_eq!(parts.port, 443);
    }

    #[test]
    fn explicit_port_wins_over_default() {
        let parts = UrlParts::parse("https://api.example.com:8443/v1/models").unwrap();
        assert_eq!(parts.port, 8443);
    }

    #[test]
    fn plain_http_defaults_to_port_80() {
        let parts = UrlParts::parse("http://localhost/chat").unwrap();
        assert_eq!(parts.host, "localhost");
        assert_eq!(parts.path, "/chat");
        assert!(!parts.secure);
        assert_eq!(parts.port, 80);
    }

    #[test]
    fn bare_host_gets_root_path() {
        let parts = UrlParts::parse("https://api.example.com").unwrap();
        assert_eq!(parts.path, "/");
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = UrlParts::parse("ftp://example.com/file").unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = UrlParts::parse("not a url").unwrap_err();
        assert!(err.is_protocol());
    }
}
