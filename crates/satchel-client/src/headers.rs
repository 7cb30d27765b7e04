//! Header-set composition.
//!
//! Headers travel through the transport as a single CRLF-delimited
//! `Name: Value` string, the same shape they take on the wire. The
//! operations here work on that text form; conversion to the HTTP layer's
//! typed header map happens only at the send boundary.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::TransportError;

/// The header line appended to a JSON POST when the caller supplied none.
pub const CONTENT_TYPE_JSON: &str = "Content-Type: application/json\r\n";

/// Case-insensitive substring search.
///
/// Compares the needle against every candidate start position of the
/// haystack, folding ASCII letters per character pair. The empty needle
/// matches any haystack.
#[must_use]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|candidate| candidate.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Ensure a JSON POST header set carries exactly one `Content-Type`.
///
/// A caller-supplied `Content-Type` (any case) wins and the set passes
/// through unchanged; otherwise [`CONTENT_TYPE_JSON`] is appended to
/// whatever was given, which may be empty. Normalizing twice yields the same
/// result as normalizing once.
#[must_use]
pub fn ensure_content_type(header_set: &str) -> std::borrow::Cow<'_, str> {
    if contains_ci(header_set, "Content-Type:") {
        std::borrow::Cow::Borrowed(header_set)
    } else {
        std::borrow::Cow::Owned(format!("{header_set}{CONTENT_TYPE_JSON}"))
    }
}

/// Format the `Authorization` header line for a bearer credential.
#[must_use]
pub fn authorization_bearer(token: &str) -> String {
    format!("Authorization: Bearer {token}\r\n")
}

/// Convert a CRLF-delimited header set into a typed header map.
///
/// Empty lines are skipped, so a trailing CRLF is fine. A line without a
/// colon, or a name or value the HTTP layer rejects, fails the whole set.
pub fn parse_header_set(header_set: &str) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for line in header_set.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| TransportError::InvalidHeader(line.to_string()))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| TransportError::InvalidHeader(line.to_string()))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| TransportError::InvalidHeader(line.to_string()))?;
        map.append(name, value);
    }
    Ok(map)
}
