use super::{ParseError, RequestLine};
use crate::matches::{find_crlf, is_token};

const CRLF_LEN: usize = 2;
const HTTP_VERSION: &str = "1.1";

/// Parse request line from the start of `bytes`.
///
/// Returns `Ok(None)` if `bytes` does not contain a complete line yet, otherwise returns the
/// request line and the number of bytes consumed including the CRLF.
pub(crate) fn parse_request_line(bytes: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(end) = find_crlf(bytes) else {
        return Ok(None);
    };

    let Ok(line) = std::str::from_utf8(&bytes[..end]) else {
        return Err(ParseError::MalformedRequestLine);
    };

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::MalformedRequestLine);
    };

    if target.is_empty() {
        return Err(ParseError::MalformedRequestLine);
    }

    let Some(version) = version.strip_prefix("HTTP/") else {
        return Err(ParseError::MalformedRequestLine);
    };

    if !is_method(method) {
        return Err(ParseError::InvalidMethod);
    }

    if version != HTTP_VERSION {
        return Err(ParseError::UnsupportedVersion);
    }

    let line = RequestLine {
        method: method.to_owned(),
        target: target.to_owned(),
        version: version.to_owned(),
    };

    Ok(Some((line, end + CRLF_LEN)))
}

/// Method is a token without lowercase letters.
fn is_method(method: &str) -> bool {
    !method.is_empty()
        && method
            .bytes()
            .all(|b| is_token(b) && !b.is_ascii_lowercase())
}
