use std::{fmt, io};

use crate::headers::HeaderError;

/// An error that can occur while parsing a request.
#[derive(Debug)]
pub enum ParseError {
    /// Request line is not `METHOD SP TARGET SP HTTP/VERSION`.
    MalformedRequestLine,
    /// Method contains a lowercase letter or a non token character.
    InvalidMethod,
    /// Version other than `HTTP/1.1`.
    UnsupportedVersion,
    /// Malformed header field.
    Header(HeaderError),
    /// More body bytes arrived than `Content-Length` declared.
    BodyTooLong { declared: usize, received: usize },
    /// Stream ended before `Content-Length` bytes of body arrived.
    LengthMismatch { declared: usize, received: usize },
    /// Stream ended in the middle of the request head.
    UnexpectedEof,
    /// Stream ended before any byte was received.
    Closed,
    /// Parser already finished, no further data expected.
    Done,
    /// Read fault.
    Io(io::Error),
}

impl ParseError {
    /// Returns `true` if the peer sent a message that can be answered with `400 Bad Request`.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Closed | Self::Done | Self::Io(_))
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Header(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequestLine => f.write_str("malformed http request line"),
            Self::InvalidMethod => f.write_str("method is not uppercase"),
            Self::UnsupportedVersion => f.write_str("unsupported http version"),
            Self::Header(err) => write!(f, "malformed header: {err}"),
            Self::BodyTooLong { declared, received } => {
                write!(f, "body is too long, content-length: {declared}, received: {received}")
            }
            Self::LengthMismatch { declared, received } => write!(
                f,
                "content length does not match body, content-length: {declared}, received: {received}"
            ),
            Self::UnexpectedEof => f.write_str("connection closed in the middle of request head"),
            Self::Closed => f.write_str("connection closed before request"),
            Self::Done => f.write_str("trying to read data in done state"),
            Self::Io(err) => write!(f, "error when reading: {err}"),
        }
    }
}

impl From<HeaderError> for ParseError {
    fn from(v: HeaderError) -> Self {
        Self::Header(v)
    }
}

impl From<io::Error> for ParseError {
    fn from(v: io::Error) -> Self {
        Self::Io(v)
    }
}
