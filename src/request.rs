//! HTTP Request.
//!
//! [`Request::from_reader`] drives an incremental parser over a byte stream. Bytes are read into
//! a growable buffer, then handed to [`Request::parse`] which consumes as much as the current
//! [`ParseState`] allows. Unconsumed bytes stay buffered until the next read completes them, so
//! lines and bodies may be split across reads at arbitrary boundaries.
use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::headers::Headers;

mod buffer;
mod error;
mod parser;

pub use error::ParseError;

use buffer::ReadBuffer;
use parser::parse_request_line;


/// Initial read buffer size, the buffer doubles whenever it fills up.
pub const DEFAULT_BUFFER_SIZE: usize = 8;

/// Request parsing progress.
///
/// Transitions are monotonic: `Init -> ParsingHeaders -> ParsingBody -> Done`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseState {
    /// Waiting for the request line.
    #[default]
    Init,
    /// Request line parsed, waiting for header fields.
    ParsingHeaders,
    /// Header section ended, waiting for `Content-Length` bytes of body.
    ParsingBody,
    /// Request is complete.
    Done,
}

/// HTTP request line, e.g: `GET /index.html HTTP/1.1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    /// Returns the method, e.g: `"GET"`.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request target as sent by the client.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the version without the `HTTP/` prefix, always `"1.1"` once parsed.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// HTTP Request.
#[derive(Debug, Default)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: Bytes,
    state: ParseState,
}

impl Request {
    /// Create an empty request in the [`ParseState::Init`] state.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a single request from `reader`.
    ///
    /// Reading stops as soon as the request is complete, bytes after the declared body are left
    /// unread.
    pub async fn from_reader<R>(reader: R) -> Result<Self, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        Self::from_reader_with_capacity(reader, DEFAULT_BUFFER_SIZE).await
    }

    /// Same as [`Request::from_reader`] with the given initial buffer size.
    pub async fn from_reader_with_capacity<R>(
        mut reader: R,
        capacity: usize,
    ) -> Result<Self, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut request = Self::new();
        let mut buffer = ReadBuffer::with_capacity(capacity);
        let mut received = 0;

        while !request.is_done() {
            let read = buffer.read_from(&mut reader).await?;

            if read == 0 {
                request.end_of_stream(received, buffer.filled().len())?;
                break;
            }

            received += read;

            let parsed = request.parse(buffer.filled())?;
            buffer.consume(parsed);
        }

        let declared = request.content_length();
        if declared != request.body.len() {
            return Err(ParseError::LengthMismatch {
                declared,
                received: request.body.len(),
            });
        }

        Ok(request)
    }

    /// Feed bytes to the parser.
    ///
    /// Returns the number of bytes consumed from the start of `data`. The caller must keep the
    /// unconsumed bytes and prepend them to the next call. Returns `0` when more bytes are
    /// required to make progress.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Done`] if the request is already complete.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::Done);
        }

        let mut parsed = 0;
        while !self.is_done() {
            let n = self.parse_single(&data[parsed..])?;
            if n == 0 {
                break;
            }
            parsed += n;
        }

        Ok(parsed)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Init => {
                let Some((line, read)) = parse_request_line(data)? else {
                    return Ok(0);
                };
                self.request_line = line;
                self.state = ParseState::ParsingHeaders;
                Ok(read)
            }
            ParseState::ParsingHeaders => {
                let (read, done) = self.headers.parse(data)?;
                if done {
                    self.state = ParseState::ParsingBody;
                }
                Ok(read)
            }
            ParseState::ParsingBody => {
                let declared = self.content_length();
                if declared == 0 {
                    self.state = ParseState::Done;
                    return Ok(0);
                }

                if data.len() < declared {
                    return Ok(0);
                }

                if data.len() > declared {
                    return Err(ParseError::BodyTooLong {
                        declared,
                        received: data.len(),
                    });
                }

                self.body = Bytes::copy_from_slice(data);
                self.state = ParseState::Done;
                Ok(declared)
            }
            ParseState::Done => Err(ParseError::Done),
        }
    }

    /// `received` is the total bytes read so far, `pending` is the unconsumed part of it.
    fn end_of_stream(&self, received: usize, pending: usize) -> Result<(), ParseError> {
        match self.state {
            ParseState::Init if received == 0 => Err(ParseError::Closed),
            ParseState::Init | ParseState::ParsingHeaders => Err(ParseError::UnexpectedEof),
            // a complete body would have been consumed already
            ParseState::ParsingBody => Err(ParseError::LengthMismatch {
                declared: self.content_length(),
                received: pending,
            }),
            ParseState::Done => Ok(()),
        }
    }
}

impl Request {
    /// Returns the parsing progress.
    #[inline]
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Returns `true` if parsing is complete.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// Returns shared reference to [`RequestLine`].
    #[inline]
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    /// Shorthand for `request_line().method()`.
    #[inline]
    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    /// Shorthand for `request_line().target()`.
    #[inline]
    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    /// Shorthand for `request_line().version()`.
    #[inline]
    pub fn version(&self) -> &str {
        self.request_line.version()
    }

    /// Returns shared reference to [`Headers`].
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the message body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the declared `Content-Length`.
    ///
    /// A missing or non numeric value is treated as `0`.
    pub fn content_length(&self) -> usize {
        self.headers
            .get("content-length")
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }
}
