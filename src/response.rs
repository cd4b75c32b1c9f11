//! HTTP Response.
//!
//! [`ResponseWriter`] serializes a response directly onto its sink. Calls must follow the
//! message order:
//!
//! 1. [`write_status_line`](ResponseWriter::write_status_line)
//! 2. [`write_headers`](ResponseWriter::write_headers), then
//!    [`write_blank_line`](ResponseWriter::write_blank_line) to end the header section
//! 3. either [`write_body`](ResponseWriter::write_body), or
//!    [`write_chunked_chunk`](ResponseWriter::write_chunked_chunk) followed by
//!    [`write_chunked_done`](ResponseWriter::write_chunked_done), optional
//!    [`write_trailers`](ResponseWriter::write_trailers) and
//!    [`write_blank_line`](ResponseWriter::write_blank_line)
//! 4. [`finish`](ResponseWriter::finish)
//!
//! An out of order call returns [`WriteError::State`] without writing anything.
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::headers::Headers;

mod chunked;
mod error;
mod status;

pub use chunked::{CHUNK_TRAIL, ChunkHeader, LAST_CHUNK};
pub use error::WriteError;
pub use status::StatusCode;

#[cfg(test)]
mod test;

const CRLF: &[u8] = b"\r\n";

/// Response writing progress.
///
/// Transitions are monotonic: `StatusLine -> Headers -> Body -> Done`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriterState {
    /// Nothing written yet.
    #[default]
    StatusLine,
    /// Status line written, waiting for header fields.
    Headers,
    /// Header fields written, plain or chunked body may follow.
    Body,
    /// Message complete, nothing more may be written.
    Done,
}

/// Body framing, decided by the first body write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Framing {
    Undecided,
    Fixed,
    Chunked,
    ChunkedDone,
}

/// Ordered HTTP/1.1 response serializer bound to a single sink.
pub struct ResponseWriter<W> {
    io: W,
    state: WriterState,
    framing: Framing,
    buffer: BytesMut,
}

impl<W> ResponseWriter<W> {
    /// Create new [`ResponseWriter`] positioned at [`WriterState::StatusLine`].
    #[inline]
    pub fn new(io: W) -> Self {
        Self {
            io,
            state: WriterState::StatusLine,
            framing: Framing::Undecided,
            buffer: BytesMut::new(),
        }
    }

    /// Returns the writing progress.
    #[inline]
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Returns shared reference to the underlying sink.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.io
    }

    /// Returns the underlying sink.
    #[inline]
    pub fn into_inner(self) -> W {
        self.io
    }

    fn expect_state(&self, op: &'static str, state: WriterState) -> Result<(), WriteError> {
        if self.state != state {
            return Err(WriteError::State { op, state: self.state });
        }
        Ok(())
    }

    /// Check body state and that `op` is allowed after `allowed` framings.
    fn expect_framing(&self, op: &'static str, allowed: &[Framing]) -> Result<(), WriteError> {
        self.expect_state(op, WriterState::Body)?;
        if !allowed.contains(&self.framing) {
            return Err(WriteError::Framing { op });
        }
        Ok(())
    }
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    /// Write `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        self.expect_state("status line", WriterState::StatusLine)?;
        self.io.write_all(status.status_line().as_bytes()).await?;
        self.state = WriterState::Headers;
        Ok(())
    }

    /// Write every header as `<name>: <value>\r\n`.
    ///
    /// The blank line that ends the header section is not written, call
    /// [`write_blank_line`](Self::write_blank_line) after this.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.expect_state("headers", WriterState::Headers)?;
        self.write_fields(headers).await?;
        self.state = WriterState::Body;
        Ok(())
    }

    /// Write `\r\n`, ending the header or trailer section.
    ///
    /// Only valid before the first body write or after
    /// [`write_chunked_done`](Self::write_chunked_done), anywhere else it would corrupt the body
    /// framing.
    pub async fn write_blank_line(&mut self) -> Result<(), WriteError> {
        self.expect_framing("blank line", &[Framing::Undecided, Framing::ChunkedDone])?;
        self.io.write_all(CRLF).await?;
        Ok(())
    }

    /// Write raw body bytes without framing.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<(), WriteError> {
        self.expect_framing("body", &[Framing::Undecided, Framing::Fixed])?;
        self.framing = Framing::Fixed;
        self.io.write_all(body).await?;
        Ok(())
    }

    /// Write a single chunk as `<hex-length>\r\n<chunk>\r\n`.
    ///
    /// An empty chunk writes nothing, the zero sized chunk is reserved for
    /// [`write_chunked_done`](Self::write_chunked_done).
    pub async fn write_chunked_chunk(&mut self, chunk: &[u8]) -> Result<(), WriteError> {
        self.expect_framing("chunk", &[Framing::Undecided, Framing::Chunked])?;
        self.framing = Framing::Chunked;

        if chunk.is_empty() {
            return Ok(());
        }

        self.io.write_all(ChunkHeader::new(chunk.len()).as_bytes()).await?;
        self.io.write_all(chunk).await?;
        self.io.write_all(CHUNK_TRAIL).await?;
        Ok(())
    }

    /// Write the terminating zero sized chunk `0\r\n`.
    pub async fn write_chunked_done(&mut self) -> Result<(), WriteError> {
        self.expect_framing("last chunk", &[Framing::Undecided, Framing::Chunked])?;
        self.framing = Framing::ChunkedDone;
        self.io.write_all(LAST_CHUNK).await?;
        Ok(())
    }

    /// Write trailer fields after the last chunk.
    ///
    /// The blank line that ends the message is not written, call
    /// [`write_blank_line`](Self::write_blank_line) after this.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriteError> {
        self.expect_framing("trailers", &[Framing::ChunkedDone])?;
        self.write_fields(trailers).await
    }

    /// Write the message terminating blank line, flush, and move to [`WriterState::Done`].
    pub async fn finish(&mut self) -> Result<(), WriteError> {
        self.expect_state("end of message", WriterState::Body)?;
        self.io.write_all(CRLF).await?;
        self.io.flush().await?;
        self.state = WriterState::Done;
        Ok(())
    }

    /// Write a complete response with a fixed length body: status line, [`default_headers`],
    /// blank line, then `body`.
    ///
    /// # Panics
    ///
    /// Panics if `content_type` contains a control character.
    pub async fn respond(
        &mut self,
        status: StatusCode,
        content_type: &str,
        body: &[u8],
    ) -> Result<(), WriteError> {
        self.write_status_line(status).await?;
        self.write_headers(&default_headers(body.len(), content_type, false))
            .await?;
        self.write_blank_line().await?;
        self.write_body(body).await
    }

    async fn write_fields(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.buffer.clear();
        for (name, value) in headers {
            self.buffer.put_slice(name.as_bytes());
            self.buffer.put_slice(b": ");
            self.buffer.put_slice(value.as_bytes());
            self.buffer.put_slice(CRLF);
        }
        self.io.write_all(&self.buffer).await?;
        self.buffer.clear();
        Ok(())
    }
}

impl<W> std::fmt::Debug for ResponseWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("state", &self.state)
            .field("framing", &self.framing)
            .finish_non_exhaustive()
    }
}

/// Build default response headers.
///
/// Contains either `content-length` or `transfer-encoding: chunked`, plus `connection: close` and
/// `content-type`.
///
/// # Panics
///
/// Panics if `content_type` contains a control character.
pub fn default_headers(content_length: usize, content_type: &str, chunked: bool) -> Headers {
    let mut headers = Headers::with_capacity(3);
    if chunked {
        headers.insert("transfer-encoding", "chunked");
    } else {
        headers.insert("content-length", itoa::Buffer::new().format(content_length));
    }
    headers.insert("connection", "close");
    headers.insert("content-type", content_type);
    headers
}
