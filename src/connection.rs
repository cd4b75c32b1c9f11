//! Single request/response cycle over one connection.
use std::fmt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::request::{ParseError, Request};
use crate::response::{ResponseWriter, StatusCode, WriteError, WriterState};
use crate::service::{Handler, HandlerError};

/// Serve exactly one request on `io`, then shut it down.
///
/// - A malformed request is answered with `400 Bad Request`.
/// - A peer that closes without sending anything is not an error.
/// - A [`HandlerError`] returned before anything was written is answered with its status and
///   message, a handler that writes nothing is answered with `500 Internal Server Error`.
///
/// Errors are returned for the caller to log, the connection is closed either way.
pub async fn serve_connection<IO, H>(
    mut io: IO,
    handler: &H,
    buffer_size: usize,
) -> Result<(), ConnectionError>
where
    IO: AsyncRead + AsyncWrite + Unpin + Send,
    H: Handler,
{
    let result = respond(&mut io, handler, buffer_size).await;
    let shutdown = io.shutdown().await;

    match result {
        // shutdown fault only matters when the exchange itself succeeded
        Ok(()) => shutdown.map_err(|err| ConnectionError::Write(err.into())),
        Err(err) => Err(err),
    }
}

async fn respond<IO, H>(io: &mut IO, handler: &H, buffer_size: usize) -> Result<(), ConnectionError>
where
    IO: AsyncRead + AsyncWrite + Unpin + Send,
    H: Handler,
{
    let request = Request::from_reader_with_capacity(&mut *io, buffer_size).await;
    let mut res = ResponseWriter::new(&mut *io);

    let request = match request {
        Ok(ok) => ok,
        Err(ParseError::Closed) => return Ok(()),
        Err(err) if err.is_malformed() => {
            let body = format!("{err}\n");
            res.respond(StatusCode::BAD_REQUEST, "text/plain", body.as_bytes()).await?;
            res.finish().await?;
            return Err(ConnectionError::Parse(err));
        }
        Err(err) => return Err(ConnectionError::Parse(err)),
    };

    let outcome = handler.call(&mut res, &request).await;

    let handler_error = match outcome {
        Ok(()) if res.state() == WriterState::StatusLine => {
            res.respond(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", b"no response\n")
                .await?;
            None
        }
        Ok(()) => None,
        Err(err) => {
            if res.state() == WriterState::StatusLine {
                let body = format!("{}\n", err.message());
                res.respond(err.status(), "text/plain", body.as_bytes()).await?;
            }
            Some(err)
        }
    };

    match res.state() {
        WriterState::Body => res.finish().await?,
        WriterState::Done => {}
        state => {
            return Err(match handler_error {
                Some(err) => ConnectionError::Handler(err),
                None => ConnectionError::Incomplete(state),
            });
        }
    }

    match handler_error {
        Some(err) => Err(ConnectionError::Handler(err)),
        None => Ok(()),
    }
}

// ===== Error =====

/// An error that ended a connection.
#[derive(Debug)]
pub enum ConnectionError {
    /// Request could not be parsed, a `400` was sent when the request was malformed.
    Parse(ParseError),
    /// Response could not be written.
    Write(WriteError),
    /// Handler returned an error.
    Handler(HandlerError),
    /// Handler returned without completing the response head.
    Incomplete(WriterState),
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Write(err) => Some(err),
            Self::Handler(err) => Some(err),
            Self::Incomplete(_) => None,
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "error while parsing request: {err}"),
            Self::Write(err) => write!(f, "error while writing response: {err}"),
            Self::Handler(err) => write!(f, "handler error: {err}"),
            Self::Incomplete(state) => {
                write!(f, "handler returned with incomplete response, writer state: {state:?}")
            }
        }
    }
}

impl From<WriteError> for ConnectionError {
    fn from(v: WriteError) -> Self {
        Self::Write(v)
    }
}
