use std::fmt;
use tokio::io::AsyncWrite;

use crate::request::Request;
use crate::response::{ResponseWriter, StatusCode, WriteError};

// ===== Handler =====

/// Request handler invoked once per connection.
///
/// The writer is positioned at [`WriterState::StatusLine`] and the request is fully parsed. The
/// handler chooses status, headers and body framing, and must call the writer in message order.
/// The connection writes the message terminating blank line and closes after the handler
/// returns.
///
/// ```rust
/// use httpfromtcp::{Handler, HandlerError, request::Request};
/// use httpfromtcp::response::{ResponseWriter, StatusCode};
/// use tokio::io::AsyncWrite;
///
/// struct Hello;
///
/// impl Handler for Hello {
///     async fn call<W>(&self, res: &mut ResponseWriter<W>, req: &Request) -> Result<(), HandlerError>
///     where
///         W: AsyncWrite + Unpin + Send,
///     {
///         if req.target() == "/teapot" {
///             return Err(HandlerError::new(StatusCode::BAD_REQUEST, "no coffee here"));
///         }
///         res.respond(StatusCode::OK, "text/plain", b"hello").await?;
///         Ok(())
///     }
/// }
/// ```
///
/// [`WriterState::StatusLine`]: crate::response::WriterState::StatusLine
pub trait Handler: Send + Sync + 'static {
    fn call<W>(
        &self,
        res: &mut ResponseWriter<W>,
        req: &Request,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}

// ===== HandlerError =====

/// Error returned from [`Handler::call`].
///
/// If nothing was written yet, the connection answers with `status` and `message` as a
/// `text/plain` body.
#[derive(Debug)]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for HandlerError {}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl From<WriteError> for HandlerError {
    fn from(err: WriteError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}
