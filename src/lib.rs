//! HTTP/1.1 over raw TCP.
//!
//! - [`headers`], case insensitive header container and field parser
//! - [`request`], incremental request parser
//! - [`response`], ordered response writer with chunked framing and trailers
//! - [`server`], listener that runs one [`Handler`] call per connection
//!
//! ```no_run
//! use httpfromtcp::{Handler, HandlerError, request::Request};
//! use httpfromtcp::response::{ResponseWriter, StatusCode};
//! use tokio::io::AsyncWrite;
//!
//! struct Hello;
//!
//! impl Handler for Hello {
//!     async fn call<W>(&self, res: &mut ResponseWriter<W>, _: &Request) -> Result<(), HandlerError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         res.respond(StatusCode::OK, "text/plain", b"hello").await?;
//!         Ok(())
//!     }
//! }
//!
//! # async fn app() -> std::io::Result<()> {
//! let server = httpfromtcp::serve(42069, Hello).await?;
//! server.close();
//! server.join().await;
//! # Ok(())
//! # }
//! ```
#![warn(missing_debug_implementations)]

mod log;
mod matches;

pub mod headers;
pub mod request;
pub mod response;

mod service;
mod connection;
pub mod server;

pub use service::{Handler, HandlerError};
pub use connection::{ConnectionError, serve_connection};
pub use server::{Config, Server, serve};
