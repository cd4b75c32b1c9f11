//! TCP listener and accept loop.
use std::{
    fmt, io,
    net::{Ipv4Addr, SocketAddr},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpListener, TcpStream},
    sync::Notify,
    task::JoinHandle,
};

#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream, unix};

use crate::connection::{ConnectionError, serve_connection};
use crate::log::{debug, error, info, warning};
use crate::request::{DEFAULT_BUFFER_SIZE, ParseError};
use crate::service::Handler;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 42069;

// ===== Config =====

/// Server configuration.
#[derive(Clone, Debug)]
pub struct Config {
    port: u16,
    initial_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            initial_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Create default configuration listening on `port`.
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Set the listening port, `0` binds an ephemeral port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the initial per connection read buffer size.
    pub fn initial_buffer_size(mut self, size: usize) -> Self {
        self.initial_buffer_size = size;
        self
    }

}

// ===== Listener =====

/// Bound socket that the accept loop takes connections from.
///
/// Implemented for [`TcpListener`] and, on unix, [`UnixListener`].
pub trait Listener: Send + Sync + 'static {
    /// Accepted connection.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Address of the bound socket and of its peers.
    type Addr: fmt::Debug + Send;

    /// Returns the address this listener is bound to.
    fn local_addr(&self) -> io::Result<Self::Addr>;

    /// Poll for the next connection and its peer address.
    fn poll_accept(&self, cx: &mut Context) -> Poll<io::Result<(Self::Stream, Self::Addr)>>;
}

impl Listener for TcpListener {
    type Stream = TcpStream;
    type Addr = SocketAddr;

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }

    fn poll_accept(&self, cx: &mut Context) -> Poll<io::Result<(TcpStream, SocketAddr)>> {
        TcpListener::poll_accept(self, cx)
    }
}

#[cfg(unix)]
impl Listener for UnixListener {
    type Stream = UnixStream;
    type Addr = unix::SocketAddr;

    fn local_addr(&self) -> io::Result<unix::SocketAddr> {
        UnixListener::local_addr(self)
    }

    fn poll_accept(&self, cx: &mut Context) -> Poll<io::Result<(UnixStream, unix::SocketAddr)>> {
        UnixListener::poll_accept(self, cx)
    }
}

// ===== Server =====

/// State shared between the accept loop and [`Server::close`].
#[derive(Debug)]
struct Shared {
    running: AtomicBool,
    shutdown: Notify,
}

/// Handle to a running accept loop.
///
/// Dropping the handle does not stop the server, call [`Server::close`].
pub struct Server<A = SocketAddr> {
    addr: A,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl Server {
    /// Bind a TCP listener on all interfaces and start accepting connections.
    ///
    /// Must be called within a tokio runtime.
    pub async fn bind<H: Handler>(config: Config, handler: H) -> io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port)).await?;
        Self::from_listener(listener, config, handler)
    }
}

impl<A: fmt::Debug> Server<A> {
    /// Start accepting connections from an already bound listener.
    ///
    /// `config.port` is ignored. Must be called within a tokio runtime.
    pub fn from_listener<L, H>(listener: L, config: Config, handler: H) -> io::Result<Self>
    where
        L: Listener<Addr = A>,
        H: Handler,
    {
        let addr = listener.local_addr()?;
        info!("listening on {addr:?}");

        let shared = Arc::new(Shared {
            running: AtomicBool::new(true),
            shutdown: Notify::new(),
        });
        let task = tokio::spawn(accept_loop(
            listener,
            Arc::new(handler),
            config.initial_buffer_size,
            Arc::clone(&shared),
        ));
        Ok(Self { addr, shared, task })
    }
}

impl<A> Server<A> {

    /// Returns the bound address.
    #[inline]
    pub fn local_addr(&self) -> &A {
        &self.addr
    }

    /// Returns `false` once [`Server::close`] has been called or the accept loop has failed.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Stop accepting connections and release the listener.
    ///
    /// Connections already accepted keep running until their exchange completes. Calling this
    /// more than once has no further effect.
    pub fn close(&self) {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            self.shared.shutdown.notify_one();
        }
    }

    /// Wait until the accept loop exits, which happens after [`Server::close`] or on an accept
    /// error.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            error!("accept loop panicked: {err}");
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Server<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("addr", &self.addr)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Bind on `port` and serve every connection with `handler`.
///
/// Shorthand for `Server::bind(Config::new(port), handler)`.
pub async fn serve<H: Handler>(port: u16, handler: H) -> io::Result<Server> {
    Server::bind(Config::new(port), handler).await
}

async fn accept_loop<L, H>(listener: L, handler: Arc<H>, buffer_size: usize, shared: Arc<Shared>)
where
    L: Listener,
    H: Handler,
{
    loop {
        let accepted = tokio::select! {
            accepted = std::future::poll_fn(|cx| listener.poll_accept(cx)) => accepted,
            _ = shared.shutdown.notified() => break,
        };

        let (io, addr) = match accepted {
            Ok(ok) => ok,
            // after `close` the error is expected, otherwise the listener is unusable
            Err(err) => {
                if shared.running.swap(false, Ordering::AcqRel) {
                    error!("failed to accept connection, stopping server: {err}");
                }
                break;
            }
        };

        debug!("accepted connection from {addr:?}");

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            if let Err(err) = serve_connection(io, &*handler, buffer_size).await {
                log_connection_error(&err);
            }
        });
    }

    // listener is dropped here, closing the socket
    info!("server closed");
}

fn log_connection_error(err: &ConnectionError) {
    match err {
        ConnectionError::Parse(ParseError::Io(_)) | ConnectionError::Write(_) => {
            error!("connection fault: {err}")
        }
        ConnectionError::Parse(_) => warning!("bad request: {err}"),
        ConnectionError::Handler(_) | ConnectionError::Incomplete(_) => error!("{err}"),
    }
}
