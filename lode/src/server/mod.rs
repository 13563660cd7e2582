//! TCP broadcast server.
//!
//! Streams every submitted RMC + GGA pair to all connected clients. The
//! pacing side only ever calls [`ServerHandle::submit`], which pushes onto an
//! unbounded queue and returns immediately; a single background task owns the
//! listener, accepts connections and drains the queue.
//!
//! A write failure (or timeout) on one client drops that client and nothing
//! else: the pair still reaches every other client and later pairs are
//! dispatched as usual.
//!
//! # Example
//!
//! ```ignore
//! let server = BroadcastServer::new(ServerConfig::default()).start().await?;
//! server.submit(rmc, gga);
//! server.shutdown().await;
//! ```

mod dispatch;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::nmea::SentencePair;
use dispatch::{ClientSet, Dispatcher};

/// Default TCP port (the registered NMEA-0183 port).
pub const DEFAULT_PORT: u16 = 10110;

/// Default listen backlog.
pub const DEFAULT_BACKLOG: u32 = 5;

/// Default upper bound on one accept wait.
pub const DEFAULT_ACCEPT_POLL: Duration = Duration::from_secs(1);

/// Default per-client write deadline.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Broadcast server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// TCP port to listen on; 0 picks an ephemeral port.
    pub port: u16,

    /// Listen backlog.
    pub backlog: u32,

    /// Upper bound on one accept wait before the loop goes around again.
    pub accept_poll: Duration,

    /// A client that cannot take a whole pair within this time is dropped.
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backlog: DEFAULT_BACKLOG,
            accept_poll: DEFAULT_ACCEPT_POLL,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Default configuration on another port.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }
}

/// Error type for the broadcast server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to create, bind or listen on the TCP socket.
    #[error("Failed to bind TCP listener on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The bound address could not be read back.
    #[error("Failed to read listener address: {0}")]
    LocalAddr(#[source] io::Error),
}

/// Unstarted broadcast server.
pub struct BroadcastServer {
    config: ServerConfig,
}

impl BroadcastServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind `0.0.0.0:<port>` and spawn the accept/dispatch task.
    ///
    /// Binding happens before this returns, so a busy port is reported here
    /// rather than from the background task.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let listener = bind(&self.config)?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        info!(
            port = local_addr.port(),
            backlog = self.config.backlog,
            "Broadcast server listening"
        );

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let clients: ClientSet = Arc::new(Mutex::new(Vec::new()));
        let cancel = CancellationToken::new();

        let dispatcher = Dispatcher {
            config: self.config,
            listener,
            queue: queue_rx,
            clients: Arc::clone(&clients),
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(dispatcher.run());

        Ok(ServerHandle {
            queue: queue_tx,
            clients,
            cancel,
            task: Mutex::new(Some(task)),
            local_addr,
        })
    }
}

fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let bind_error = |source| ServerError::Bind {
        port: config.port,
        source,
    };

    let socket = TcpSocket::new_v4().map_err(bind_error)?;
    socket.set_reuseaddr(true).map_err(bind_error)?;
    socket
        .bind(SocketAddr::from(([0, 0, 0, 0], config.port)))
        .map_err(bind_error)?;
    socket.listen(config.backlog).map_err(bind_error)
}

/// Handle to a running broadcast server.
///
/// Dropping the handle stops the server; [`shutdown`](Self::shutdown) also
/// waits for every connection to be closed.
pub struct ServerHandle {
    queue: mpsc::UnboundedSender<SentencePair>,
    clients: ClientSet,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    /// Queue one RMC + GGA pair for broadcast. Never blocks.
    pub fn submit(&self, rmc: impl Into<String>, gga: impl Into<String>) {
        self.submit_pair(SentencePair::new(rmc, gga));
    }

    /// Queue an encoded pair for broadcast. Never blocks.
    ///
    /// After shutdown the pair is discarded.
    pub fn submit_pair(&self, pair: SentencePair) {
        if self.queue.send(pair).is_err() {
            trace!("Broadcast server stopped, discarding sentence pair");
        }
    }

    /// Stop the loop, close all client sockets and the listener.
    ///
    /// Pairs already queued are broadcast before the clients are closed.
    ///
    /// Safe to call more than once and from several tasks at a time; every
    /// call returns only after the dispatcher has finished.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Broadcast task ended abnormally");
            }
        }
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of currently connected clients.
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Whether shutdown has been requested.
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
