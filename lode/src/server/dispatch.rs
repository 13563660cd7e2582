//! Accept/dispatch loop owned by the broadcast task.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::ServerConfig;
use crate::nmea::SentencePair;

/// Delay before the next accept after an accept error.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// One connected consumer.
#[derive(Debug)]
pub(super) struct Client {
    addr: SocketAddr,
    stream: TcpStream,
}

impl Client {
    /// Write both sentences, bounded by `deadline`.
    async fn send(&mut self, pair: &SentencePair, deadline: Duration) -> io::Result<()> {
        let write = async {
            self.stream.write_all(pair.rmc.as_bytes()).await?;
            self.stream.write_all(pair.gga.as_bytes()).await
        };
        match timeout(deadline, write).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "client write timed out")),
        }
    }
}

pub(super) type ClientSet = Arc<Mutex<Vec<Client>>>;

pub(super) struct Dispatcher {
    pub(super) config: ServerConfig,
    pub(super) listener: TcpListener,
    pub(super) queue: mpsc::UnboundedReceiver<SentencePair>,
    pub(super) clients: ClientSet,
    pub(super) cancel: CancellationToken,
}

impl Dispatcher {
    pub(super) async fn run(mut self) {
        let mut accepted: u64 = 0;
        let mut broadcasts: u64 = 0;

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    debug!("Shutdown requested");
                    break;
                }

                pair = self.queue.recv() => {
                    let Some(pair) = pair else {
                        debug!("Sentence queue closed");
                        break;
                    };
                    self.broadcast(&pair).await;
                    broadcasts += 1;
                    while let Ok(pair) = self.queue.try_recv() {
                        self.broadcast(&pair).await;
                        broadcasts += 1;
                    }
                }

                result = timeout(self.config.accept_poll, self.listener.accept()) => {
                    match result {
                        Ok(Ok((stream, addr))) => {
                            accepted += 1;
                            self.add_client(stream, addr).await;
                        }
                        Ok(Err(e)) => {
                            warn!(error = %e, "Failed to accept connection");
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        }
                        Err(_) => trace!("No new connection (accept poll timeout)"),
                    }
                }
            }
        }

        // Pairs submitted before shutdown still go out.
        while let Ok(pair) = self.queue.try_recv() {
            self.broadcast(&pair).await;
            broadcasts += 1;
        }

        let closed = self.close_all().await;
        info!(accepted, broadcasts, closed, "Broadcast server stopped");
    }

    async fn add_client(&self, stream: TcpStream, addr: SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            debug!(client = %addr, error = %e, "Failed to set TCP_NODELAY");
        }
        let mut clients = self.clients.lock().await;
        clients.push(Client { addr, stream });
        info!(client = %addr, clients = clients.len(), "Client connected");
    }

    /// Deliver one pair to every client, dropping those whose write fails.
    async fn broadcast(&self, pair: &SentencePair) {
        let mut clients = self.clients.lock().await;
        let mut delivered = Vec::with_capacity(clients.len());

        for mut client in clients.drain(..) {
            match client.send(pair, self.config.write_timeout).await {
                Ok(()) => delivered.push(client),
                Err(e) => debug!(client = %client.addr, error = %e, "Dropping client"),
            }
        }

        *clients = delivered;
        trace!(clients = clients.len(), bytes = pair.wire_len(), "Broadcast sentence pair");
    }

    /// Close every client connection. Returns how many were open.
    async fn close_all(&self) -> usize {
        let mut clients = self.clients.lock().await;
        let count = clients.len();
        for mut client in clients.drain(..) {
            if let Err(e) = client.stream.shutdown().await {
                trace!(client = %client.addr, error = %e, "Client already gone at shutdown");
            }
        }
        count
    }
}
