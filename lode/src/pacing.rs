//! Wall-clock pacing of generated fixes.
//!
//! The pacing loop pulls one [`Position`] at a time from a [`Generator`],
//! hands the encoded sentence pair to the broadcast server and then holds for
//! the position's `duration`. Positions with a manual transition additionally
//! wait on an [`AdvanceGate`] before the next fix is produced.
//!
//! Every way out of [`PacingLoop::run`] (exhaustion, cancellation, a closed
//! gate) shuts the server down before returning.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::generator::Generator;
use crate::nmea::encode_pair;
use crate::position::Position;
use crate::server::ServerHandle;

/// Holds shorter than this are skipped.
const MIN_SLEEP: Duration = Duration::from_millis(1);

/// Source of the "move on" signal for manual transitions.
pub trait AdvanceGate: Send {
    /// Wait until advancing is allowed.
    ///
    /// Resolves to `false` when no signal can ever arrive (e.g. the input
    /// was closed); the pacing loop then stops.
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Gate that never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAdvance;

impl AdvanceGate for ImmediateAdvance {
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async { true })
    }
}

/// Gate opened once per message on a channel.
///
/// Dropping every sender closes the gate.
#[derive(Debug)]
pub struct ChannelAdvance {
    rx: mpsc::Receiver<()>,
}

impl ChannelAdvance {
    pub fn new(rx: mpsc::Receiver<()>) -> Self {
        Self { rx }
    }

    /// Create a gate together with the sender that opens it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }
}

impl AdvanceGate for ChannelAdvance {
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move { self.rx.recv().await.is_some() })
    }
}

/// Why the pacing loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The generator has no more positions.
    Exhausted,
    /// The cancellation token fired.
    Cancelled,
    /// The advance gate closed while waiting on it.
    GateClosed,
}

/// Outcome of [`PacingLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingReport {
    /// Number of fixes submitted to the server.
    pub fixes_sent: u64,
    pub reason: StopReason,
}

/// Callback invoked with every fix right after it was submitted.
pub type FixObserver = Box<dyn FnMut(&Position) + Send>;

/// Drives a generator into a broadcast server at wall-clock pace.
pub struct PacingLoop<G> {
    generator: Generator,
    server: ServerHandle,
    gate: G,
    observer: Option<FixObserver>,
    start_gate: bool,
}

impl<G: AdvanceGate> PacingLoop<G> {
    pub fn new(generator: Generator, server: ServerHandle, gate: G) -> Self {
        Self {
            generator,
            server,
            gate,
            observer: None,
            start_gate: false,
        }
    }

    /// Call `observer` for every submitted fix.
    pub fn with_observer(mut self, observer: impl FnMut(&Position) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Wait on the gate once before the first fix.
    ///
    /// The server is already accepting, so clients can connect before data flows.
    pub fn with_start_gate(mut self, enabled: bool) -> Self {
        self.start_gate = enabled;
        self
    }

    /// Run until the generator is exhausted, `cancel` fires or the gate closes.
    pub async fn run(mut self, cancel: CancellationToken) -> PacingReport {
        let mut fixes_sent = 0;
        let reason = self.drive(&cancel, &mut fixes_sent).await;

        self.server.shutdown().await;
        info!(fixes_sent, reason = ?reason, "Pacing loop stopped");

        PacingReport { fixes_sent, reason }
    }

    async fn drive(&mut self, cancel: &CancellationToken, fixes_sent: &mut u64) -> StopReason {
        if self.start_gate {
            info!("Waiting for start signal");
            if let Some(reason) = self.advance(cancel).await {
                return reason;
            }
        }

        loop {
            if cancel.is_cancelled() {
                return StopReason::Cancelled;
            }

            let started = Instant::now();
            let Some(position) = self.generator.next() else {
                return StopReason::Exhausted;
            };

            self.server.submit_pair(encode_pair(&position));
            *fixes_sent += 1;
            debug!(
                index = position.index,
                lat = position.lat,
                lon = position.lon,
                transition = %position.transition,
                "Submitted fix"
            );
            if let Some(observer) = self.observer.as_mut() {
                observer(&position);
            }

            let hold = position.pause().saturating_sub(started.elapsed());
            if hold >= MIN_SLEEP {
                tokio::select! {
                    _ = cancel.cancelled() => return StopReason::Cancelled,
                    _ = tokio::time::sleep(hold) => {}
                }
            } else {
                tokio::task::yield_now().await;
            }

            if position.is_manual() {
                debug!(index = position.index, "Waiting for advance signal");
                if let Some(reason) = self.advance(cancel).await {
                    return reason;
                }
            }
        }
    }

    /// Wait on the gate. `Some` means the loop must stop.
    async fn advance(&mut self, cancel: &CancellationToken) -> Option<StopReason> {
        tokio::select! {
            _ = cancel.cancelled() => Some(StopReason::Cancelled),
            open = self.gate.wait() => (!open).then_some(StopReason::GateClosed),
        }
    }
}
