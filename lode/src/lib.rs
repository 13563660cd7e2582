//! Lode - simulated GPS receiver for NMEA-0183 over TCP
//!
//! This library produces a time-ordered sequence of navigation fixes and
//! streams them as NMEA-0183 sentence pairs (RMC + GGA) to any number of
//! TCP clients, paced to wall-clock intervals.
//!
//! # High-Level API
//!
//! ```ignore
//! use lode::generator::registry;
//! use lode::pacing::{ImmediateAdvance, PacingLoop};
//! use lode::server::{BroadcastServer, ServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let generator = registry::create("dynamic", &["55.7522", "37.6156", "speed=20"])?;
//! let server = BroadcastServer::new(ServerConfig::default()).start().await?;
//!
//! let report = PacingLoop::new(generator, server, ImmediateAdvance)
//!     .run(CancellationToken::new())
//!     .await;
//! ```
//!
//! # Modules
//!
//! - [`position`] - The `Position` record shared by every component
//! - [`nmea`] - RMC/GGA encoder, lenient decoder and checksum
//! - [`geo`] - Great-circle helpers on a spherical Earth
//! - [`generator`] - Dynamic and file-replay position generators
//! - [`server`] - TCP broadcast server with per-client failure isolation
//! - [`pacing`] - Wall-clock pacing loop and manual-advance gates
//! - [`config`] - `~/.lode/config.ini` handling
//! - [`logging`] - `tracing` subscriber setup

pub mod config;
pub mod generator;
pub mod geo;
pub mod logging;
pub mod nmea;
pub mod pacing;
pub mod position;
pub mod server;

pub use position::{Position, Transition};

/// Version of the Lode library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
