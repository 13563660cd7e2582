//! Lode CLI - simulated GPS receiver serving NMEA-0183 over TCP.
//!
//! ```text
//! lode-server [PORT] --source <TYPE> [PARAMS]... [--wait-for-keypress] [--debug] [--quiet]
//! ```
//!
//! Clients (navigation software, `nc localhost 10110`, ...) receive one
//! `$GPRMC` + `$GPGGA` pair per fix until the source is exhausted or the
//! server is interrupted with Ctrl+C.

mod display;
mod error;
mod gate;
mod runner;

use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use error::CliError;
use gate::StdinAdvance;
use lode::generator::registry;
use lode::pacing::{PacingLoop, StopReason};
use lode::server::BroadcastServer;
use runner::CliRunner;

/// Upper bound on runtime teardown; a stdin read may still be blocked.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "lode-server", version)]
#[command(about = "Simulated GPS receiver streaming NMEA-0183 sentences to TCP clients")]
#[command(after_help = sources_help())]
struct Args {
    /// TCP port to listen on [default: server.port from ~/.lode/config.ini, else 10110]
    port: Option<u16>,

    /// Position source and its parameters, e.g. `dynamic 55.7522 37.6156 speed=20`
    #[arg(
        long,
        required = true,
        num_args = 1..,
        value_name = "TYPE [PARAMS]",
        allow_negative_numbers = true
    )]
    source: Vec<String>,

    /// Wait for Enter before sending the first fix
    #[arg(long)]
    wait_for_keypress: bool,

    /// Enable debug-level logging
    #[arg(long)]
    debug: bool,

    /// Do not print fixes or log lines to the console
    #[arg(long)]
    quiet: bool,
}

fn sources_help() -> String {
    let mut help = String::from("Sources:\n");
    for entry in registry::sources() {
        help.push_str(&format!("  {:<48} {}\n", entry.usage(), entry.summary));
    }
    help
}

fn main() {
    let args = Args::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => CliError::Runtime(e).exit(),
    };
    let result = runtime.block_on(run(args));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);

    if let Err(e) = result {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let runner = CliRunner::new(!args.quiet, args.debug)?;

    let mut server_config = runner.config().server_config();
    if let Some(port) = args.port {
        server_config.port = port;
    }

    // clap guarantees at least one value for --source.
    let (source, params) = args
        .source
        .split_first()
        .ok_or(lode::generator::GeneratorError::MissingParameter("source"))?;
    let generator = registry::create(source, params)?;
    info!(
        source = %source,
        params = ?params,
        remaining = ?generator.remaining(),
        "Source ready"
    );

    let server = BroadcastServer::new(server_config).start().await?;
    println!(
        "{}",
        display::banner(server.local_addr().port(), source, params, args.wait_for_keypress)
    );
    println!();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    ctrlc::set_handler(move || interrupt.cancel())
        .map_err(|e| CliError::Signal(e.to_string()))?;

    let gate = StdinAdvance::new(!args.quiet, args.wait_for_keypress);
    let mut pacing =
        PacingLoop::new(generator, server, gate).with_start_gate(args.wait_for_keypress);
    if !args.quiet {
        pacing = pacing.with_observer(display::print_fix);
    }

    let report = pacing.run(cancel).await;
    let reason = match report.reason {
        StopReason::Exhausted => "source exhausted",
        StopReason::Cancelled => "interrupted",
        StopReason::GateClosed => "input closed",
    };
    println!();
    println!("Stopped after {} fixes ({})", report.fixes_sent, reason);

    Ok(())
}
