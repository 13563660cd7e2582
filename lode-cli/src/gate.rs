//! Keyboard advance gate.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::pin::Pin;

use tracing::warn;

use lode::pacing::AdvanceGate;

/// Opens once per line read from stdin (i.e. per Enter keypress).
///
/// The blocking read runs on tokio's blocking pool. End of input closes the
/// gate.
pub struct StdinAdvance {
    prompt: bool,
    start_pending: bool,
}

impl StdinAdvance {
    /// `prompt` prints a hint before each wait; `start_gate` makes the first
    /// hint ask for the start of streaming.
    pub fn new(prompt: bool, start_gate: bool) -> Self {
        Self {
            prompt,
            start_pending: start_gate,
        }
    }

    fn prompt_text(&mut self) -> &'static str {
        if std::mem::take(&mut self.start_pending) {
            "Clients can connect now. Press Enter to start streaming..."
        } else {
            "Manual point reached. Press Enter to continue..."
        }
    }
}

impl AdvanceGate for StdinAdvance {
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        let text = self.prompt_text();
        let prompt = self.prompt;

        Box::pin(async move {
            if prompt {
                print!("{} ", text);
                let _ = io::stdout().flush();
            }

            let read = tokio::task::spawn_blocking(|| {
                let mut line = String::new();
                io::stdin().lock().read_line(&mut line).map(|n| n > 0)
            })
            .await;

            match read {
                Ok(Ok(true)) => true,
                Ok(Ok(false)) => {
                    warn!("stdin closed, no further advance signals");
                    false
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Failed to read stdin");
                    false
                }
                Err(e) => {
                    warn!(error = %e, "stdin reader task failed");
                    false
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_prompt_only_first() {
        let mut gate = StdinAdvance::new(true, true);
        assert!(gate.prompt_text().contains("start streaming"));
        assert!(gate.prompt_text().contains("Manual point"));
        assert!(gate.prompt_text().contains("Manual point"));
    }

    #[test]
    fn test_without_start_gate() {
        let mut gate = StdinAdvance::new(false, false);
        assert!(gate.prompt_text().contains("Manual point"));
    }
}
