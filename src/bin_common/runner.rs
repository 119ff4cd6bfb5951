//! Run loop shared by binaries
//!
//! Wraps an application's main loop with start and stop log lines and a
//! final metrics summary.

use std::time::{Duration, Instant};
use tracing::{info, warn};

const HEARTBEAT: Duration = Duration::from_secs(300);

/// Settings for a long-running binary
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name used in lifecycle log lines
    pub name: String,
    heartbeat: Duration,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heartbeat: HEARTBEAT,
        }
    }

    /// Period of the status line logged while running
    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat
    }
}

/// A binary's main loop
///
/// `execute()` is the entry point; implementors provide `run()`.
pub trait BinaryRunner {
    async fn run(&mut self) -> anyhow::Result<()>;

    fn config(&self) -> &RunConfig;

    /// Logged once `run()` returns
    fn shutdown_stats(&self) -> Option<String> {
        None
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        let name = self.config().name.clone();
        let started = Instant::now();
        info!(
            binary = %name,
            heartbeat_secs = self.config().heartbeat_interval().as_secs(),
            "started, Ctrl+C to stop"
        );

        let result = self.run().await;

        let uptime_secs = started.elapsed().as_secs();
        match &result {
            Ok(()) => info!(binary = %name, uptime_secs, "stopped"),
            Err(e) => warn!(binary = %name, uptime_secs, error = %e, "stopped with error"),
        }
        if let Some(stats) = self.shutdown_stats() {
            info!(binary = %name, "final stats: {}", stats);
        }
        result
    }
}
