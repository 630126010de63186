//! Process-lifetime signals and shutdown requests.

use std::sync::OnceLock;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// One-shot lifetime signals for the host process, plus a way for any
/// component to request shutdown with an exit code.
///
/// Each signal is a level-triggered token that fires once and never
/// resets. Components clone the tokens they care about and either poll
/// them or await them; only the [`HostRunner`](crate::HostRunner) fires
/// `started` and `stopped`.
pub struct HostLifecycle {
    started: CancellationToken,
    stopping: CancellationToken,
    stopped: CancellationToken,
    exit_code: OnceLock<i32>,
}

impl HostLifecycle {
    pub fn new() -> Self {
        Self {
            started: CancellationToken::new(),
            stopping: CancellationToken::new(),
            stopped: CancellationToken::new(),
            exit_code: OnceLock::new(),
        }
    }

    /// Fires when the host has started all enrolled services.
    pub fn started(&self) -> CancellationToken {
        self.started.clone()
    }

    /// Fires when shutdown has been requested; services should wind down.
    pub fn stopping(&self) -> CancellationToken {
        self.stopping.clone()
    }

    /// Fires when all services have stopped.
    pub fn stopped(&self) -> CancellationToken {
        self.stopped.clone()
    }

    /// Request cooperative shutdown of the host.
    ///
    /// The first caller's exit code is recorded and later returned by the
    /// runner; subsequent calls only re-trigger the already-fired stopping
    /// signal.
    pub fn request_shutdown(&self, exit_code: i32) {
        if self.exit_code.set(exit_code).is_ok() {
            info!(exit_code, "shutdown requested");
        }
        self.stopping.cancel();
    }

    /// Exit code recorded by the first shutdown request (0 if none).
    pub fn exit_code(&self) -> i32 {
        self.exit_code.get().copied().unwrap_or(0)
    }

    pub(crate) fn mark_started(&self) {
        self.started.cancel();
    }

    pub(crate) fn mark_stopped(&self) {
        self.stopped.cancel();
    }
}

impl Default for HostLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
