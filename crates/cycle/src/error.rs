use thiserror::Error;

/// Errors surfaced by the cycle scheduler.
#[derive(Debug, Error)]
pub enum CycleError {
    /// A zero cadence would degenerate into a busy loop of zero-length waits.
    #[error("cycle cadence must be positive")]
    ZeroCadence,

    #[error("scheduler already started")]
    AlreadyStarted,

    /// A cycle raised an error. The loop terminates and the error reaches
    /// whatever awaits it, unchanged: no retry, no further cycles.
    #[error("cycle failed: {0}")]
    Cycle(#[from] anyhow::Error),

    #[error("cycle task panicked: {0}")]
    Panicked(String),
}
