use serde::Serialize;

/// Where a scheduler's loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopState {
    /// Constructed, loop not yet spawned.
    NotStarted,
    /// Sleeping until the next deadline.
    Waiting,
    /// A cycle is executing.
    Running,
    /// Clean exit after cancellation. Terminal.
    Stopped,
    /// The loop ended on an unrecovered cycle error. Terminal.
    Faulted,
}

impl LoopState {
    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Faulted)
    }
}
