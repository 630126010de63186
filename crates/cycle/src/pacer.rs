//! Deadline arithmetic for the anchored fixed-cadence schedule.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::CycleError;

/// Outcome of one wait on the schedule.
///
/// Cancellation during the wait is a local condition, not an error: the
/// caller decides what a cancelled wait means (for the scheduler loop, a
/// clean stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The deadline was reached, or was already due on entry.
    Completed,
    /// Shutdown was requested before the deadline.
    Cancelled,
}

/// Owns the schedule deadline: the absolute sequence
/// `{anchor, anchor + C, anchor + 2C, ...}` anchored at construction.
///
/// Each [`wait`](Self::wait) advances the deadline by exactly one cadence
/// step, regardless of how long the previous cycle ran. An overrunning
/// cycle makes the following wait instantaneous; the deadline never skips
/// ahead to "catch up", so a habitual overrunner lags real time instead of
/// burst-executing.
pub struct CyclePacer {
    cadence: Duration,
    deadline: Instant,
}

impl CyclePacer {
    /// Create a pacer anchored at now, so the first wait is due
    /// immediately. A zero cadence is rejected here rather than allowed to
    /// busy-loop on zero-length waits.
    pub fn new(cadence: Duration) -> Result<Self, CycleError> {
        if cadence.is_zero() {
            return Err(CycleError::ZeroCadence);
        }
        Ok(Self {
            cadence,
            deadline: Instant::now(),
        })
    }

    /// Fixed interval between the starts of consecutive scheduled cycles.
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// The next absolute deadline.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Wait until the current deadline, observing `shutdown`.
    ///
    /// The deadline is advanced *before* sleeping, keeping the schedule
    /// anchored no matter what happens during the wait or the cycle that
    /// follows. A deadline at or before now returns without suspending.
    pub async fn wait(&mut self, shutdown: &CancellationToken) -> WaitOutcome {
        let due = self.deadline;
        self.deadline += self.cadence;

        if due <= Instant::now() {
            return WaitOutcome::Completed;
        }

        tokio::select! {
            () = sleep_until(due) => WaitOutcome::Completed,
            () = shutdown.cancelled() => WaitOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CADENCE: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn zero_cadence_rejected() {
        assert!(matches!(
            CyclePacer::new(Duration::ZERO),
            Err(CycleError::ZeroCadence)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn first_wait_is_immediate() {
        let shutdown = CancellationToken::new();
        let mut pacer = CyclePacer::new(CADENCE).unwrap();

        let before = Instant::now();
        assert_eq!(pacer.wait(&shutdown).await, WaitOutcome::Completed);
        assert_eq!(Instant::now(), before, "first wait must not suspend");
    }

    #[tokio::test(start_paused = true)]
    async fn waits_follow_anchored_schedule() {
        let shutdown = CancellationToken::new();
        let mut pacer = CyclePacer::new(CADENCE).unwrap();
        let start = Instant::now();

        pacer.wait(&shutdown).await; // due at +0
        pacer.wait(&shutdown).await; // due at +100ms
        let after_second = start.elapsed();
        assert!(
            after_second >= CADENCE && after_second < CADENCE + Duration::from_millis(5),
            "expected ~100ms, got {:?}",
            after_second
        );

        pacer.wait(&shutdown).await; // due at +200ms
        let after_third = start.elapsed();
        assert!(
            after_third >= 2 * CADENCE && after_third < 2 * CADENCE + Duration::from_millis(5),
            "expected ~200ms, got {:?}",
            after_third
        );
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_advances_exactly_one_cadence_per_wait() {
        let shutdown = CancellationToken::new();
        let mut pacer = CyclePacer::new(CADENCE).unwrap();
        let anchor = pacer.deadline();

        pacer.wait(&shutdown).await;
        assert_eq!(pacer.deadline(), anchor + CADENCE);

        pacer.wait(&shutdown).await;
        assert_eq!(pacer.deadline(), anchor + 2 * CADENCE);
    }

    #[tokio::test(start_paused = true)]
    async fn overrun_makes_next_wait_instant_then_realigns() {
        let shutdown = CancellationToken::new();
        let mut pacer = CyclePacer::new(CADENCE).unwrap();
        let start = Instant::now();

        pacer.wait(&shutdown).await; // due at +0

        // Simulate a cycle overrunning its cadence by 50ms.
        tokio::time::advance(Duration::from_millis(150)).await;

        // The +100ms deadline is already past: no suspension.
        let before = Instant::now();
        assert_eq!(pacer.wait(&shutdown).await, WaitOutcome::Completed);
        assert_eq!(Instant::now(), before);

        // The +200ms deadline still stands: the schedule realigns to the
        // anchored sequence instead of restarting relative to the overrun.
        pacer.wait(&shutdown).await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= 2 * CADENCE && elapsed < 2 * CADENCE + Duration::from_millis(5),
            "expected realignment at ~200ms, got {:?}",
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_before_wait_returns_cancelled() {
        let shutdown = CancellationToken::new();
        let mut pacer = CyclePacer::new(CADENCE).unwrap();
        pacer.wait(&shutdown).await; // consume the immediate slot

        shutdown.cancel();
        let before = Instant::now();
        assert_eq!(pacer.wait(&shutdown).await, WaitOutcome::Cancelled);
        assert_eq!(Instant::now(), before, "cancelled wait must not sleep out the deadline");
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_wait_wakes_early() {
        let shutdown = CancellationToken::new();
        let mut pacer = CyclePacer::new(CADENCE).unwrap();
        pacer.wait(&shutdown).await; // consume the immediate slot

        let canceller = shutdown.clone();
        let cancel_task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let outcome = pacer.wait(&shutdown).await;
        cancel_task.await.unwrap();

        assert_eq!(outcome, WaitOutcome::Cancelled);
        let elapsed = start.elapsed();
        assert!(
            elapsed < CADENCE,
            "wait should return early on cancellation, took {:?}",
            elapsed
        );
    }
}
