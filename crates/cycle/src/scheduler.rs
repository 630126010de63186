//! The cycle scheduling loop and its hosted-lifecycle surface.
//!
//! [`CycleScheduler`] owns one [`CycleService`] and one loop task. The loop
//! alternates between waiting for the next anchored deadline and running a
//! cycle, and terminates on cooperative cancellation (clean stop) or on an
//! unrecovered cycle error (fault). The fault is never caught here; it
//! travels through the loop's join handle to whoever calls [`stop`].
//!
//! [`stop`]: CycleScheduler::stop

use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CycleError;
use crate::metrics::CycleMetrics;
use crate::pacer::{CyclePacer, WaitOutcome};
use crate::service::CycleService;
use crate::state::LoopState;

/// Runs a [`CycleService`] on its fixed cadence as a background task.
pub struct CycleScheduler {
    service: Arc<dyn CycleService>,
    /// Consumed by [`start`](Self::start); its deadline was anchored when
    /// the scheduler was constructed.
    pacer: Option<CyclePacer>,
    shutdown: CancellationToken,
    metrics: Arc<RwLock<CycleMetrics>>,
    handle: Option<JoinHandle<Result<(), CycleError>>>,
}

impl CycleScheduler {
    /// Create a scheduler for the given service.
    ///
    /// The cadence is validated here, and the schedule is anchored at this
    /// moment: the first cycle is due immediately, however much later the
    /// loop is started.
    pub fn new(service: Arc<dyn CycleService>) -> Result<Self, CycleError> {
        let pacer = CyclePacer::new(service.cadence())?;
        Ok(Self {
            service,
            pacer: Some(pacer),
            shutdown: CancellationToken::new(),
            metrics: Arc::new(RwLock::new(CycleMetrics::default())),
            handle: None,
        })
    }

    /// The token the loop observes. Cancelling it is equivalent to calling
    /// [`stop`](Self::stop) without waiting for the loop to finish.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Snapshot of the scheduler's metrics.
    pub fn metrics(&self) -> CycleMetrics {
        self.metrics.read().unwrap().clone()
    }

    /// Shared handle to the metrics (for external reads without cloning).
    pub fn metrics_handle(&self) -> Arc<RwLock<CycleMetrics>> {
        Arc::clone(&self.metrics)
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        self.metrics.read().unwrap().state
    }

    /// Spawn the scheduling loop as a background task.
    pub fn start(&mut self) -> Result<(), CycleError> {
        let pacer = self.pacer.take().ok_or(CycleError::AlreadyStarted)?;
        info!(
            service = %self.service.name(),
            cadence = ?pacer.cadence(),
            "starting cycle scheduler"
        );

        let service = Arc::clone(&self.service);
        let shutdown = self.shutdown.clone();
        let metrics = Arc::clone(&self.metrics);
        self.handle = Some(tokio::spawn(run_loop(service, pacer, shutdown, metrics)));
        Ok(())
    }

    /// Request cooperative termination and wait for the loop to reach a
    /// terminal state, re-surfacing the error of a faulted loop.
    ///
    /// Idempotent: stopping a scheduler that never started, or one that
    /// already stopped, returns `Ok(())` and executes no further cycles.
    pub async fn stop(&mut self) -> Result<(), CycleError> {
        self.shutdown.cancel();
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(CycleError::Panicked(e.to_string())),
            Err(_) => Ok(()),
        }
    }
}

/// The loop body: `Waiting → Running → Waiting → …` until cancellation
/// (clean stop) or a cycle error (fault, returned unchanged).
async fn run_loop(
    service: Arc<dyn CycleService>,
    mut pacer: CyclePacer,
    shutdown: CancellationToken,
    metrics: Arc<RwLock<CycleMetrics>>,
) -> Result<(), CycleError> {
    loop {
        set_state(&metrics, LoopState::Waiting);
        let outcome = pacer.wait(&shutdown).await;

        // Whether the wait ran out or was interrupted, check the signal
        // once more: a cycle already judged due is not executed once
        // cancellation has been observed.
        if outcome == WaitOutcome::Cancelled || shutdown.is_cancelled() {
            set_state(&metrics, LoopState::Stopped);
            info!(service = %service.name(), "cycle loop stopped");
            return Ok(());
        }

        set_state(&metrics, LoopState::Running);
        let started = Instant::now();
        match service.execute_cycle(&shutdown).await {
            Ok(()) => {
                let elapsed = started.elapsed();
                debug!(service = %service.name(), elapsed = ?elapsed, "cycle completed");
                metrics.write().unwrap().record_cycle(elapsed);
            }
            Err(e) => {
                set_state(&metrics, LoopState::Faulted);
                return Err(e);
            }
        }
    }
}

fn set_state(metrics: &RwLock<CycleMetrics>, state: LoopState) {
    metrics.write().unwrap().state = state;
}
