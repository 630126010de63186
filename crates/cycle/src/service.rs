//! The cycle service contract and a closure-based adapter.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::CycleError;

// ── CycleService trait ───────────────────────────────────────────────

/// A unit of work executed repeatedly on a fixed cadence.
///
/// Implementors supply the cadence and the per-cycle body; the
/// [`CycleScheduler`](crate::CycleScheduler) owns all timing.
#[async_trait]
pub trait CycleService: Send + Sync {
    /// Fixed interval between the starts of consecutive scheduled cycles.
    /// Must be positive; validated at scheduler construction.
    fn cadence(&self) -> Duration;

    /// Perform one cycle of work.
    ///
    /// `shutdown` is the same token the scheduler observes between cycles.
    /// Honoring it mid-cycle is this method's choice; the scheduler never
    /// aborts a cycle that has already started. Returning an error ends
    /// the loop permanently.
    async fn execute_cycle(&self, shutdown: &CancellationToken) -> Result<(), CycleError>;

    /// Human-readable name for this service (used in logging and metrics).
    fn name(&self) -> &str;
}

// ── Cycle body type ──────────────────────────────────────────────────

/// Boxed async function that performs one cycle's work.
pub type CycleBody = Box<
    dyn Fn(CancellationToken) -> Pin<Box<dyn Future<Output = Result<(), CycleError>> + Send>>
        + Send
        + Sync,
>;

// ── CycleBuilder ─────────────────────────────────────────────────────

/// Fluent builder producing a [`CycleService`] from a closure, for cases
/// where a dedicated service type is overkill.
///
/// # Example
/// ```ignore
/// let service = CycleBuilder::new("heartbeat", Duration::from_secs(1))
///     .on_cycle(|_shutdown| async move {
///         println!("beat");
///         Ok(())
///     })
///     .build();
/// ```
pub struct CycleBuilder {
    name: String,
    cadence: Duration,
    body: Option<CycleBody>,
}

impl CycleBuilder {
    /// Create a builder with the given service name and cadence.
    pub fn new(name: impl Into<String>, cadence: Duration) -> Self {
        Self {
            name: name.into(),
            cadence,
            body: None,
        }
    }

    /// Set the per-cycle body. The closure receives a clone of the
    /// scheduler's shutdown token.
    pub fn on_cycle<F, Fut>(mut self, body: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CycleError>> + Send + 'static,
    {
        self.body = Some(Box::new(move |token| Box::pin(body(token))));
        self
    }

    /// Build the service. A builder without a body yields a service whose
    /// cycles complete immediately.
    pub fn build(self) -> FnCycleService {
        FnCycleService {
            name: self.name,
            cadence: self.cadence,
            body: self.body,
        }
    }
}

/// A [`CycleService`] backed by a closure. Built via [`CycleBuilder`].
pub struct FnCycleService {
    name: String,
    cadence: Duration,
    body: Option<CycleBody>,
}

#[async_trait]
impl CycleService for FnCycleService {
    fn cadence(&self) -> Duration {
        self.cadence
    }

    async fn execute_cycle(&self, shutdown: &CancellationToken) -> Result<(), CycleError> {
        match &self.body {
            Some(body) => body(shutdown.clone()).await,
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn builder_produces_working_service() {
        let count = Arc::new(AtomicU32::new(0));
        let count2 = count.clone();

        let service = CycleBuilder::new("counter", Duration::from_millis(10))
            .on_cycle(move |_shutdown| {
                let count = count2.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .build();

        assert_eq!(service.name(), "counter");
        assert_eq!(service.cadence(), Duration::from_millis(10));

        let token = CancellationToken::new();
        service.execute_cycle(&token).await.unwrap();
        service.execute_cycle(&token).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn builder_without_body_completes_immediately() {
        let service = CycleBuilder::new("noop", Duration::from_millis(10)).build();
        let token = CancellationToken::new();
        assert!(service.execute_cycle(&token).await.is_ok());
    }

    #[tokio::test]
    async fn body_sees_cancellation_state() {
        let service = CycleBuilder::new("observer", Duration::from_millis(10))
            .on_cycle(|shutdown| async move {
                if shutdown.is_cancelled() {
                    Err(CycleError::Cycle(anyhow::anyhow!("ran after shutdown")))
                } else {
                    Ok(())
                }
            })
            .build();

        let token = CancellationToken::new();
        assert!(service.execute_cycle(&token).await.is_ok());

        token.cancel();
        assert!(service.execute_cycle(&token).await.is_err());
    }
}
