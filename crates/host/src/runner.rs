//! Drives enrolled cycle services through the host's lifetime.
//!
//! [`HostRunner::run`] starts one [`CycleScheduler`] per enrolled service,
//! fires the lifecycle signals, waits for a shutdown request (programmatic
//! or OS signal), stops every scheduler under the configured timeout, and
//! returns the recorded exit code, or the first fault a service raised.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use takt_cycle::{CycleError, CycleScheduler};

use crate::config::HostConfig;
use crate::error::HostError;
use crate::lifecycle::HostLifecycle;
use crate::registry::ServiceRegistry;

pub struct HostRunner {
    registry: ServiceRegistry,
    lifecycle: Arc<HostLifecycle>,
    shutdown_timeout: Duration,
}

impl HostRunner {
    pub fn new(
        registry: ServiceRegistry,
        lifecycle: Arc<HostLifecycle>,
        config: &HostConfig,
    ) -> Self {
        Self {
            registry,
            lifecycle,
            shutdown_timeout: config.shutdown_timeout(),
        }
    }

    /// Run the host to completion.
    ///
    /// Blocks until shutdown is requested via
    /// [`HostLifecycle::request_shutdown`] or an OS signal. A service that
    /// faulted surfaces its error here, after the remaining services have
    /// been stopped.
    pub async fn run(self) -> Result<i32, HostError> {
        let mut schedulers = Vec::with_capacity(self.registry.cycle_services().len());
        for service in self.registry.cycle_services() {
            let started = CycleScheduler::new(Arc::clone(service))
                .and_then(|mut scheduler| scheduler.start().map(|()| scheduler));
            match started {
                Ok(scheduler) => schedulers.push((service.name().to_string(), scheduler)),
                Err(e) => {
                    error!(service = %service.name(), error = %e, "failed to start service");
                    // Wind down anything already running before bailing out.
                    for (_, mut scheduler) in schedulers {
                        let _ = scheduler.stop().await;
                    }
                    return Err(HostError::Cycle(e));
                }
            }
        }

        self.lifecycle.mark_started();
        info!(services = schedulers.len(), "host started");

        let stopping = self.lifecycle.stopping();
        tokio::select! {
            () = stopping.cancelled() => {}
            () = Self::os_signal() => {
                info!("os shutdown signal received");
                self.lifecycle.request_shutdown(0);
            }
        }
        info!("host stopping");

        let mut fault: Option<CycleError> = None;
        for (name, mut scheduler) in schedulers {
            match timeout(self.shutdown_timeout, scheduler.stop()).await {
                Ok(Ok(())) => debug!(service = %name, "service stopped"),
                Ok(Err(e)) => {
                    error!(service = %name, error = %e, "cycle service faulted");
                    fault.get_or_insert(e);
                }
                Err(_) => warn!(service = %name, "service stop timed out, abandoning"),
            }
        }

        self.lifecycle.mark_stopped();
        info!("host stopped");

        match fault {
            Some(e) => Err(HostError::Cycle(e)),
            None => Ok(self.lifecycle.exit_code()),
        }
    }

    /// Wait for SIGINT or SIGTERM (Unix) or Ctrl+C (cross-platform fallback).
    async fn os_signal() {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = signal(SignalKind::interrupt()).expect("failed to register SIGINT");
            let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM");
            tokio::select! {
                _ = sigint.recv() => {}
                _ = sigterm.recv() => {}
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl_c");
        }
    }
}
