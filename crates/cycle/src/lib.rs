//! Fixed-cadence cycle scheduling for long-running services.
//!
//! A [`CycleService`] supplies a cadence and a unit of work; a
//! [`CycleScheduler`] runs that work once per cadence step on an absolute
//! schedule anchored at construction time, terminating cleanly on
//! cooperative cancellation or immediately on an unrecovered cycle error.

pub mod error;
pub mod metrics;
pub mod pacer;
pub mod scheduler;
pub mod service;
pub mod state;

pub use error::CycleError;
pub use metrics::CycleMetrics;
pub use pacer::{CyclePacer, WaitOutcome};
pub use scheduler::CycleScheduler;
pub use service::{CycleBuilder, CycleService, FnCycleService};
pub use state::LoopState;
