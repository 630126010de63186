//! Host-side plumbing for cycle services: a shared-instance service
//! registry, process-lifetime signals, and a runner that drives every
//! enrolled service through a [`takt_cycle::CycleScheduler`].

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod runner;

pub use config::{HostConfig, ServiceConfig};
pub use error::HostError;
pub use lifecycle::HostLifecycle;
pub use registry::ServiceRegistry;
pub use runner::HostRunner;
