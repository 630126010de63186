use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::LoopState;

/// Operational metrics for one scheduler instance.
#[derive(Debug, Clone, Serialize)]
pub struct CycleMetrics {
    /// Current loop state.
    pub state: LoopState,
    /// Cycles that ran to completion.
    pub cycles_completed: u64,
    /// When the most recent cycle finished.
    pub last_cycle_at: Option<DateTime<Utc>>,
    /// Rolling average cycle duration.
    pub avg_cycle_duration: Duration,
}

impl Default for CycleMetrics {
    fn default() -> Self {
        Self {
            state: LoopState::NotStarted,
            cycles_completed: 0,
            last_cycle_at: None,
            avg_cycle_duration: Duration::ZERO,
        }
    }
}

impl CycleMetrics {
    /// Record a completed cycle.
    pub fn record_cycle(&mut self, duration: Duration) {
        self.cycles_completed += 1;
        self.last_cycle_at = Some(Utc::now());

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let count = self.cycles_completed;
        self.avg_cycle_duration = if count == 1 {
            duration
        } else {
            let prev_nanos = self.avg_cycle_duration.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }
}
