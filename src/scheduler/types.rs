/*!
 * Scheduler Types
 * Snapshot and statistics types for the priority scheduler
 */

use crate::core::types::{Pid, Priority};
use serde::{Deserialize, Serialize};

/// Scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    /// Processes taken off a ready queue by `pick_next`
    pub total_scheduled: u64,
    /// Picks that kept a critical process on the processor
    pub critical_continuations: u64,
    pub preemptions: u64,
    /// Terminated entries discarded while scanning the ready queues
    pub dropped_terminated: u64,
}

/// One priority level's ready queue, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyQueueStatus {
    pub priority: Priority,
    pub pids: Vec<Pid>,
}

/// Read-only snapshot of the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub running: Option<Pid>,
    /// Highest priority first
    pub ready: Vec<ReadyQueueStatus>,
    pub blocked: Vec<Pid>,
    pub stats: SchedulerStats,
}

impl SchedulerStatus {
    /// Pids of one priority level, empty if the level was never used
    pub fn queue(&self, priority: Priority) -> Vec<Pid> {
        self.ready
            .iter()
            .find(|q| q.priority == priority)
            .map(|q| q.pids.clone())
            .unwrap_or_default()
    }

    pub fn ready_count(&self) -> usize {
        self.ready.iter().map(|q| q.pids.len()).sum()
    }
}
