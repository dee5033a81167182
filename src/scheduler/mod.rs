/*!
 * Scheduler Module
 * Priority-ordered ready queues with non-preemptible critical sections
 */

use crate::core::types::{Pid, Priority};
use crate::process::SharedProcess;
use ahash::RandomState;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

mod entry;
mod operations;
pub mod types;

use entry::Entry;
pub use types::{ReadyQueueStatus, SchedulerStats, SchedulerStatus};

/// Priority scheduler
///
/// Higher priority values run first; within one level processes run in
/// admission order. A running process flagged critical keeps the processor
/// across `pick_next` calls until it is re-admitted with `add`.
///
/// Methods take shared process handles and lock them briefly. Callers must
/// not hold a handle's lock across a scheduler call.
#[derive(Debug, Default)]
pub struct Scheduler {
    ready: BTreeMap<Priority, VecDeque<Entry>>,
    // Which ready queue each queued pid sits in
    locations: HashMap<Pid, Priority, RandomState>,
    running: Option<Entry>,
    blocked: BTreeSet<Pid>,
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pid of the running process
    pub fn running(&self) -> Option<Pid> {
        self.running.as_ref().map(|e| e.pid)
    }

    /// Handle of the running process
    pub fn running_process(&self) -> Option<SharedProcess> {
        self.running.as_ref().map(|e| e.process.clone())
    }

    pub fn is_queued(&self, pid: Pid) -> bool {
        self.locations.contains_key(&pid)
    }

    pub fn is_blocked(&self, pid: Pid) -> bool {
        self.blocked.contains(&pid)
    }

    /// Number of processes waiting in ready queues
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Snapshot of the running pid, ready queues and blocked set
    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: self.running(),
            ready: self
                .ready
                .iter()
                .rev()
                .map(|(&priority, queue)| ReadyQueueStatus {
                    priority,
                    pids: queue.iter().map(|e| e.pid).collect(),
                })
                .collect(),
            blocked: self.blocked.iter().copied().collect(),
            stats: self.stats,
        }
    }
}
