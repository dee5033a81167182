/*!
 * Kernel Types
 * Reports produced by the orchestrator
 */

use crate::core::types::{Pid, Vpn};
use crate::memory::{AccessOutcome, MemoryError, PagingStatus};
use crate::process::ProcessInfo;
use crate::scheduler::SchedulerStatus;
use serde::Serialize;

/// One page touch during a quantum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessRecord {
    pub vpn: Vpn,
    pub outcome: AccessOutcome,
}

/// What happened during one scheduling quantum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub pid: Pid,
    pub accesses: Vec<AccessRecord>,
    /// Access failure that cut the quantum short
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "as_display")]
    pub error: Option<MemoryError>,
}

impl StepReport {
    pub fn hits(&self) -> usize {
        self.accesses.iter().filter(|a| a.outcome.is_hit()).count()
    }

    pub fn faults(&self) -> usize {
        self.accesses.len() - self.hits()
    }
}

fn as_display<S: serde::Serializer>(
    error: &Option<MemoryError>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.collect_str(e),
        None => s.serialize_none(),
    }
}

/// Full kernel snapshot for inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernelSnapshot {
    pub processes: Vec<ProcessInfo>,
    pub memory: PagingStatus,
    pub scheduler: SchedulerStatus,
}
