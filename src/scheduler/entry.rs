/*!
 * Scheduler Entry
 * Queue element pairing a pid with its shared descriptor
 */

use crate::core::types::Pid;
use crate::process::SharedProcess;

/// Scheduling entry
///
/// The pid is cached so queue bookkeeping never needs the descriptor lock.
#[derive(Debug, Clone)]
pub(super) struct Entry {
    pub pid: Pid,
    pub process: SharedProcess,
}

impl Entry {
    pub fn new(pid: Pid, process: &SharedProcess) -> Self {
        Self {
            pid,
            process: process.clone(),
        }
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.process.read().is_terminated()
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        self.process.read().is_critical()
    }
}
