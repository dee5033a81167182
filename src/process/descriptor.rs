/*!
 * Process Descriptor
 * Static and derived facts about one schedulable unit
 */

use super::types::{ProcessError, ProcessInfo, ProcessResult, ProcessState};
use crate::core::types::{Pid, Priority};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Handle shared between the orchestrator's process table and the scheduler
pub type SharedProcess = Arc<RwLock<Process>>;

/// Process descriptor
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    name: String,
    size: usize,
    page_size: Option<usize>,
    page_count: Option<usize>,
    priority: Priority,
    critical: bool,
    state: ProcessState,
}

impl Process {
    /// Create a descriptor in the New state
    pub fn new(
        pid: Pid,
        name: impl Into<String>,
        size: usize,
        priority: Priority,
        critical: bool,
    ) -> Self {
        Self {
            pid,
            name: name.into(),
            size,
            page_size: None,
            page_count: None,
            priority,
            critical,
            state: ProcessState::New,
        }
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedProcess {
        Arc::new(RwLock::new(self))
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Reassign the priority. Takes effect on the next admission.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.state == ProcessState::Terminated
    }

    /// Derive the page count as `ceil(size / page_size)`
    ///
    /// The first call fixes the page size; repeating it with the same value
    /// is a no-op.
    pub fn set_page_size(&mut self, page_size: usize) -> ProcessResult<usize> {
        if page_size == 0 {
            return Err(ProcessError::ZeroPageSize(self.pid));
        }
        match self.page_size {
            Some(current) if current != page_size => Err(ProcessError::PageSizeMismatch {
                pid: self.pid,
                current,
                requested: page_size,
            }),
            Some(_) => Ok(self.page_count.unwrap_or_default()),
            None => {
                let count = self.size.div_ceil(page_size);
                self.page_size = Some(page_size);
                self.page_count = Some(count);
                Ok(count)
            }
        }
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Number of virtual pages, if the page size is known
    pub fn page_count(&self) -> ProcessResult<usize> {
        self.page_count.ok_or(ProcessError::PageSizeUnset(self.pid))
    }

    /// Move to `to`, enforcing the lifecycle
    pub fn transition(&mut self, to: ProcessState) -> ProcessResult<()> {
        if !self.state.can_transition_to(to) {
            return Err(ProcessError::InvalidStateTransition {
                pid: self.pid,
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            name: self.name.clone(),
            size: self.size,
            page_count: self.page_count,
            priority: self.priority,
            critical: self.critical,
            state: self.state,
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<P{}:{} pr={} st={} pages=", self.pid, self.name, self.priority, self.state)?;
        match self.page_count {
            Some(n) => write!(f, "{}", n)?,
            None => f.write_str("?")?,
        }
        write!(f, " crit={}>", self.critical)
    }
}
