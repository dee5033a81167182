/*!
 * Process Types
 * Common types for process management
 */

use crate::core::types::{Pid, Priority};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ProcessError {
    #[error("Invalid state transition for PID {pid}: {from} -> {to}")]
    #[diagnostic(
        code(process::invalid_state_transition),
        help("Terminated is final. A killed process cannot be resumed or re-admitted.")
    )]
    InvalidStateTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Page size for PID {pid} already fixed at {current} bytes, refusing {requested}")]
    #[diagnostic(
        code(process::page_size_mismatch),
        help("The page count is derived once and is immutable afterwards.")
    )]
    PageSizeMismatch {
        pid: Pid,
        current: usize,
        requested: usize,
    },

    #[error("Page size for PID {0} must be non-zero")]
    #[diagnostic(code(process::zero_page_size))]
    ZeroPageSize(Pid),

    #[error("Page count for PID {0} is not known yet")]
    #[diagnostic(
        code(process::page_size_unset),
        help("Call set_page_size before handing the process to the paging engine.")
    )]
    PageSizeUnset(Pid),
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created, not yet admitted to the scheduler
    New,
    /// Waiting in a ready queue
    Ready,
    /// Currently holding the processor
    Running,
    /// Blocked until explicitly unblocked
    Waiting,
    /// Killed; absorbing
    Terminated,
}

impl ProcessState {
    /// Whether the lifecycle allows moving from `self` to `to`
    ///
    /// Re-entering the current state is allowed for every state except
    /// Terminated, whose only legal "transition" is to itself.
    pub const fn can_transition_to(self, to: ProcessState) -> bool {
        use ProcessState::*;
        match (self, to) {
            (Terminated, Terminated) => true,
            (Terminated, _) => false,
            (_, Terminated) => true,
            (New, Ready) | (New, Waiting) => true,
            (Ready, Running) | (Ready, Waiting) | (Ready, Ready) => true,
            (Running, Ready) | (Running, Waiting) | (Running, Running) => true,
            (Waiting, Ready) | (Waiting, Waiting) => true,
            (New, New) => true,
            _ => false,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Waiting => "Waiting",
            Self::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable view of a process descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    pub size: usize,
    pub page_count: Option<usize>,
    pub priority: Priority,
    pub critical: bool,
    pub state: ProcessState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        use ProcessState::*;
        assert!(New.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Running));
        assert!(Running.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Waiting));
        assert!(Waiting.can_transition_to(Ready));
        assert!(Running.can_transition_to(Terminated));

        assert!(!New.can_transition_to(Running));
        assert!(!Waiting.can_transition_to(Running));
    }

    #[test]
    fn test_terminated_is_absorbing() {
        use ProcessState::*;
        for to in [New, Ready, Running, Waiting] {
            assert!(!Terminated.can_transition_to(to));
        }
        assert!(Terminated.can_transition_to(Terminated));
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&ProcessState::Waiting).unwrap();
        assert_eq!(json, "\"waiting\"");
    }
}
