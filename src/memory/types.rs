/*!
 * Memory Types
 * Common types for the paging engine
 */

use crate::core::types::{FrameIndex, PageKey, Pid, SwapSlot, Vpn};
use crate::process::ProcessError;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Invalid address: PID {pid} vpn {vpn} outside [0, {page_count})")]
    #[diagnostic(
        code(memory::invalid_address),
        help("Virtual page numbers are zero-based and bounded by the process page count.")
    )]
    InvalidAddress {
        pid: Pid,
        vpn: Vpn,
        page_count: usize,
    },

    #[error("PID {0} has no pages registered with the paging engine")]
    #[diagnostic(code(memory::unknown_process), help("Call allocate before accessing pages."))]
    UnknownProcess(Pid),

    #[error("PID {0} already has pages registered")]
    #[diagnostic(code(memory::already_allocated))]
    AlreadyAllocated(Pid),

    #[error("Paging engine needs at least one physical frame")]
    #[diagnostic(
        code(memory::no_frames),
        help("Every access would fault with nothing to evict. Configure phys_frames >= 1.")
    )]
    NoFrames,

    #[error("Requested {requested} physical frames, limit is {max}")]
    #[diagnostic(code(memory::too_many_frames))]
    TooManyFrames { requested: usize, max: usize },

    #[error("Page size must be non-zero")]
    #[diagnostic(code(memory::invalid_page_size))]
    InvalidPageSize,

    #[error("No resident page available for eviction")]
    #[diagnostic(code(memory::no_eviction_candidate))]
    NoEvictionCandidate,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),
}

/// Result of translating a (pid, vpn) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessOutcome {
    /// Page was resident
    Hit { frame: FrameIndex },
    /// Page was loaded, possibly displacing `evicted`
    Fault {
        frame: FrameIndex,
        evicted: Option<PageKey>,
    },
}

impl AccessOutcome {
    #[inline]
    pub fn frame(&self) -> FrameIndex {
        match *self {
            Self::Hit { frame } | Self::Fault { frame, .. } => frame,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    pub fn evicted(&self) -> Option<PageKey> {
        match *self {
            Self::Fault { evicted, .. } => evicted,
            Self::Hit { .. } => None,
        }
    }
}

/// Occupant of one physical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStatus {
    pub frame: FrameIndex,
    pub pid: Option<Pid>,
    pub vpn: Option<Vpn>,
}

impl FrameStatus {
    pub fn occupant(&self) -> Option<PageKey> {
        Some(PageKey::new(self.pid?, self.vpn?))
    }
}

/// Swap index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEntry {
    pub pid: Pid,
    pub vpn: Vpn,
    pub slot: SwapSlot,
}

/// Paging counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingStats {
    pub hits: u64,
    pub faults: u64,
    pub evictions: u64,
    pub swap_writes: u64,
    pub swap_bytes_written: u64,
}

impl PagingStats {
    /// Fraction of accesses that hit, 0.0 when nothing was accessed
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.faults;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Read-only snapshot of the paging engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingStatus {
    pub page_size: usize,
    pub frames: Vec<FrameStatus>,
    /// Resident pages, least recently used first
    pub lru_order: Vec<PageKey>,
    /// Swapped-out pages ordered by slot
    pub swap_index: Vec<SwapEntry>,
    pub stats: PagingStats,
}

impl PagingStatus {
    pub fn free_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.pid.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let hit = AccessOutcome::Hit { frame: 2 };
        assert!(hit.is_hit());
        assert_eq!(hit.frame(), 2);
        assert_eq!(hit.evicted(), None);

        let fault = AccessOutcome::Fault {
            frame: 0,
            evicted: Some(PageKey::new(1, 3)),
        };
        assert!(!fault.is_hit());
        assert_eq!(fault.evicted(), Some(PageKey::new(1, 3)));
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&AccessOutcome::Hit { frame: 1 }).unwrap();
        assert_eq!(json, r#"{"kind":"hit","frame":1}"#);
    }

    #[test]
    fn test_hit_ratio() {
        let stats = PagingStats {
            hits: 3,
            faults: 1,
            ..Default::default()
        };
        assert!((stats.hit_ratio() - 0.75).abs() < f64::EPSILON);
        assert_eq!(PagingStats::default().hit_ratio(), 0.0);
    }
}
