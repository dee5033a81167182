/*!
 * Core Types
 * Common types used across the kernel
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process ID type
pub type Pid = u32;

/// Priority level (higher is more urgent)
pub type Priority = i32;

/// Virtual page number, zero-based within a process
pub type Vpn = usize;

/// Index of a physical frame
pub type FrameIndex = usize;

/// Opaque swap slot identifier
pub type SwapSlot = u64;

/// Common result type for kernel operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;

/// A virtual page of a specific process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageKey {
    pub pid: Pid,
    pub vpn: Vpn,
}

impl PageKey {
    #[inline]
    pub const fn new(pid: Pid, vpn: Vpn) -> Self {
        Self { pid, vpn }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.vpn)
    }
}

impl From<(Pid, Vpn)> for PageKey {
    fn from((pid, vpn): (Pid, Vpn)) -> Self {
        Self { pid, vpn }
    }
}
