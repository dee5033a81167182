/*!
 * Paging Kernel Library
 * Demand paging with LRU eviction and a priority scheduler with
 * non-preemptible critical sections, driven by a small orchestrator
 */

pub mod core;
pub mod kernel;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod scheduler;

// Re-exports
pub use crate::core::errors::KernelError;
pub use crate::core::types::{FrameIndex, KernelResult, PageKey, Pid, Priority, SwapSlot, Vpn};
pub use kernel::{DriverHandle, Kernel, KernelBuilder, KernelConfig, KernelSnapshot, StepReport};
pub use memory::{AccessOutcome, MemoryError, PagingEngine, PagingStatus};
pub use monitoring::init_tracing;
pub use process::{Process, ProcessError, ProcessState, SharedProcess};
pub use scheduler::{Scheduler, SchedulerStatus};
