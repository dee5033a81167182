/*!
 * Kernel Orchestrator
 * Owns the paging engine, scheduler and process table behind one lock
 */

use crate::core::types::{KernelResult, Pid};
use crate::memory::PagingEngine;
use crate::process::SharedProcess;
use crate::scheduler::Scheduler;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub mod builder;
pub mod config;
pub mod driver;
mod operations;
pub mod types;

pub use builder::KernelBuilder;
pub use config::KernelConfig;
pub use driver::{DriverCommand, DriverHandle};
pub use types::{AccessRecord, KernelSnapshot, StepReport};

/// Mutable simulation state, only reachable through the kernel lock
#[derive(Debug)]
pub(crate) struct KernelState {
    pub engine: PagingEngine,
    pub scheduler: Scheduler,
    pub processes: BTreeMap<Pid, SharedProcess>,
    pub next_pid: Pid,
    pub steps: u64,
}

/// Kernel handle
///
/// Cheap to clone; clones share state. Every operation takes the single
/// state lock for its whole duration, so a step (pick, page accesses,
/// requeue) is never observed half-done by `inspect` or a concurrent
/// create/kill.
#[derive(Debug, Clone)]
pub struct Kernel {
    state: Arc<Mutex<KernelState>>,
    config: Arc<KernelConfig>,
}

impl Kernel {
    /// Create a kernel from a validated configuration
    pub fn new(config: KernelConfig) -> KernelResult<Self> {
        config.validate()?;
        let engine = PagingEngine::new(config.phys_frames, config.page_size)?;

        info!(
            phys_frames = config.phys_frames,
            page_size = config.page_size,
            tick_ms = config.tick_interval.as_millis() as u64,
            "Kernel initialized"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(KernelState {
                engine,
                scheduler: Scheduler::new(),
                processes: BTreeMap::new(),
                next_pid: 1,
                steps: 0,
            })),
            config: Arc::new(config),
        })
    }

    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}
