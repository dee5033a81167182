/*!
 * Kernel Operations
 * Process lifecycle, scheduling steps and inspection
 */

use super::types::{AccessRecord, KernelSnapshot, StepReport};
use super::{Kernel, KernelState};
use crate::core::errors::KernelError;
use crate::core::types::{KernelResult, Pid, Priority};
use crate::monitoring::span_step;
use crate::process::{Process, ProcessState, SharedProcess};
use tracing::{debug, info, warn};

impl KernelState {
    fn lookup(&self, pid: Pid) -> KernelResult<SharedProcess> {
        self.processes
            .get(&pid)
            .cloned()
            .ok_or(KernelError::UnknownProcess(pid))
    }
}

impl Kernel {
    /// Create a process, register its pages and admit it to the scheduler
    pub fn create_process(
        &self,
        name: &str,
        size: usize,
        priority: Priority,
        critical: bool,
    ) -> KernelResult<Pid> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let pid = state.next_pid;
        let mut process = Process::new(pid, name, size, priority, critical);
        state.engine.allocate(&mut process)?;
        state.next_pid += 1;

        info!("Created {}", process);

        let shared = process.into_shared();
        state.processes.insert(pid, shared.clone());
        // Nothing is running between steps; the new arrival competes at the next pick
        state.scheduler.add(&shared);

        Ok(pid)
    }

    /// Terminate a process and reclaim its frames and swap entries
    ///
    /// Killing an already terminated process is a no-op.
    pub fn kill_process(&self, pid: Pid) -> KernelResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let process = state.lookup(pid)?;

        {
            let mut p = process.write();
            if p.is_terminated() {
                debug!(pid, "Process already terminated");
                return Ok(());
            }
            p.transition(ProcessState::Terminated)?;
        }

        let frames = state.engine.free_process(pid);
        state.scheduler.remove(pid);

        info!(pid, frames, "Killed process");
        Ok(())
    }

    /// Run one quantum
    ///
    /// Picks the next process, touches each of its pages in ascending order
    /// and requeues it. Returns `None` when nothing is runnable.
    pub fn step(&self) -> Option<StepReport> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.steps += 1;
        let _span = span_step(state.steps).entered();

        let Some(process) = state.scheduler.pick_next() else {
            debug!("No process ready to run");
            return None;
        };

        let (pid, page_count) = {
            let p = process.read();
            debug!("Running {}", *p);
            (p.pid(), p.page_count().unwrap_or_default())
        };

        let mut report = StepReport {
            pid,
            accesses: Vec::with_capacity(page_count),
            error: None,
        };

        for vpn in 0..page_count {
            let result = {
                let p = process.read();
                state.engine.access(&p, vpn, false)
            };

            match result {
                Ok(outcome) => report.accesses.push(AccessRecord { vpn, outcome }),
                Err(e) => {
                    warn!(pid, vpn, error = %e, "Page access failed, ending quantum");
                    report.error = Some(e);
                    break;
                }
            }
        }

        state.scheduler.add(&process);

        debug!(
            pid,
            hits = report.hits(),
            faults = report.faults(),
            "Time slice over"
        );
        Some(report)
    }

    /// Reassign a process priority; applies from its next admission
    pub fn set_priority(&self, pid: Pid, priority: Priority) -> KernelResult<()> {
        let state = self.state.lock();
        let process = state.lookup(pid)?;
        let old = {
            let mut p = process.write();
            let old = p.priority();
            p.set_priority(priority);
            old
        };

        info!(pid, old, new = priority, "Updated priority");
        Ok(())
    }

    /// Move a process to Waiting
    pub fn block(&self, pid: Pid) -> KernelResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let process = state.lookup(pid)?;
        state.scheduler.block(&process);
        Ok(())
    }

    /// Return a blocked process to the ready queues
    pub fn unblock(&self, pid: Pid) -> KernelResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let process = state.lookup(pid)?;
        state.scheduler.unblock(&process);
        Ok(())
    }

    /// Consistent snapshot of processes, memory and scheduler
    pub fn inspect(&self) -> KernelSnapshot {
        let state = self.state.lock();
        KernelSnapshot {
            processes: state.processes.values().map(|p| p.read().info()).collect(),
            memory: state.engine.status(),
            scheduler: state.scheduler.status(),
        }
    }

    /// Number of processes ever created and not yet forgotten
    pub fn process_count(&self) -> usize {
        self.state.lock().processes.len()
    }
}
