/*!
 * Scheduler Core Operations
 * Admission, selection, preemption and blocking
 */

use super::entry::Entry;
use super::Scheduler;
use crate::core::types::Pid;
use crate::process::{ProcessState, SharedProcess};
use tracing::{debug, info, trace, warn};

impl Scheduler {
    /// Admit `process` to the tail of the ready queue for its priority
    ///
    /// Terminated processes are ignored. Re-admitting the running process
    /// vacates the running slot; re-admitting a queued process moves it to the
    /// tail of the queue for its current priority.
    pub fn add(&mut self, process: &SharedProcess) {
        let (pid, priority) = {
            let mut p = process.write();
            if p.is_terminated() {
                trace!(pid = p.pid(), "Ignoring admission of terminated process");
                return;
            }
            if let Err(e) = p.transition(ProcessState::Ready) {
                warn!(error = %e, "Refusing admission");
                return;
            }
            (p.pid(), p.priority())
        };

        if self.running() == Some(pid) {
            self.running = None;
        }
        self.blocked.remove(&pid);
        self.dequeue(pid);

        self.ready
            .entry(priority)
            .or_default()
            .push_back(Entry::new(pid, process));
        self.locations.insert(pid, priority);

        debug!(pid, priority, "Process admitted to ready queue");
    }

    /// Choose the process to run next
    ///
    /// A running critical process continues without touching the queues.
    /// Otherwise the head of the highest non-empty priority level is taken,
    /// discarding terminated entries on the way. Entries that cannot enter
    /// Running are moved to the blocked set. `None` means no runnable work.
    pub fn pick_next(&mut self) -> Option<SharedProcess> {
        if let Some(current) = &self.running {
            if current.is_terminated() {
                self.running = None;
            } else if current.is_critical() {
                self.stats.critical_continuations += 1;
                trace!(pid = current.pid, "Critical section continues");
                return Some(current.process.clone());
            }
        }

        for (&priority, queue) in self.ready.iter_mut().rev() {
            while let Some(entry) = queue.pop_front() {
                self.locations.remove(&entry.pid);

                let mut p = entry.process.write();
                if p.is_terminated() {
                    self.stats.dropped_terminated += 1;
                    trace!(pid = entry.pid, "Dropped terminated entry");
                    continue;
                }
                if let Err(e) = p.transition(ProcessState::Running) {
                    // Parked so that unblock can readmit it
                    warn!(error = %e, "Parking unrunnable entry as blocked");
                    self.blocked.insert(entry.pid);
                    continue;
                }
                drop(p);

                self.stats.total_scheduled += 1;
                debug!(pid = entry.pid, priority, "Scheduled process");

                let process = entry.process.clone();
                self.running = Some(entry);
                return Some(process);
            }
        }

        None
    }

    /// Demote the running process if `incoming` outranks it
    ///
    /// Returns true when the running slot was vacated and a new pick should
    /// happen immediately. Critical processes are never preempted.
    pub fn preempt_if_needed(&mut self, incoming: &SharedProcess) -> bool {
        let Some(current) = self.running.clone() else {
            return false;
        };

        let (critical, running_priority) = {
            let p = current.process.read();
            (p.is_critical(), p.priority())
        };
        if critical {
            return false;
        }

        let (incoming_pid, incoming_priority) = {
            let p = incoming.read();
            (p.pid(), p.priority())
        };
        if incoming_priority <= running_priority {
            return false;
        }

        self.running = None;
        self.add(&current.process);
        self.stats.preemptions += 1;

        info!(
            preempted = current.pid,
            by = incoming_pid,
            running_priority,
            incoming_priority,
            "Preempted running process"
        );
        true
    }

    /// Move `process` to Waiting
    ///
    /// No-op for already blocked or terminated processes.
    pub fn block(&mut self, process: &SharedProcess) {
        let pid = {
            let mut p = process.write();
            if p.is_terminated() || self.blocked.contains(&p.pid()) {
                return;
            }
            if let Err(e) = p.transition(ProcessState::Waiting) {
                warn!(error = %e, "Refusing to block");
                return;
            }
            p.pid()
        };

        if self.running() == Some(pid) {
            self.running = None;
        }
        self.dequeue(pid);
        self.blocked.insert(pid);

        debug!(pid, "Process blocked");
    }

    /// Return a blocked process to its ready queue
    ///
    /// No-op if the process is not blocked.
    pub fn unblock(&mut self, process: &SharedProcess) {
        let pid = process.read().pid();
        if !self.blocked.remove(&pid) {
            return;
        }

        debug!(pid, "Process unblocked");
        self.add(process);
    }

    /// Forget `pid` entirely: queues, running slot and blocked set
    pub fn remove(&mut self, pid: Pid) -> bool {
        let mut removed = self.dequeue(pid);
        if self.running() == Some(pid) {
            self.running = None;
            removed = true;
        }
        removed |= self.blocked.remove(&pid);

        if removed {
            debug!(pid, "Process removed from scheduler");
        }
        removed
    }

    /// Take `pid` out of whichever ready queue holds it
    fn dequeue(&mut self, pid: Pid) -> bool {
        let Some(priority) = self.locations.remove(&pid) else {
            return false;
        };

        match self.ready.get_mut(&priority) {
            Some(queue) => match queue.iter().position(|e| e.pid == pid) {
                Some(pos) => {
                    queue.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        }
    }
}
