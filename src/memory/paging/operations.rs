/*!
 * Paging Operations
 * Allocation, translate-or-fault access and per-process teardown
 */

use super::PagingEngine;
use crate::core::types::{FrameIndex, PageKey, Pid, Vpn};
use crate::memory::types::{AccessOutcome, MemoryError, MemoryResult};
use crate::process::Process;
use tracing::{debug, info, instrument, trace};

impl PagingEngine {
    /// Register every page of `process` as absent
    ///
    /// Fixes the process page size to the engine's and returns the page count.
    pub fn allocate(&mut self, process: &mut Process) -> MemoryResult<usize> {
        let pid = process.pid();
        if self.processes.contains_key(&pid) {
            return Err(MemoryError::AlreadyAllocated(pid));
        }

        let page_count = process.set_page_size(self.page_size)?;
        self.processes.insert(pid, page_count);

        debug!(pid, page_count, "Registered process pages");
        Ok(page_count)
    }

    /// Translate `(pid, vpn)` to a frame, faulting the page in if needed
    ///
    /// `write` is accepted for interface stability; it does not influence
    /// hit/fault or eviction behavior.
    pub fn access(
        &mut self,
        process: &Process,
        vpn: Vpn,
        write: bool,
    ) -> MemoryResult<AccessOutcome> {
        let pid = process.pid();
        let page_count = *self
            .processes
            .get(&pid)
            .ok_or(MemoryError::UnknownProcess(pid))?;

        if vpn >= page_count {
            return Err(MemoryError::InvalidAddress {
                pid,
                vpn,
                page_count,
            });
        }

        let key = PageKey::new(pid, vpn);

        if let Some(frame) = self.frames.lookup(&key) {
            self.recency.touch(key);
            self.stats.hits += 1;
            trace!(pid, vpn, frame, write, "Page hit");
            return Ok(AccessOutcome::Hit { frame });
        }

        // Fault path: at most one eviction, one load
        let (frame, evicted) = match self.frames.first_free() {
            Some(frame) => (frame, None),
            None => {
                let (frame, victim) = self.evict_lru()?;
                (frame, Some(victim))
            }
        };

        self.frames.occupy(frame, key);
        self.recency.touch(key);
        self.swap.take(&key);
        self.stats.faults += 1;
        debug_assert_eq!(self.recency.len(), self.frames.resident());
        debug_assert!(self.recency.contains(&key));

        debug!(
            pid,
            vpn,
            frame,
            write,
            evicted = ?evicted,
            "Page fault"
        );

        Ok(AccessOutcome::Fault { frame, evicted })
    }

    /// Evict the least recently used resident page into a fresh swap slot
    fn evict_lru(&mut self) -> MemoryResult<(FrameIndex, PageKey)> {
        let victim = self
            .recency
            .pop_oldest()
            .ok_or(MemoryError::NoEvictionCandidate)?;
        let frame = self
            .frames
            .lookup(&victim)
            .ok_or(MemoryError::NoEvictionCandidate)?;

        self.frames.vacate(frame);
        let slot = self.swap.write(victim);
        debug_assert!(self.swap.len() as u64 <= self.stats.swap_writes + 1);

        self.stats.evictions += 1;
        self.stats.swap_writes += 1;
        self.stats.swap_bytes_written += self.page_size as u64;

        trace!(pid = victim.pid, vpn = victim.vpn, frame, slot, "Evicted page to swap");
        Ok((frame, victim))
    }

    /// Release every resident and swapped page of `pid`
    ///
    /// Idempotent; returns the number of frames reclaimed.
    #[instrument(level = "debug", skip(self))]
    pub fn free_process(&mut self, pid: Pid) -> usize {
        let resident = self.frames.keys_of(pid);
        for key in &resident {
            if let Some(frame) = self.frames.lookup(key) {
                self.frames.vacate(frame);
            }
            self.recency.remove(key);
        }

        let swapped = self.swap.remove_process(pid);
        let registered = self.processes.remove(&pid).is_some();

        if registered || !resident.is_empty() || swapped > 0 {
            info!(
                pid,
                frames = resident.len(),
                swap_entries = swapped,
                "Freed process pages"
            );
        }

        resident.len()
    }
}
