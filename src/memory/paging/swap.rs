/*!
 * Swap Index
 * Bookkeeping for evicted pages
 */

use crate::core::types::{PageKey, Pid, SwapSlot};
use crate::memory::types::SwapEntry;
use ahash::RandomState;
use std::collections::HashMap;

/// Where each evicted page was written
///
/// Slots are content-free identifiers drawn from a monotonic counter. A slot
/// is never handed out twice, even after the page it named is reloaded or
/// its owner is freed; swap storage is not compacted.
#[derive(Debug, Default)]
pub(super) struct SwapIndex {
    next_slot: SwapSlot,
    slots: HashMap<PageKey, SwapSlot, RandomState>,
}

impl SwapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as written to a fresh slot
    pub fn write(&mut self, key: PageKey) -> SwapSlot {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.slots.insert(key, slot);
        slot
    }

    /// Drop the entry for `key`, freeing its slot
    pub fn take(&mut self, key: &PageKey) -> Option<SwapSlot> {
        self.slots.remove(key)
    }

    pub fn get(&self, key: &PageKey) -> Option<SwapSlot> {
        self.slots.get(key).copied()
    }

    /// Drop every entry owned by `pid`, returning how many were removed
    pub fn remove_process(&mut self, pid: Pid) -> usize {
        let before = self.slots.len();
        self.slots.retain(|key, _| key.pid != pid);
        before - self.slots.len()
    }

    pub fn count_for(&self, pid: Pid) -> usize {
        self.slots.keys().filter(|k| k.pid == pid).count()
    }

    /// Entries ordered by slot
    pub fn entries(&self) -> Vec<SwapEntry> {
        let mut entries: Vec<SwapEntry> = self
            .slots
            .iter()
            .map(|(key, &slot)| SwapEntry {
                pid: key.pid,
                vpn: key.vpn,
                slot,
            })
            .collect();
        entries.sort_unstable_by_key(|e| e.slot);
        entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
