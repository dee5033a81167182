/*!
 * Paging Engine
 * Frame allocation, page-fault handling, LRU eviction and swap bookkeeping
 */

use super::types::{FrameStatus, MemoryError, MemoryResult, PagingStats, PagingStatus};
use crate::core::limits::MAX_PHYS_FRAMES;
use crate::core::types::{FrameIndex, PageKey, Pid, SwapSlot};
use ahash::RandomState;
use std::collections::HashMap;
use tracing::info;

mod frames;
mod operations;
mod recency;
mod swap;

use frames::FrameTable;
use recency::RecencyList;
use swap::SwapIndex;

/// Demand-paging engine over a fixed set of physical frames
///
/// A page is in exactly one of three places: resident in a frame (and then
/// also in the recency list), recorded in the swap index, or absent.
#[derive(Debug)]
pub struct PagingEngine {
    page_size: usize,
    frames: FrameTable,
    recency: RecencyList,
    swap: SwapIndex,
    // Page counts of registered processes
    processes: HashMap<Pid, usize, RandomState>,
    stats: PagingStats,
}

impl PagingEngine {
    /// Create an engine with `phys_frames` empty frames of `page_size` bytes
    pub fn new(phys_frames: usize, page_size: usize) -> MemoryResult<Self> {
        if phys_frames == 0 {
            return Err(MemoryError::NoFrames);
        }
        if phys_frames > MAX_PHYS_FRAMES {
            return Err(MemoryError::TooManyFrames {
                requested: phys_frames,
                max: MAX_PHYS_FRAMES,
            });
        }
        if page_size == 0 {
            return Err(MemoryError::InvalidPageSize);
        }

        info!(phys_frames, page_size, "Paging engine initialized");

        Ok(Self {
            page_size,
            frames: FrameTable::new(phys_frames),
            recency: RecencyList::new(),
            swap: SwapIndex::new(),
            processes: HashMap::default(),
            stats: PagingStats::default(),
        })
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline]
    pub fn phys_frames(&self) -> usize {
        self.frames.capacity()
    }

    /// Frame currently backing `key`, if resident
    pub fn location_of(&self, key: PageKey) -> Option<FrameIndex> {
        self.frames.lookup(&key)
    }

    /// Swap slot recorded for `key`, if swapped out
    pub fn swap_slot_of(&self, key: PageKey) -> Option<SwapSlot> {
        self.swap.get(&key)
    }

    pub fn is_allocated(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    pub fn resident_pages(&self, pid: Pid) -> usize {
        self.frames.keys_of(pid).len()
    }

    pub fn swapped_pages(&self, pid: Pid) -> usize {
        self.swap.count_for(pid)
    }

    pub fn stats(&self) -> PagingStats {
        self.stats
    }

    /// Snapshot of frames, LRU order and swap index
    pub fn status(&self) -> PagingStatus {
        let frames = self
            .frames
            .iter()
            .map(|(frame, occupant)| FrameStatus {
                frame,
                pid: occupant.map(|k| k.pid),
                vpn: occupant.map(|k| k.vpn),
            })
            .collect();

        PagingStatus {
            page_size: self.page_size,
            frames,
            lru_order: self.recency.iter().copied().collect(),
            swap_index: self.swap.entries(),
            stats: self.stats,
        }
    }
}
