/*!
 * Frame Table
 * Physical frame slots and the resident-page location index
 */

use crate::core::types::{FrameIndex, PageKey, Pid};
use ahash::RandomState;
use std::collections::HashMap;

/// Physical frames plus their inverse mapping
///
/// `location[key] == f` iff `slots[f] == Some(key)`. Every mutation goes
/// through `occupy`/`vacate`, which update both sides together.
#[derive(Debug)]
pub(super) struct FrameTable {
    slots: Vec<Option<PageKey>>,
    location: HashMap<PageKey, FrameIndex, RandomState>,
}

impl FrameTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            location: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn lookup(&self, key: &PageKey) -> Option<FrameIndex> {
        self.location.get(key).copied()
    }

    /// Lowest-indexed empty frame
    pub fn first_free(&self) -> Option<FrameIndex> {
        self.slots.iter().position(Option::is_none)
    }

    /// Place `key` into an empty `frame`
    pub fn occupy(&mut self, frame: FrameIndex, key: PageKey) {
        debug_assert!(self.slots[frame].is_none(), "frame {} already occupied", frame);
        debug_assert!(!self.location.contains_key(&key), "page {} already resident", key);
        self.slots[frame] = Some(key);
        self.location.insert(key, frame);
    }

    /// Empty `frame`, returning whatever it held
    pub fn vacate(&mut self, frame: FrameIndex) -> Option<PageKey> {
        let key = self.slots.get_mut(frame)?.take()?;
        self.location.remove(&key);
        Some(key)
    }

    /// Resident pages owned by `pid`
    pub fn keys_of(&self, pid: Pid) -> Vec<PageKey> {
        self.location.keys().filter(|k| k.pid == pid).copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, Option<PageKey>)> + '_ {
        self.slots.iter().copied().enumerate()
    }

    #[inline]
    pub fn resident(&self) -> usize {
        self.location.len()
    }
}
