/*!
 * Recency List
 * Exact LRU ordering over resident pages
 */

use crate::core::types::PageKey;
use ahash::RandomState;
use std::collections::{BTreeMap, HashMap};

/// Access-ordered set of resident pages
///
/// Each touch stamps the key with a fresh value from a logical clock, so the
/// smallest stamp is always the least recently used page and equally stale
/// pages come out in the order they were first admitted. Eviction is
/// O(log F) through the ordered stamp map.
#[derive(Debug, Default)]
pub(super) struct RecencyList {
    clock: u64,
    stamps: HashMap<PageKey, u64, RandomState>,
    order: BTreeMap<u64, PageKey>,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as most recently used, inserting it if absent
    pub fn touch(&mut self, key: PageKey) {
        if let Some(old) = self.stamps.insert(key, self.clock) {
            self.order.remove(&old);
        }
        self.order.insert(self.clock, key);
        self.clock += 1;
    }

    pub fn remove(&mut self, key: &PageKey) -> bool {
        match self.stamps.remove(key) {
            Some(stamp) => {
                self.order.remove(&stamp);
                true
            }
            None => false,
        }
    }

    /// Remove and return the least recently used key
    pub fn pop_oldest(&mut self) -> Option<PageKey> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    pub fn contains(&self, key: &PageKey) -> bool {
        self.stamps.contains_key(key)
    }

    /// Keys, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &PageKey> + '_ {
        self.order.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pid: u32, vpn: usize) -> PageKey {
        PageKey::new(pid, vpn)
    }

    #[test]
    fn test_untouched_pages_leave_in_admission_order() {
        let mut lru = RecencyList::new();
        lru.touch(key(1, 0));
        lru.touch(key(1, 1));
        lru.touch(key(2, 0));

        assert_eq!(lru.pop_oldest(), Some(key(1, 0)));
        assert_eq!(lru.pop_oldest(), Some(key(1, 1)));
        assert_eq!(lru.pop_oldest(), Some(key(2, 0)));
        assert_eq!(lru.pop_oldest(), None);
    }

    #[test]
    fn test_touch_moves_to_tail() {
        let mut lru = RecencyList::new();
        lru.touch(key(1, 0));
        lru.touch(key(1, 1));
        lru.touch(key(1, 0));

        let order: Vec<_> = lru.iter().copied().collect();
        assert_eq!(order, vec![key(1, 1), key(1, 0)]);
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut lru = RecencyList::new();
        lru.touch(key(1, 0));
        assert!(lru.remove(&key(1, 0)));
        assert!(!lru.remove(&key(1, 0)));
        assert!(!lru.contains(&key(1, 0)));
        assert_eq!(lru.len(), 0);
    }
}
