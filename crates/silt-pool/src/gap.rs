//! The gap index: a sorted dense array of placement candidates.
//!
//! The first `len` entries are exactly the gap segments of the pool,
//! ordered by `(size ascending, base ascending)`. Best-fit placement is
//! then a forward scan for the first sufficient entry: smallest size
//! wins, lowest base breaks ties. Entries past the sorted prefix are
//! kept zeroed.

use silt_core::NodeId;

use crate::grow::{GrowVec, GrowthPolicy};

/// One gap-index entry.
///
/// `size` and `base` are snapshots taken at insertion. They stay accurate
/// because a gap is removed from the index before anything mutates its
/// record; identity for removal is the node handle alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GapEntry {
    /// Byte length of the gap segment.
    pub size: usize,
    /// Byte offset of the gap segment within the pool's region.
    pub base: usize,
    /// The segment record this entry indexes. `None` only in zeroed slots
    /// beyond the sorted prefix.
    pub node: Option<NodeId>,
}

impl GapEntry {
    fn key(&self) -> (usize, usize) {
        (self.size, self.base)
    }
}

/// Sorted dense index over the gap segments of one pool.
#[derive(Debug)]
pub(crate) struct GapIndex {
    entries: GrowVec<GapEntry>,
    len: usize,
}

impl GapIndex {
    /// Create an empty index with the given growth parameters.
    pub fn new(policy: GrowthPolicy) -> Self {
        Self {
            entries: GrowVec::new(policy),
            len: 0,
        }
    }

    /// Number of gaps currently indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the pool currently has no gaps at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot capacity.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Size of the largest indexed gap, or 0 if there is none.
    ///
    /// O(1): the sort order puts the largest gap last.
    pub fn largest(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.entries[self.len - 1].size
        }
    }

    /// Insert an entry for a gap segment.
    ///
    /// Appends at the end of the sorted prefix, then bubbles the new
    /// entry toward the front while its `(size, base)` key is strictly
    /// below its predecessor's. One pass restores the total order because
    /// the prefix was already sorted.
    pub fn insert(&mut self, size: usize, base: usize, node: NodeId) {
        self.entries.ensure_room(self.len);
        self.entries[self.len] = GapEntry {
            size,
            base,
            node: Some(node),
        };
        self.len += 1;

        let mut i = self.len - 1;
        while i > 0 && self.entries[i].key() < self.entries[i - 1].key() {
            self.entries.as_mut_slice().swap(i, i - 1);
            i -= 1;
        }
    }

    /// Remove the entry for `node`, preserving the sort order.
    ///
    /// The suffix `[position, len)` shifts one slot left and the vacated
    /// last slot is re-zeroed. Returns `false` when no entry carries the
    /// handle; the caller treats that as corrupted bookkeeping.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let Some(position) = self.entries.as_slice()[..self.len]
            .iter()
            .position(|entry| entry.node == Some(node))
        else {
            return false;
        };
        for i in position..self.len - 1 {
            self.entries[i] = self.entries[i + 1];
        }
        self.len -= 1;
        self.entries[self.len] = GapEntry::default();
        true
    }

    /// The smallest sufficient gap for `size`: first entry in sort order
    /// whose size is at least the request.
    pub fn best_fit(&self, size: usize) -> Option<NodeId> {
        self.entries.as_slice()[..self.len]
            .iter()
            .find(|entry| entry.size >= size)
            .and_then(|entry| entry.node)
    }

    /// The sorted prefix of live entries.
    pub fn entries(&self) -> &[GapEntry] {
        &self.entries.as_slice()[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: GrowthPolicy = GrowthPolicy {
        initial_capacity: 4,
        fill_factor: 0.75,
        growth_factor: 2,
    };

    fn keys(index: &GapIndex) -> Vec<(usize, usize)> {
        index.entries().iter().map(|e| (e.size, e.base)).collect()
    }

    #[test]
    fn insert_keeps_entries_sorted_by_size_then_base() {
        let mut index = GapIndex::new(TINY);
        index.insert(50, 0, NodeId(0));
        index.insert(10, 60, NodeId(1));
        index.insert(10, 20, NodeId(2));
        index.insert(30, 90, NodeId(3));
        assert_eq!(keys(&index), vec![(10, 20), (10, 60), (30, 90), (50, 0)]);
    }

    #[test]
    fn remove_shifts_suffix_and_zeroes_vacated_slot() {
        let mut index = GapIndex::new(TINY);
        index.insert(10, 0, NodeId(0));
        index.insert(20, 10, NodeId(1));
        index.insert(30, 30, NodeId(2));

        assert!(index.remove(NodeId(1)));
        assert_eq!(index.len(), 2);
        assert_eq!(keys(&index), vec![(10, 0), (30, 30)]);
        // The slot just past the prefix is zeroed, not stale.
        assert_eq!(index.entries.as_slice()[2], GapEntry::default());
    }

    #[test]
    fn remove_matches_on_handle_not_size() {
        let mut index = GapIndex::new(TINY);
        index.insert(10, 0, NodeId(7));
        // Same size as another entry; only the handle identifies it.
        index.insert(10, 50, NodeId(8));

        assert!(index.remove(NodeId(8)));
        assert_eq!(index.entries()[0].node, Some(NodeId(7)));
    }

    #[test]
    fn remove_of_unknown_handle_reports_failure() {
        let mut index = GapIndex::new(TINY);
        index.insert(10, 0, NodeId(0));
        assert!(!index.remove(NodeId(9)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn best_fit_selects_smallest_sufficient_lowest_base() {
        let mut index = GapIndex::new(TINY);
        index.insert(40, 0, NodeId(0));
        index.insert(10, 60, NodeId(1));
        index.insert(10, 20, NodeId(2));

        // Exact-size tie: the size-10 entry with base 20 sorts first.
        assert_eq!(index.best_fit(10), Some(NodeId(2)));
        // Only the 40-byte gap fits 11 bytes.
        assert_eq!(index.best_fit(11), Some(NodeId(0)));
        assert_eq!(index.best_fit(41), None);
    }

    #[test]
    fn largest_reads_the_sorted_tail() {
        let mut index = GapIndex::new(TINY);
        assert_eq!(index.largest(), 0);
        index.insert(30, 0, NodeId(0));
        index.insert(80, 40, NodeId(1));
        index.insert(5, 130, NodeId(2));
        assert_eq!(index.largest(), 80);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut index = GapIndex::new(TINY);
        for i in 0..12u32 {
            index.insert((i as usize + 1) * 10, i as usize * 100, NodeId(i));
        }
        assert_eq!(index.len(), 12);
        assert!(index.capacity() >= 12);
        let sorted = keys(&index);
        let mut expected = sorted.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prefix_stays_sorted_under_random_inserts(
                gaps in proptest::collection::vec((1usize..500, 0usize..10_000), 1..40),
            ) {
                let mut index = GapIndex::new(TINY);
                for (i, &(size, base)) in gaps.iter().enumerate() {
                    index.insert(size, base, NodeId(i as u32));
                }
                let entries = index.entries();
                prop_assert_eq!(entries.len(), gaps.len());
                for pair in entries.windows(2) {
                    prop_assert!(pair[0].key() <= pair[1].key());
                }
            }

            #[test]
            fn remove_preserves_order_and_remainder(
                gaps in proptest::collection::vec((1usize..500, 0usize..10_000), 2..30),
                victim in 0usize..29,
            ) {
                let mut index = GapIndex::new(TINY);
                for (i, &(size, base)) in gaps.iter().enumerate() {
                    index.insert(size, base, NodeId(i as u32));
                }
                let victim = victim % gaps.len();
                prop_assert!(index.remove(NodeId(victim as u32)));
                prop_assert_eq!(index.len(), gaps.len() - 1);
                let entries = index.entries();
                for pair in entries.windows(2) {
                    prop_assert!(pair[0].key() <= pair[1].key());
                }
                prop_assert!(entries.iter().all(|e| e.node != Some(NodeId(victim as u32))));
            }

            #[test]
            fn best_fit_agrees_with_brute_force(
                gaps in proptest::collection::vec((1usize..500, 0usize..10_000), 1..30),
                request in 1usize..600,
            ) {
                let mut index = GapIndex::new(TINY);
                for (i, &(size, base)) in gaps.iter().enumerate() {
                    index.insert(size, base, NodeId(i as u32));
                }
                let expected = gaps
                    .iter()
                    .enumerate()
                    .filter(|(_, &(size, _))| size >= request)
                    .min_by_key(|(_, &(size, base))| (size, base))
                    .map(|(i, _)| NodeId(i as u32));
                prop_assert_eq!(index.best_fit(request), expected);
            }
        }
    }
}
