//! Segment records and the node arena that owns them.
//!
//! Every segment of a pool, allocated or gap, is one [`SegmentNode`]
//! record in the pool's [`NodeArena`]. The address-ordered segment list is
//! threaded through the records as `prev`/`next` indices, so the arena
//! owns the storage and the list is pure bookkeeping on top of it.
//! Records are addressed by [`NodeId`] because arena growth may move the
//! backing storage.

use silt_core::NodeId;

use crate::grow::{GrowVec, GrowthPolicy};

/// One segment record: a contiguous byte range `[base, base + size)` of a
/// pool, plus its list links and liveness flags.
///
/// A record with `used == false` is dead: its slot is free for reuse and
/// nothing in the pool refers to it. A live record is an allocation when
/// `allocated` is set and a gap otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SegmentNode {
    /// Byte length of the segment. Strictly positive while `used`.
    pub size: usize,
    /// Byte offset of the segment within the pool's region.
    pub base: usize,
    /// Whether this record is live (occupies a range of the pool).
    pub used: bool,
    /// Whether the live segment is handed out (`true`) or free space.
    pub allocated: bool,
    /// Previous live segment in address order, if any.
    pub prev: Option<NodeId>,
    /// Next live segment in address order, if any.
    pub next: Option<NodeId>,
}

impl SegmentNode {
    /// Whether this record is a gap: live but not handed out.
    pub fn is_gap(&self) -> bool {
        self.used && !self.allocated
    }
}

/// Dense storage owning all segment records for one pool.
///
/// Released records go dead in place; compaction would invalidate every
/// `NodeId` held by the segment list and the gap index, so the arena
/// never compacts. Acquisition reuses the first dead slot found by
/// linear scan; the scan stays cheap because the record count is bounded
/// by one more than twice the allocation count.
#[derive(Debug)]
pub(crate) struct NodeArena {
    nodes: GrowVec<SegmentNode>,
    used_nodes: usize,
}

impl NodeArena {
    /// Create an empty arena with the given growth parameters.
    pub fn new(policy: GrowthPolicy) -> Self {
        Self {
            nodes: GrowVec::new(policy),
            used_nodes: 0,
        }
    }

    /// Count of live records.
    pub fn used_nodes(&self) -> usize {
        self.used_nodes
    }

    /// Current slot capacity.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Apply the fill-factor rule ahead of a possible [`acquire`].
    ///
    /// [`acquire`]: NodeArena::acquire
    pub fn reserve(&mut self) {
        self.nodes.ensure_room(self.used_nodes);
    }

    /// Make a dead slot live and return its ID.
    ///
    /// The returned record is blank: zero size and base, not allocated,
    /// unlinked. The caller initialises it before linking it anywhere.
    pub fn acquire(&mut self) -> NodeId {
        self.nodes.ensure_room(self.used_nodes);
        let index = self
            .nodes
            .as_slice()
            .iter()
            .position(|node| !node.used)
            .expect("fill factor below 1 leaves a dead slot after growth");
        self.nodes[index] = SegmentNode {
            used: true,
            ..SegmentNode::default()
        };
        self.used_nodes += 1;
        NodeId(index as u32)
    }

    /// Mark a live record dead and zero it in place.
    ///
    /// The slot is not compacted away; a later [`acquire`] may reuse it.
    ///
    /// [`acquire`]: NodeArena::acquire
    pub fn release(&mut self, id: NodeId) {
        debug_assert!(self.nodes[id.index()].used, "releasing a dead node {id}");
        self.nodes[id.index()] = SegmentNode::default();
        self.used_nodes -= 1;
    }

    /// Shared access to a record.
    pub fn node(&self, id: NodeId) -> &SegmentNode {
        &self.nodes[id.index()]
    }

    /// Mutable access to a record.
    pub fn node_mut(&mut self, id: NodeId) -> &mut SegmentNode {
        &mut self.nodes[id.index()]
    }

    /// Splice `node` into the list immediately after `anchor`.
    pub fn link_after(&mut self, anchor: NodeId, node: NodeId) {
        let successor = self.node(anchor).next;
        {
            let n = self.node_mut(node);
            n.prev = Some(anchor);
            n.next = successor;
        }
        self.node_mut(anchor).next = Some(node);
        if let Some(succ) = successor {
            self.node_mut(succ).prev = Some(node);
        }
    }

    /// Detach `node` from the list, joining its neighbours.
    pub fn unlink(&mut self, node: NodeId) {
        let (prev, next) = {
            let n = self.node(node);
            (n.prev, n.next)
        };
        if let Some(p) = prev {
            self.node_mut(p).next = next;
        }
        if let Some(s) = next {
            self.node_mut(s).prev = prev;
        }
        let n = self.node_mut(node);
        n.prev = None;
        n.next = None;
    }

    /// Walk the list from `head` in address order.
    pub fn iter_from(&self, head: NodeId) -> ListIter<'_> {
        ListIter {
            arena: self,
            cursor: Some(head),
        }
    }
}

/// Iterator over `(NodeId, &SegmentNode)` pairs following `next` links.
pub(crate) struct ListIter<'a> {
    arena: &'a NodeArena,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = (NodeId, &'a SegmentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.arena.node(id);
        self.cursor = node.next;
        Some((id, node))
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

    #[test]
    fn acquire_returns_blank_live_record() {
        let mut arena = NodeArena::new(TINY);
        let id = arena.acquire();
        let node = arena.node(id);
        assert!(node.used);
        assert!(!node.allocated);
        assert_eq!(node.size, 0);
        assert_eq!(node.prev, None);
        assert_eq!(arena.used_nodes(), 1);
    }

    #[test]
    fn release_makes_slot_reusable_in_place() {
        let mut arena = NodeArena::new(TINY);
        let a = arena.acquire();
        let b = arena.acquire();
        arena.release(a);
        assert_eq!(arena.used_nodes(), 1);
        // The first dead slot found by scan is a's old slot.
        let c = arena.acquire();
        assert_eq!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn acquire_scans_for_first_dead_slot() {
        let mut arena = NodeArena::new(TINY);
        let ids: Vec<_> = (0..3).map(|_| arena.acquire()).collect();
        arena.release(ids[1]);
        assert_eq!(arena.acquire(), ids[1]);
    }

    #[test]
    fn arena_grows_under_fill_pressure() {
        let mut arena = NodeArena::new(TINY);
        for _ in 0..10 {
            arena.acquire();
        }
        assert_eq!(arena.used_nodes(), 10);
        assert!(arena.capacity() >= 10);
        // Fill-factor invariant immediately after growth.
        assert!(arena.used_nodes() as f32 / arena.capacity() as f32 <= 0.75 + f32::EPSILON);
    }

    #[test]
    fn links_survive_growth() {
        let mut arena = NodeArena::new(TINY);
        let head = arena.acquire();
        let second = arena.acquire();
        arena.link_after(head, second);
        // Push the arena through at least one growth step.
        for _ in 0..12 {
            arena.acquire();
        }
        assert_eq!(arena.node(head).next, Some(second));
        assert_eq!(arena.node(second).prev, Some(head));
    }

    #[test]
    fn link_after_fixes_successor_back_link() {
        let mut arena = NodeArena::new(TINY);
        let a = arena.acquire();
        let c = arena.acquire();
        arena.link_after(a, c);
        let b = arena.acquire();
        arena.link_after(a, b);

        let order: Vec<_> = arena.iter_from(a).map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(arena.node(c).prev, Some(b));
        assert_eq!(arena.node(b).prev, Some(a));
    }

    #[test]
    fn unlink_joins_neighbours() {
        let mut arena = NodeArena::new(TINY);
        let a = arena.acquire();
        let b = arena.acquire();
        let c = arena.acquire();
        arena.link_after(a, b);
        arena.link_after(b, c);

        arena.unlink(b);
        assert_eq!(arena.node(a).next, Some(c));
        assert_eq!(arena.node(c).prev, Some(a));
        assert_eq!(arena.node(b).prev, None);
        assert_eq!(arena.node(b).next, None);
    }

    #[test]
    fn unlink_tail_clears_predecessor_forward_link() {
        let mut arena = NodeArena::new(TINY);
        let a = arena.acquire();
        let b = arena.acquire();
        arena.link_after(a, b);

        arena.unlink(b);
        assert_eq!(arena.node(a).next, None);
    }
}
