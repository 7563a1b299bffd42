//! The pool manager: one backing region carved into segments.
//!
//! A [`Pool`] binds a byte region to three bookkeeping structures: the
//! node arena that owns segment records, the address-ordered segment
//! list threaded through them, and the sorted gap index. Every allocate
//! and free keeps all three mutually consistent. Allocations never
//! move; freeing coalesces with both neighbours so no two adjacent gaps
//! survive an operation.

use std::fmt;

use silt_core::{NodeId, PlacementPolicy, PoolError, Region, RegionSource};

use crate::config::PoolConfig;
use crate::gap::GapIndex;
use crate::handle::AllocHandle;
use crate::node::{NodeArena, SegmentNode};

/// One live segment as reported by [`Pool::inspect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Byte length of the segment.
    pub size: usize,
    /// Whether the segment is handed out (`true`) or a gap.
    pub allocated: bool,
}

/// Point-in-time counters for one pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolStats {
    /// Immutable byte capacity of the pool.
    pub total_size: usize,
    /// Total bytes currently handed out.
    pub alloc_size: usize,
    /// Count of live allocations.
    pub num_allocs: usize,
    /// Count of gaps. A quiescent pool has exactly one.
    pub num_gaps: usize,
    /// The pool's placement policy.
    pub policy: PlacementPolicy,
}

/// A fixed-size backing region carved into variable-size allocations.
///
/// Opened against a [`RegionSource`] with an immutable size and placement
/// policy. Dropping the pool releases the region, the node arena, and the
/// gap index; there is no partial teardown.
///
/// Between any two operations the pool upholds: live segments exactly
/// tile `[0, total_size)`; no two adjacent segments are both gaps; the
/// gap index holds exactly the gap segments sorted by `(size, base)`; and
/// `alloc_size` plus the gap bytes equals `total_size`.
pub struct Pool {
    region: Region,
    total_size: usize,
    alloc_size: usize,
    num_allocs: usize,
    policy: PlacementPolicy,
    /// First live segment in address order. The record at base 0 is
    /// seeded at open and can never be absorbed by a coalesce, so the
    /// head never moves.
    head: NodeId,
    arena: NodeArena,
    gaps: GapIndex,
}

impl Pool {
    /// Open a pool of exactly `size` bytes with the default configuration.
    pub fn open(
        size: usize,
        policy: PlacementPolicy,
        source: &mut dyn RegionSource,
    ) -> Result<Self, PoolError> {
        Self::open_with(&PoolConfig::default(), size, policy, source)
    }

    /// Open a pool of exactly `size` bytes.
    ///
    /// Acquires the backing region from `source`, then seeds segment 0 as
    /// a single gap covering the whole range and indexes it. A refusal
    /// from the source surfaces as [`PoolError::OutOfMemory`]; anything
    /// acquired before a failure is released by drop, so a failed open
    /// leaks nothing.
    pub fn open_with(
        config: &PoolConfig,
        size: usize,
        policy: PlacementPolicy,
        source: &mut dyn RegionSource,
    ) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::ZeroSize);
        }
        let region = source
            .acquire(size)
            .ok_or(PoolError::OutOfMemory { requested: size })?;

        let mut arena = NodeArena::new(config.node_growth);
        let mut gaps = GapIndex::new(config.gap_growth);

        let head = arena.acquire();
        {
            let node = arena.node_mut(head);
            node.size = size;
            node.base = 0;
        }
        gaps.insert(size, 0, head);

        Ok(Self {
            region,
            total_size: size,
            alloc_size: 0,
            num_allocs: 0,
            policy,
            head,
            arena,
            gaps,
        })
    }

    /// Carve `size` bytes out of a gap chosen by the pool's policy.
    ///
    /// First-fit scans the segment list in address order and takes the
    /// first sufficient gap; best-fit scans the gap index and takes the
    /// smallest sufficient gap, lowest base on ties. When the chosen gap
    /// is larger than the request, the remainder stays behind as a new
    /// gap spliced in immediately after the allocation.
    pub fn alloc(&mut self, size: usize) -> Result<AllocHandle, PoolError> {
        if size == 0 {
            return Err(PoolError::ZeroSize);
        }
        if self.gaps.is_empty() {
            return Err(PoolError::NoFit {
                requested: size,
                largest_gap: 0,
            });
        }

        // Make node-arena room for a potential split before touching
        // anything, so a growth step cannot interleave with the splice.
        self.arena.reserve();

        let victim = match self.policy {
            PlacementPolicy::FirstFit => self.first_fit(size),
            PlacementPolicy::BestFit => self.gaps.best_fit(size),
        };
        let Some(victim) = victim else {
            return Err(PoolError::NoFit {
                requested: size,
                largest_gap: self.gaps.largest(),
            });
        };

        if !self.gaps.remove(victim) {
            return Err(PoolError::GapIndexDesync { node: victim });
        }

        let (victim_base, victim_size) = {
            let node = self.arena.node(victim);
            (node.base, node.size)
        };
        let remainder = victim_size - size;

        {
            let node = self.arena.node_mut(victim);
            node.allocated = true;
            node.size = size;
        }

        if remainder > 0 {
            let rest = self.arena.acquire();
            let rest_base = victim_base + size;
            {
                let node = self.arena.node_mut(rest);
                node.size = remainder;
                node.base = rest_base;
            }
            self.arena.link_after(victim, rest);
            self.gaps.insert(remainder, rest_base, rest);
        }

        self.num_allocs += 1;
        self.alloc_size += size;

        Ok(AllocHandle {
            node: victim,
            base: victim_base,
            len: size,
        })
    }

    /// Return an allocation to the pool and coalesce with neighbours.
    ///
    /// The handle is re-validated against the segment record first;
    /// double-frees and stale handles fail with
    /// [`PoolError::UnknownAllocation`]. The freed segment merges forward
    /// into a following gap, then backward into a preceding one, and the
    /// survivor is re-indexed. A missing gap-index entry for a neighbour
    /// aborts with [`PoolError::GapIndexDesync`], leaving the pool
    /// consistent but less coalesced.
    pub fn free(&mut self, handle: AllocHandle) -> Result<(), PoolError> {
        self.validate(&handle)?;

        let mut survivor = handle.node;
        self.arena.node_mut(survivor).allocated = false;
        self.num_allocs -= 1;
        self.alloc_size -= handle.len;

        // Forward: absorb a following gap into the freed segment.
        if let Some(next) = self.arena.node(survivor).next {
            if self.arena.node(next).is_gap() {
                if !self.gaps.remove(next) {
                    return Err(PoolError::GapIndexDesync { node: next });
                }
                let next_size = self.arena.node(next).size;
                self.arena.node_mut(survivor).size += next_size;
                self.arena.unlink(next);
                self.arena.release(next);
            }
        }

        // Backward: the preceding gap absorbs the freed segment.
        if let Some(prev) = self.arena.node(survivor).prev {
            if self.arena.node(prev).is_gap() {
                if !self.gaps.remove(prev) {
                    return Err(PoolError::GapIndexDesync { node: prev });
                }
                let merged_size = self.arena.node(survivor).size;
                self.arena.node_mut(prev).size += merged_size;
                self.arena.unlink(survivor);
                self.arena.release(survivor);
                survivor = prev;
            }
        }

        let (size, base) = {
            let node = self.arena.node(survivor);
            (node.size, node.base)
        };
        self.gaps.insert(size, base, survivor);
        Ok(())
    }

    /// Every live segment in address order.
    pub fn inspect(&self) -> Vec<SegmentInfo> {
        self.arena
            .iter_from(self.head)
            .map(|(_, node)| SegmentInfo {
                size: node.size,
                allocated: node.allocated,
            })
            .collect()
    }

    /// The bytes of a live allocation.
    pub fn bytes(&self, handle: &AllocHandle) -> Result<&[u8], PoolError> {
        self.validate(handle)?;
        Ok(&self.region.as_slice()[handle.base..handle.base + handle.len])
    }

    /// The bytes of a live allocation, mutably.
    pub fn bytes_mut(&mut self, handle: &AllocHandle) -> Result<&mut [u8], PoolError> {
        self.validate(handle)?;
        Ok(&mut self.region.as_mut_slice()[handle.base..handle.base + handle.len])
    }

    /// Immutable byte capacity of the pool.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Total bytes currently handed out.
    pub fn alloc_size(&self) -> usize {
        self.alloc_size
    }

    /// Count of live allocations.
    pub fn num_allocs(&self) -> usize {
        self.num_allocs
    }

    /// Count of gaps.
    pub fn num_gaps(&self) -> usize {
        self.gaps.len()
    }

    /// The pool's placement policy.
    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    /// Count of live segment records (allocations plus gaps).
    pub fn used_nodes(&self) -> usize {
        self.arena.used_nodes()
    }

    /// Slot capacity of the node arena.
    pub fn node_capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Gap `(size, base)` pairs in index order: size ascending, base
    /// breaking ties.
    pub fn gap_entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.gaps.entries().iter().map(|e| (e.size, e.base))
    }

    /// Whether the pool is back to a single whole-range gap and may be
    /// closed.
    pub fn is_quiescent(&self) -> bool {
        self.num_allocs == 0 && self.gaps.len() == 1
    }

    /// Point-in-time counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_size: self.total_size,
            alloc_size: self.alloc_size,
            num_allocs: self.num_allocs,
            num_gaps: self.gaps.len(),
            policy: self.policy,
        }
    }

    /// First sufficient gap in address order.
    fn first_fit(&self, size: usize) -> Option<NodeId> {
        self.arena
            .iter_from(self.head)
            .find(|(_, node)| node.is_gap() && node.size >= size)
            .map(|(id, _)| id)
    }

    /// Check that a handle names a live allocation of this pool.
    fn validate(&self, handle: &AllocHandle) -> Result<(), PoolError> {
        if handle.node.index() >= self.arena.capacity() {
            return Err(PoolError::UnknownAllocation { node: handle.node });
        }
        let node: &SegmentNode = self.arena.node(handle.node);
        if !node.used || !node.allocated || node.base != handle.base || node.size != handle.len {
            return Err(PoolError::UnknownAllocation { node: handle.node });
        }
        Ok(())
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("total_size", &self.total_size)
            .field("alloc_size", &self.alloc_size)
            .field("num_allocs", &self.num_allocs)
            .field("num_gaps", &self.gaps.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
