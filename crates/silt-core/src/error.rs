//! Error types for the Silt sub-pool allocator.
//!
//! Two enums cover the whole surface: [`PoolError`] for operations on a
//! single pool (allocate, free, open) and [`StoreError`] for registry
//! lifecycle and pool lookup. No operation panics or unwinds; every
//! failure is a value.

use std::error::Error;
use std::fmt;

use crate::id::{NodeId, PoolId};

/// Errors from operations on a single pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The host region source refused the backing-memory request.
    OutOfMemory {
        /// Number of bytes requested from the source.
        requested: usize,
    },
    /// No gap is large enough for the requested allocation.
    NoFit {
        /// Number of bytes requested.
        requested: usize,
        /// Size of the largest gap currently in the pool (0 if none).
        largest_gap: usize,
    },
    /// A zero-byte allocation was requested. Segments must have strictly
    /// positive size, so there is nothing to hand out.
    ZeroSize,
    /// The handle does not name a live allocated segment of this pool.
    ///
    /// Raised on double-free, on a handle that survived a coalesce, and on
    /// handles from another pool.
    UnknownAllocation {
        /// The segment record the handle claimed to name.
        node: NodeId,
    },
    /// The gap index had no entry for a segment the list claims is a gap.
    ///
    /// This indicates corrupted bookkeeping; the operation is abandoned
    /// without attempting repair.
    GapIndexDesync {
        /// The segment record whose index entry was missing.
        node: NodeId,
    },
    /// The pool still holds live allocations or unmerged gaps and cannot
    /// be closed.
    NotFreed {
        /// Count of live allocations remaining.
        num_allocs: usize,
        /// Count of gaps remaining (a quiescent pool has exactly one).
        num_gaps: usize,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "region source refused {requested} bytes")
            }
            Self::NoFit {
                requested,
                largest_gap,
            } => {
                write!(
                    f,
                    "no gap fits {requested} bytes (largest gap: {largest_gap})"
                )
            }
            Self::ZeroSize => write!(f, "zero-size allocation request"),
            Self::UnknownAllocation { node } => {
                write!(f, "handle does not name a live allocation (node {node})")
            }
            Self::GapIndexDesync { node } => {
                write!(f, "gap index has no entry for gap node {node}")
            }
            Self::NotFreed {
                num_allocs,
                num_gaps,
            } => {
                write!(
                    f,
                    "pool not quiescent: {num_allocs} allocation(s), {num_gaps} gap(s)"
                )
            }
        }
    }
}

impl Error for PoolError {}

/// Errors from the pool store (registry) surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// `init` was called on a store that is already initialized.
    AlreadyInitialized,
    /// An operation other than `init` was called before `init`, or
    /// `teardown` was called twice.
    NotInitialized,
    /// `teardown` was called while pools remain open.
    PoolsOpen {
        /// Number of pools still open.
        count: usize,
    },
    /// The pool ID does not name an open pool in this store.
    UnknownPool {
        /// The offending ID.
        pool: PoolId,
    },
    /// A pool-level operation failed; the underlying cause is preserved.
    Pool {
        /// The pool error being surfaced through the store.
        reason: PoolError,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "store already initialized"),
            Self::NotInitialized => write!(f, "store not initialized"),
            Self::PoolsOpen { count } => {
                write!(f, "{count} pool(s) still open")
            }
            Self::UnknownPool { pool } => write!(f, "unknown pool {pool}"),
            Self::Pool { reason } => write!(f, "pool operation failed: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pool { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<PoolError> for StoreError {
    fn from(reason: PoolError) -> Self {
        Self::Pool { reason }
    }
}
