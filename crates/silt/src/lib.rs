//! Silt: a sub-pool memory allocator for known working sets.
//!
//! A host program opens fixed-size backing *pools* and carves each one
//! into variable-size allocations under a first-fit or best-fit placement
//! policy. Freed space coalesces with its neighbours immediately, and a
//! sorted gap index keeps best-fit placement a single ordered scan. This
//! is the top-level facade crate that re-exports the public API from the
//! Silt sub-crates; for most users, adding `silt` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use silt::prelude::*;
//!
//! // A store owns the region source and the registry of open pools.
//! let mut store = PoolStore::default();
//! store.init().unwrap();
//!
//! // Open a 1 KiB pool and carve allocations out of it.
//! let pool = store.open(1024, PlacementPolicy::BestFit).unwrap();
//! let a = store.alloc(pool, 256).unwrap();
//! let b = store.alloc(pool, 128).unwrap();
//!
//! let stats = store.pool(pool).unwrap().stats();
//! assert_eq!(stats.alloc_size, 384);
//! assert_eq!(stats.num_allocs, 2);
//!
//! // Freeing merges neighbouring gaps back together.
//! store.free(pool, b).unwrap();
//! store.free(pool, a).unwrap();
//! assert!(store.pool(pool).unwrap().is_quiescent());
//!
//! store.close(pool).unwrap();
//! store.teardown().unwrap();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `silt-core` | IDs, placement policy, errors, the region seam |
//! | [`pool`] | `silt-pool` | Pools, the pool store, handles, growth tuning |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors, and the byte-region seam (`silt-core`).
///
/// Contains [`types::PoolId`], [`types::NodeId`], [`types::PlacementPolicy`],
/// the error enums, and the [`types::RegionSource`] trait a host implements
/// to supply backing memory.
pub use silt_core as types;

/// Pools, the pool store, and allocation handles (`silt-pool`).
///
/// Most users only need [`pool::Pool`] and [`pool::PoolStore`] from this
/// module; they are also available in the [`prelude`].
pub use silt_pool as pool;

/// Common imports for typical Silt usage.
///
/// ```rust
/// use silt::prelude::*;
/// ```
pub mod prelude {
    // Core types and errors
    pub use silt_core::{
        HeapSource, NodeId, PlacementPolicy, PoolError, PoolId, Region, RegionSource, StoreError,
    };

    // Pools and the registry
    pub use silt_pool::{
        AllocHandle, Pool, PoolConfig, PoolStats, PoolStore, SegmentInfo, StoreConfig,
    };
}
