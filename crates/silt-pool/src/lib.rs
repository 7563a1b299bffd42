//! Sub-pool allocation core for Silt.
//!
//! A [`Pool`] carves one fixed-size backing region into variable-size
//! allocations under a first-fit or best-fit placement policy, coalescing
//! free space on every release. A [`PoolStore`] registers open pools
//! behind stable [`PoolId`](silt_core::PoolId)s with an explicit
//! init/teardown lifecycle.
//!
//! Three structures cooperate inside each pool: the node arena owning all
//! segment records, the address-ordered segment list threaded through
//! them, and the gap index keeping placement candidates sorted by
//! `(size, base)`. All three share one amortised-growth primitive,
//! [`GrowVec`], and refer to each other exclusively by index so growth
//! can reallocate storage without invalidating a single handle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod gap;
pub mod grow;
pub mod handle;
mod node;
pub mod pool;
pub mod store;

pub use config::{PoolConfig, StoreConfig};
pub use grow::{GrowVec, GrowthPolicy};
pub use handle::AllocHandle;
pub use pool::{Pool, PoolStats, SegmentInfo};
pub use store::PoolStore;
