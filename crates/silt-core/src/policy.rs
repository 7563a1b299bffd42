//! Placement policy for new allocations.

use std::fmt;

/// How a pool chooses the gap that receives a new allocation.
///
/// The policy is fixed when a pool is opened and never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementPolicy {
    /// Select the first sufficient gap in address order.
    ///
    /// Cheap and cache-friendly; tends to concentrate small fragments at
    /// the low end of the pool.
    FirstFit,
    /// Select the smallest sufficient gap, lowest base address on ties.
    ///
    /// Minimises the size of the leftover fragment on every split.
    BestFit,
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstFit => write!(f, "first-fit"),
            Self::BestFit => write!(f, "best-fit"),
        }
    }
}
