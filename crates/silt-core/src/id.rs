//! Strongly-typed identifiers for pools and segment records.

use std::fmt;

/// Identifies an open pool within a pool store.
///
/// Pool IDs are registry slot indices. Slots are write-once for the life
/// of the store (closing a pool nulls its slot but never recycles it),
/// so a `PoolId` never aliases a later pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u32);

impl PoolId {
    /// The registry slot index this ID refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PoolId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Index of a segment record within a pool's node arena.
///
/// Records are referenced by index rather than by address because the
/// arena's backing storage may be reallocated by growth; an index survives
/// growth, a pointer would not. A `NodeId` is stable for the life of its
/// pool: released records go dead in place and their slot may be reused,
/// but only after the segment list and gap index have dropped every
/// reference to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The slot index this ID refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_ordered_by_value() {
        assert!(PoolId(1) < PoolId(2));
        assert!(NodeId(0) < NodeId(7));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(PoolId(3).to_string(), "3");
        assert_eq!(NodeId(41).to_string(), "41");
    }
}
