//! Caller-facing allocation handles.

use std::fmt;

use silt_core::NodeId;

/// Names one live allocation within a pool.
///
/// A handle is invalidated by freeing the allocation or closing the pool;
/// presenting a stale handle afterwards is rejected with an error, never
/// undefined behaviour, because the pool re-validates the handle against
/// its segment record on every use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct AllocHandle {
    /// Segment record backing this allocation.
    pub(crate) node: NodeId,
    /// Byte offset of the allocation within the pool's region.
    pub(crate) base: usize,
    /// Byte length of the allocation.
    pub(crate) len: usize,
}

impl AllocHandle {
    /// Byte offset of the allocation within its pool's region.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Byte length of the allocation. Always strictly positive.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The segment record backing this allocation.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl fmt::Display for AllocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AllocHandle(node={}, base={}, len={})",
            self.node, self.base, self.len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_round_trip() {
        let h = AllocHandle {
            node: NodeId(3),
            base: 128,
            len: 64,
        };
        assert_eq!(h.base(), 128);
        assert_eq!(h.len(), 64);
        assert_eq!(h.node(), NodeId(3));
    }

    #[test]
    fn display_names_all_fields() {
        let h = AllocHandle {
            node: NodeId(1),
            base: 0,
            len: 16,
        };
        assert_eq!(h.to_string(), "AllocHandle(node=1, base=0, len=16)");
    }
}
