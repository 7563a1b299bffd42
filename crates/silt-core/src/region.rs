//! The byte-region seam between a pool and its host allocator.
//!
//! A pool never calls the global allocator directly. It asks a
//! host-supplied [`RegionSource`] for an owned [`Region`] of the
//! requested length, and releases the region by dropping it. Keeping
//! this seam as a trait lets tests substitute a refusing source to
//! exercise out-of-memory paths deterministically.

use std::fmt;

/// An owned, zero-initialised block of backing memory for one pool.
///
/// The region's length is fixed at acquisition. Allocations within a pool
/// are described as offsets into its region, never as raw pointers, so
/// the region itself may live anywhere the source chose to place it.
/// Dropping the region releases the memory back to its source.
pub struct Region {
    bytes: Box<[u8]>,
}

impl Region {
    /// Wrap an owned byte block as a region.
    ///
    /// Intended for [`RegionSource`] implementations; pools only ever
    /// receive regions, they never construct them.
    pub fn new(bytes: Box<[u8]>) -> Self {
        Self { bytes }
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the region is zero-length.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The whole region as a shared byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// The whole region as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region").field("len", &self.len()).finish()
    }
}

/// Factory for pool backing regions.
///
/// `acquire` returns `None` when the source refuses the request; the pool
/// reports that refusal as an out-of-memory error without retrying.
/// Release semantics are carried by [`Region`] ownership: dropping a
/// region returns its memory.
pub trait RegionSource {
    /// Acquire an owned, zero-initialised region of exactly `len` bytes.
    fn acquire(&mut self, len: usize) -> Option<Region>;
}

/// The default heap-backed region source.
///
/// Optionally refuses requests above a fixed per-request cap, which is
/// how tests drive a pool's out-of-memory exits without exhausting the
/// process heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapSource {
    limit: Option<usize>,
}

impl HeapSource {
    /// A source that grants every request.
    pub fn new() -> Self {
        Self { limit: None }
    }

    /// A source that refuses any single request larger than `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

impl RegionSource for HeapSource {
    fn acquire(&mut self, len: usize) -> Option<Region> {
        if let Some(limit) = self.limit {
            if len > limit {
                return None;
            }
        }
        Some(Region::new(vec![0u8; len].into_boxed_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_source_grants_and_zeroes() {
        let mut source = HeapSource::new();
        let region = source.acquire(64).unwrap();
        assert_eq!(region.len(), 64);
        assert!(region.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn limited_source_refuses_oversized_requests() {
        let mut source = HeapSource::with_limit(100);
        assert!(source.acquire(100).is_some());
        assert!(source.acquire(101).is_none());
    }

    #[test]
    fn region_is_writable() {
        let mut source = HeapSource::new();
        let mut region = source.acquire(8).unwrap();
        region.as_mut_slice()[3] = 0xAB;
        assert_eq!(region.as_slice()[3], 0xAB);
    }

    #[test]
    fn zero_length_region_is_empty() {
        let mut source = HeapSource::new();
        let region = source.acquire(0).unwrap();
        assert!(region.is_empty());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn granted_regions_match_the_request_exactly(len in 0usize..4096) {
                let mut source = HeapSource::new();
                let region = source.acquire(len).unwrap();
                prop_assert_eq!(region.len(), len);
                prop_assert!(region.as_slice().iter().all(|&b| b == 0));
            }

            #[test]
            fn limit_splits_grant_from_refusal(
                limit in 0usize..2048,
                len in 0usize..4096,
            ) {
                let mut source = HeapSource::with_limit(limit);
                prop_assert_eq!(source.acquire(len).is_some(), len <= limit);
            }
        }
    }
}
