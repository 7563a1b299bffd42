//! The pool store: a lifecycle-guarded registry of open pools.
//!
//! A [`PoolStore`] owns the region source and a slot table of open pools.
//! The table only ever appends: closing a pool nulls its slot in place,
//! and slots are never compacted or recycled, so a [`PoolId`] (the slot
//! index handed out at open) stays unambiguous for the store's whole
//! lifetime. The registry is an explicit value rather than a process
//! global; a host wanting the classic singleton shape wraps one store.

use silt_core::{PlacementPolicy, PoolError, PoolId, RegionSource, StoreError};

use crate::config::StoreConfig;
use crate::grow::GrowVec;
use crate::handle::AllocHandle;
use crate::pool::{Pool, SegmentInfo};

type Slot = Option<Box<Pool>>;

/// Registry of open pools plus the region source that backs them.
///
/// Operations other than [`init`] fail with [`StoreError::NotInitialized`]
/// until `init` is called, and `init` itself fails with
/// [`StoreError::AlreadyInitialized`] on a second call; the registry's
/// lifecycle is explicit in both directions. [`teardown`] refuses while
/// any pool remains open.
///
/// [`init`]: PoolStore::init
/// [`teardown`]: PoolStore::teardown
pub struct PoolStore {
    source: Box<dyn RegionSource>,
    config: StoreConfig,
    /// `Some` while initialized. Holds every slot ever appended.
    slots: Option<GrowVec<Slot>>,
    /// Append cursor; counts slots ever handed out, including closed ones.
    next_slot: usize,
}

impl PoolStore {
    /// Create an uninitialized store over `source` with the default
    /// configuration.
    pub fn new(source: Box<dyn RegionSource>) -> Self {
        Self::with_config(StoreConfig::default(), source)
    }

    /// Create an uninitialized store with explicit tuning.
    pub fn with_config(config: StoreConfig, source: Box<dyn RegionSource>) -> Self {
        Self {
            source,
            config,
            slots: None,
            next_slot: 0,
        }
    }

    /// Whether [`init`](PoolStore::init) has run without a matching
    /// [`teardown`](PoolStore::teardown).
    pub fn is_initialized(&self) -> bool {
        self.slots.is_some()
    }

    /// Allocate the registry. Fails if already initialized.
    pub fn init(&mut self) -> Result<(), StoreError> {
        if self.slots.is_some() {
            return Err(StoreError::AlreadyInitialized);
        }
        self.slots = Some(GrowVec::new(self.config.slot_growth));
        self.next_slot = 0;
        Ok(())
    }

    /// Release the registry. Fails if not initialized or if any pool is
    /// still open.
    pub fn teardown(&mut self) -> Result<(), StoreError> {
        if self.slots.is_none() {
            return Err(StoreError::NotInitialized);
        }
        let count = self.open_pools();
        if count > 0 {
            return Err(StoreError::PoolsOpen { count });
        }
        self.slots = None;
        self.next_slot = 0;
        Ok(())
    }

    /// Open a pool of `size` bytes under `policy` and register it.
    ///
    /// Grows the slot table under the fill-factor rule before appending.
    /// A refusal from the region source surfaces as a wrapped
    /// [`PoolError::OutOfMemory`].
    pub fn open(&mut self, size: usize, policy: PlacementPolicy) -> Result<PoolId, StoreError> {
        let Some(slots) = self.slots.as_mut() else {
            return Err(StoreError::NotInitialized);
        };
        // Slot-table growth comes first; a pool is only constructed once
        // a slot is guaranteed to receive it.
        slots.ensure_room(self.next_slot);

        let pool = Pool::open_with(&self.config.pool, size, policy, self.source.as_mut())?;

        let slots = self.slots.as_mut().expect("initialized checked above");
        let id = PoolId(self.next_slot as u32);
        slots[self.next_slot] = Some(Box::new(pool));
        self.next_slot += 1;
        Ok(id)
    }

    /// Close a pool, releasing its region and bookkeeping.
    ///
    /// The pool must be quiescent (zero allocations, one gap) or the
    /// close fails with a wrapped [`PoolError::NotFreed`] and the pool
    /// stays open. On success the slot is nulled in place.
    pub fn close(&mut self, id: PoolId) -> Result<(), StoreError> {
        let slot = self.slot_mut(id)?;
        let pool = slot.as_ref().expect("slot_mut returns occupied slots");
        if !pool.is_quiescent() {
            return Err(StoreError::Pool {
                reason: PoolError::NotFreed {
                    num_allocs: pool.num_allocs(),
                    num_gaps: pool.num_gaps(),
                },
            });
        }
        // Dropping the pool releases the region, arena, and gap index.
        *slot = None;
        Ok(())
    }

    /// Shared access to an open pool.
    pub fn pool(&self, id: PoolId) -> Result<&Pool, StoreError> {
        let slots = self.slots.as_ref().ok_or(StoreError::NotInitialized)?;
        slots
            .as_slice()
            .get(id.index())
            .and_then(|slot| slot.as_deref())
            .ok_or(StoreError::UnknownPool { pool: id })
    }

    /// Mutable access to an open pool.
    pub fn pool_mut(&mut self, id: PoolId) -> Result<&mut Pool, StoreError> {
        Ok(self
            .slot_mut(id)?
            .as_deref_mut()
            .expect("slot_mut returns occupied slots"))
    }

    /// Allocate `size` bytes from the pool named by `id`.
    pub fn alloc(&mut self, id: PoolId, size: usize) -> Result<AllocHandle, StoreError> {
        Ok(self.pool_mut(id)?.alloc(size)?)
    }

    /// Free an allocation of the pool named by `id`.
    pub fn free(&mut self, id: PoolId, handle: AllocHandle) -> Result<(), StoreError> {
        Ok(self.pool_mut(id)?.free(handle)?)
    }

    /// Address-ordered segment listing of the pool named by `id`.
    pub fn inspect(&self, id: PoolId) -> Result<Vec<SegmentInfo>, StoreError> {
        Ok(self.pool(id)?.inspect())
    }

    /// Count of pools currently open.
    pub fn open_pools(&self) -> usize {
        match &self.slots {
            Some(slots) => slots.as_slice().iter().filter(|s| s.is_some()).count(),
            None => 0,
        }
    }

    /// Count of slots ever handed out, including closed ones.
    pub fn slot_count(&self) -> usize {
        self.next_slot
    }

    /// Current slot-table capacity, or 0 when not initialized.
    pub fn capacity(&self) -> usize {
        self.slots.as_ref().map_or(0, GrowVec::capacity)
    }

    /// An occupied slot, or the appropriate error.
    fn slot_mut(&mut self, id: PoolId) -> Result<&mut Slot, StoreError> {
        let slots = self.slots.as_mut().ok_or(StoreError::NotInitialized)?;
        let slot = slots
            .as_mut_slice()
            .get_mut(id.index())
            .ok_or(StoreError::UnknownPool { pool: id })?;
        if slot.is_none() {
            return Err(StoreError::UnknownPool { pool: id });
        }
        Ok(slot)
    }
}

impl Default for PoolStore {
    /// An uninitialized store over a plain heap source.
    fn default() -> Self {
        Self::new(Box::new(silt_core::HeapSource::new()))
    }
}
