//! Slot storage with stable keys.
//!
//! Lists never own node memory directly. Nodes live in a [`Storage`] and are
//! addressed by [`Key`]s that stay valid until the slot is removed, so links
//! are plain indices and a node can move between lists sharing one storage
//! without being copied.

use core::mem;

use tracing::debug;

use crate::{Full, Key, QueueError};

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key stays valid until its slot is removed
/// - **Fallible insertion**: running out of slots is reported, never aborts
/// - **Slot reuse**: removed slots can be handed out again
///
/// # Implementations
///
/// - [`BoxedStorage<T>`] - fixed capacity, reserved up front
/// - `slab::Slab<T>` - growable (feature `slab`)
pub trait Storage<T> {
    /// Key type naming a slot.
    type Key: Key;

    /// Inserts a value, returning its key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot is free.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference without checking the slot.
    ///
    /// # Safety
    ///
    /// `key` must name an occupied slot.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking the slot.
    ///
    /// # Safety
    ///
    /// `key` must name an occupied slot.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;
}

// =============================================================================
// BoxedStorage - fixed capacity, single reservation, intrusive free list
// =============================================================================

#[derive(Debug)]
enum Slot<T, K> {
    Occupied(T),
    Vacant { next_free: K },
}

/// Fixed-capacity storage reserved once at construction.
///
/// Vacant slots form a LIFO free list threaded through the slot array, so
/// insert and remove are O(1) and never allocate.
///
/// # Example
///
/// ```
/// use ringq::{BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4).unwrap();
///
/// let key = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(key), Some(&42));
/// assert_eq!(storage.remove(key), Some(42));
/// ```
#[derive(Debug)]
pub struct BoxedStorage<T, K: Key = u32> {
    slots: Box<[Slot<T, K>]>,
    free_head: K,
    len: usize,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Reserves storage for exactly `capacity` values.
    ///
    /// # Errors
    ///
    /// - [`QueueError::ZeroCapacity`] if `capacity` is 0
    /// - [`QueueError::CapacityOverflow`] if the key type cannot address
    ///   `capacity` slots
    /// - [`QueueError::AllocationFailed`] if the slot array cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }

        // NONE is never a valid slot, so the last usable index is NONE - 1.
        let max = K::NONE.as_usize();
        if capacity > max {
            return Err(QueueError::CapacityOverflow {
                requested: capacity,
                max,
            });
        }

        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        for i in 0..capacity {
            let next_free = if i + 1 < capacity {
                K::from_usize(i + 1)
            } else {
                K::NONE
            };
            slots.push(Slot::Vacant { next_free });
        }

        debug!(capacity, "reserved slot storage");

        Ok(Self {
            slots: slots.into_boxed_slice(),
            free_head: K::from_usize(0),
            len: 0,
        })
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head.is_none()
    }

    /// Drops every stored value and makes all slots vacant.
    ///
    /// # Warning
    ///
    /// Lists still referencing keys in this storage are left dangling. Clear
    /// those lists first, or use an owned wrapper such as [`Queue`] that does
    /// both.
    ///
    /// [`Queue`]: crate::Queue
    pub fn clear(&mut self) {
        let capacity = self.slots.len();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let next_free = if i + 1 < capacity {
                K::from_usize(i + 1)
            } else {
                K::NONE
            };
            *slot = Slot::Vacant { next_free };
        }
        self.free_head = K::from_usize(0);
        self.len = 0;
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.free_head.is_none() {
            return Err(Full(value));
        }

        let key = self.free_head;
        let old = mem::replace(&mut self.slots[key.as_usize()], Slot::Occupied(value));
        match old {
            Slot::Vacant { next_free } => self.free_head = next_free,
            Slot::Occupied(_) => unreachable!("free list reached an occupied slot"),
        }
        self.len += 1;

        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.as_usize())?;
        if !matches!(slot, Slot::Occupied(_)) {
            return None;
        }

        let old = mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = key;
        self.len -= 1;

        match old {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.as_usize())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.as_usize())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        match unsafe { self.slots.get_unchecked(key.as_usize()) } {
            Slot::Occupied(value) => value,
            // Safety: caller guarantees the slot is occupied
            Slot::Vacant { .. } => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        match unsafe { self.slots.get_unchecked_mut(key.as_usize()) } {
            Slot::Occupied(value) => value,
            // Safety: caller guarantees the slot is occupied
            Slot::Vacant { .. } => unsafe { core::hint::unreachable_unchecked() },
        }
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(slab::Slab::insert(self, value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        slab::Slab::try_remove(self, key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        unsafe { slab::Slab::get_unchecked(self, key) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { slab::Slab::get_unchecked_mut(self, key) }
    }
}
