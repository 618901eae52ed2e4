//! Owned string queue and its builder.
//!
//! [`Queue`] bundles a [`List`] of [`Element`]s with the storage it lives in,
//! so no storage argument is threaded through calls. Dropping the queue
//! releases every element.

use core::fmt;

use rand_core::RngCore;

use crate::{
    BoxedListStorage, Element, Iter, Key, List, QueueError, QueueSet, Storage,
};

/// Element slots reserved when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Context slots reserved for a [`QueueSet`] when none is configured.
pub const DEFAULT_QUEUES: usize = 16;

/// Builder for [`Queue`] and [`QueueSet`].
///
/// # Example
///
/// ```
/// use ringq::{Queue, QueueBuilder};
///
/// let mut queue: Queue = QueueBuilder::new().capacity(64).build().unwrap();
/// queue.insert_tail("b").unwrap();
/// queue.insert_head("a").unwrap();
///
/// assert_eq!(queue.values().collect::<Vec<_>>(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueueBuilder {
    capacity: usize,
    queues: usize,
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueBuilder {
    pub const fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            queues: DEFAULT_QUEUES,
        }
    }

    /// Sets the number of element slots.
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the number of queues a [`QueueSet`] can hold.
    pub const fn queues(mut self, queues: usize) -> Self {
        self.queues = queues;
        self
    }

    /// Builds a single queue.
    ///
    /// # Errors
    ///
    /// Fails if the capacity is zero, does not fit `K`, or cannot be
    /// allocated.
    pub fn build<K: Key>(self) -> Result<Queue<K>, QueueError> {
        Ok(Queue {
            storage: BoxedListStorage::with_capacity(self.capacity)?,
            list: List::new(),
        })
    }

    /// Builds a set of queues sharing one element storage.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build), for either reservation.
    pub fn build_set<K: Key>(self) -> Result<QueueSet<K>, QueueError> {
        QueueSet::from_builder(self.capacity, self.queues)
    }
}

/// A circular queue of strings that owns its storage.
///
/// Capacity is fixed at construction.
///
/// # Example
///
/// ```
/// use ringq::Queue;
///
/// let mut queue = Queue::with_capacity(16).unwrap();
/// for s in ["d", "a", "c", "b"] {
///     queue.insert_tail(s).unwrap();
/// }
///
/// queue.sort(false);
/// assert_eq!(queue.values().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
///
/// let mut buf = [0u8; 2];
/// let head = queue.remove_head(Some(&mut buf)).unwrap();
/// assert_eq!(head.value(), "a");
/// assert_eq!(&buf, b"a\0");
/// ```
pub struct Queue<K: Key = u32> {
    storage: BoxedListStorage<Element, K>,
    list: List<Element, BoxedListStorage<Element, K>, K>,
}

impl Queue {
    /// Creates a queue with [`DEFAULT_CAPACITY`] slots.
    ///
    /// # Errors
    ///
    /// Fails only if the slots cannot be allocated.
    pub fn new() -> Result<Self, QueueError> {
        QueueBuilder::new().build()
    }

    /// Creates a queue with `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, QueueError> {
        QueueBuilder::new().capacity(capacity).build()
    }

    /// Returns a builder with [`DEFAULT_CAPACITY`].
    pub const fn builder() -> QueueBuilder {
        QueueBuilder::new()
    }
}

impl<K: Key> Queue<K> {
    /// Maximum number of elements the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if the next insert will fail with [`QueueError::Full`].
    #[inline]
    pub fn is_full(&self) -> bool {
        self.storage.is_full()
    }

    /// Counts the elements by traversal.
    #[inline]
    pub fn size(&self) -> usize {
        self.list.size(&self.storage)
    }

    /// Number of occupied slots, without traversal.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Inserts a copy of `value` at the head.
    pub fn insert_head(&mut self, value: &str) -> Result<K, QueueError> {
        self.list.insert_head(&mut self.storage, value)
    }

    /// Inserts a copy of `value` at the tail.
    pub fn insert_tail(&mut self, value: &str) -> Result<K, QueueError> {
        self.list.insert_tail(&mut self.storage, value)
    }

    /// Removes the head element, copying its value into `buf` if given.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        self.list.remove_head(&mut self.storage, buf)
    }

    /// Removes the tail element, copying its value into `buf` if given.
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        self.list.remove_tail(&mut self.storage, buf)
    }

    /// Returns the head value.
    pub fn front(&self) -> Option<&str> {
        self.list.front(&self.storage).map(Element::value)
    }

    /// Returns the tail value.
    pub fn back(&self) -> Option<&str> {
        self.list.back(&self.storage).map(Element::value)
    }

    /// Returns the value at `key`.
    pub fn get(&self, key: K) -> Option<&str> {
        self.list.get(&self.storage, key).map(Element::value)
    }

    /// See [`List::delete_middle`].
    pub fn delete_middle(&mut self) -> bool {
        self.list.delete_middle(&mut self.storage)
    }

    /// See [`List::delete_duplicates`].
    pub fn delete_duplicates(&mut self) -> bool {
        self.list.delete_duplicates(&mut self.storage)
    }

    /// Swaps every two adjacent elements; an odd last element stays put.
    pub fn swap_pairs(&mut self) {
        self.list.swap_pairs(&mut self.storage);
    }

    /// Reverses the queue in place.
    pub fn reverse(&mut self) {
        self.list.reverse(&mut self.storage);
    }

    /// See [`List::reverse_k_group`].
    pub fn reverse_k_group(&mut self, k: usize) {
        self.list.reverse_k_group(&mut self.storage, k);
    }

    /// Stable merge sort by byte-wise string order.
    pub fn sort(&mut self, descending: bool) {
        self.list.sort(&mut self.storage, descending);
    }

    /// See [`List::ascend`].
    pub fn ascend(&mut self) -> usize {
        self.list.ascend(&mut self.storage)
    }

    /// See [`List::descend`].
    pub fn descend(&mut self) -> usize {
        self.list.descend(&mut self.storage)
    }

    /// Shuffles the values with the given random source.
    pub fn shuffle<R: RngCore>(&mut self, rng: &mut R) {
        self.list.shuffle(&mut self.storage, rng);
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.list.clear(&mut self.storage);
    }

    /// Returns the stored strings, front to back.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.list.values(&self.storage)
    }

    /// Returns an iterator over the elements, front to back.
    pub fn iter(&self) -> Iter<'_, Element, BoxedListStorage<Element, K>, K> {
        self.list.iter(&self.storage)
    }

    /// See [`List::is_well_formed`].
    pub fn is_well_formed(&self) -> bool {
        self.list.is_well_formed(&self.storage)
    }
}

impl<K: Key> fmt::Debug for Queue<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

impl<'a, K: Key + 'a> IntoIterator for &'a Queue<K> {
    type Item = &'a Element;
    type IntoIter = Iter<'a, Element, BoxedListStorage<Element, K>, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
