//! Circular doubly-linked list over external storage.
//!
//! Nodes live in a [`Storage`] and link to each other by key. The [`List`]
//! header is the sentinel of the cycle: a node link equal to [`Key::NONE`]
//! references it, the header's `head` is the sentinel's `next` and its `tail`
//! is the sentinel's `prev`.
//!
//! ```text
//!        ┌──────────────────────────────────────────────┐
//!        ▼                                              │
//!   [sentinel] ──► [a] ──► [b] ──► [c] ── next: NONE ───┘
//!   head = a                                 prev of a: NONE
//!   tail = c
//! ```
//!
//! An empty list has both sentinel links pointing back at the sentinel
//! (`head == tail == NONE`). Because `NONE` always means "the sentinel of the
//! list this node is in", whole runs of nodes can be spliced between lists
//! without touching their end links.
//!
//! A node taken out of a cycle is re-initialised to a self-cycle (both links
//! name the node itself). It is then safe to query but reachable from no list.
//!
//! # Storage Invariant
//!
//! A list must always be used with the same storage instance. Passing a
//! different storage is a logic error the list cannot detect (same discipline
//! as the `slab` crate).
//!
//! # Example
//!
//! ```
//! use ringq::{BoxedListStorage, List};
//!
//! let mut storage: BoxedListStorage<u64> = BoxedListStorage::with_capacity(16).unwrap();
//! let mut list: List<u64, BoxedListStorage<u64>> = List::new();
//!
//! let a = list.try_push_back(&mut storage, 1).unwrap();
//! let b = list.try_push_back(&mut storage, 2).unwrap();
//! list.try_push_back(&mut storage, 3).unwrap();
//!
//! assert_eq!(list.size(&storage), 3);
//! assert_eq!(list.get(&storage, b), Some(&2));
//!
//! // O(1) relink, no copy of the payload
//! list.move_to_back(&mut storage, a);
//! let values: Vec<_> = list.iter(&storage).copied().collect();
//! assert_eq!(values, vec![2, 3, 1]);
//! ```

use core::marker::PhantomData;

use crate::{BoxedStorage, Full, Key, Storage};

/// Type alias for list storage backed by a fixed reservation.
pub type BoxedListStorage<T, K = u32> = BoxedStorage<ListNode<T, K>, K>;

/// Type alias for growable list storage backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabListStorage<T> = slab::Slab<ListNode<T, usize>>;

/// A node: payload plus its two links.
///
/// Users reach the payload through the list's accessors; links are managed
/// by the list only.
#[derive(Debug)]
pub struct ListNode<T, K: Key = u32> {
    pub(crate) data: T,
    pub(crate) prev: K,
    pub(crate) next: K,
}

impl<T, K: Key> ListNode<T, K> {
    #[inline]
    fn new(data: T) -> Self {
        Self {
            data,
            prev: K::NONE,
            next: K::NONE,
        }
    }

    /// Returns the payload.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the node, returning its payload.
    #[inline]
    pub fn into_data(self) -> T {
        self.data
    }
}

/// A sentinel-based circular doubly-linked list over external storage.
///
/// # Type Parameters
///
/// - `T`: payload type
/// - `S`: storage type (e.g., [`BoxedListStorage<T>`])
/// - `K`: key type (default `u32`)
#[derive(Debug)]
pub struct List<T, S, K: Key = u32>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    head: K,
    tail: K,
    _marker: PhantomData<(T, S)>,
}

impl<T, S, K: Key> Default for List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, K: Key> List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    /// Creates an empty list: the sentinel links to itself.
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: K::NONE,
            tail: K::NONE,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if the list holds no element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Counts the elements by walking the cycle once.
    ///
    /// This operation computes in *O*(*n*) time.
    pub fn size(&self, storage: &S) -> usize {
        let mut count = 0;
        let mut key = self.head;
        while key.is_some() {
            count += 1;
            // Safety: key came from list traversal
            key = unsafe { storage.get_unchecked(key) }.next;
        }
        count
    }

    /// Returns the first node's key, or `None` if empty.
    #[inline]
    pub fn front_key(&self) -> Option<K> {
        if self.head.is_none() { None } else { Some(self.head) }
    }

    /// Returns the last node's key, or `None` if empty.
    #[inline]
    pub fn back_key(&self) -> Option<K> {
        if self.tail.is_none() { None } else { Some(self.tail) }
    }

    /// Returns `true` if the node is the first of this list.
    #[inline]
    pub fn is_head(&self, key: K) -> bool {
        key.is_some() && self.head == key
    }

    /// Returns `true` if the node is the last of this list.
    #[inline]
    pub fn is_tail(&self, key: K) -> bool {
        key.is_some() && self.tail == key
    }

    // ========================================================================
    // Link plumbing (NONE addresses the sentinel)
    // ========================================================================

    /// Sentinel's `next` link, `NONE` when empty.
    #[inline]
    pub(crate) fn head_key(&self) -> K {
        self.head
    }

    #[inline]
    pub(crate) fn next_of(&self, storage: &S, at: K) -> K {
        if at.is_none() {
            self.head
        } else {
            // Safety: non-sentinel links always name occupied slots
            unsafe { storage.get_unchecked(at) }.next
        }
    }

    #[inline]
    pub(crate) fn prev_of(&self, storage: &S, at: K) -> K {
        if at.is_none() {
            self.tail
        } else {
            // Safety: non-sentinel links always name occupied slots
            unsafe { storage.get_unchecked(at) }.prev
        }
    }

    #[inline]
    fn set_next(&mut self, storage: &mut S, at: K, to: K) {
        if at.is_none() {
            self.head = to;
        } else {
            // Safety: non-sentinel links always name occupied slots
            unsafe { storage.get_unchecked_mut(at) }.next = to;
        }
    }

    #[inline]
    fn set_prev(&mut self, storage: &mut S, at: K, to: K) {
        if at.is_none() {
            self.tail = to;
        } else {
            // Safety: non-sentinel links always name occupied slots
            unsafe { storage.get_unchecked_mut(at) }.prev = to;
        }
    }

    /// Splices `key` between the adjacent links `prev` and `next`.
    #[inline]
    pub(crate) fn link_between(&mut self, storage: &mut S, key: K, prev: K, next: K) {
        // Safety: callers pass an occupied, detached node
        let node = unsafe { storage.get_unchecked_mut(key) };
        node.prev = prev;
        node.next = next;
        self.set_next(storage, prev, key);
        self.set_prev(storage, next, key);
    }

    /// Takes `key` out of the cycle and turns it into a self-cycle.
    #[inline]
    pub(crate) fn detach(&mut self, storage: &mut S, key: K) {
        // Safety: callers pass a node of this list
        let node = unsafe { storage.get_unchecked(key) };
        let (prev, next) = (node.prev, node.next);

        self.set_next(storage, prev, next);
        self.set_prev(storage, next, prev);

        let node = unsafe { storage.get_unchecked_mut(key) };
        node.prev = key;
        node.next = key;
    }

    /// Detaches `key` and splices it right after `anchor` (list_move).
    #[inline]
    pub(crate) fn relocate_after(&mut self, storage: &mut S, key: K, anchor: K) {
        self.detach(storage, key);
        let next = self.next_of(storage, anchor);
        self.link_between(storage, key, anchor, next);
    }

    /// Detaches and drops the node at `key`.
    #[inline]
    pub(crate) fn destroy(&mut self, storage: &mut S, key: K) {
        self.detach(storage, key);
        storage.remove(key);
    }

    // ========================================================================
    // Chain hand-off used by sorting and merging
    // ========================================================================

    /// Empties the list, returning its nodes as a forward chain.
    ///
    /// The chain is terminated by `NONE` (the last node's link to the old
    /// sentinel). `prev` links inside the chain are left stale.
    #[inline]
    pub(crate) fn take_chain(&mut self) -> K {
        let chain = self.head;
        self.head = K::NONE;
        self.tail = K::NONE;
        chain
    }

    /// Links a forward chain into this empty list, rebuilding every `prev`
    /// link in one pass. Returns the number of nodes attached.
    pub(crate) fn attach_chain(&mut self, storage: &mut S, chain: K) -> usize {
        debug_assert!(self.is_empty());

        let mut count = 0;
        let mut prev = K::NONE;
        let mut key = chain;
        while key.is_some() {
            // Safety: chain keys come from a detached run of this storage
            let node = unsafe { storage.get_unchecked_mut(key) };
            node.prev = prev;
            prev = key;
            key = node.next;
            count += 1;
        }

        self.head = chain;
        self.tail = prev;
        count
    }

    // ========================================================================
    // Link operations (relink only, no alloc/dealloc)
    // ========================================================================

    /// Links a detached node to the front of the list.
    ///
    /// Use with [`unlink`](Self::unlink) to move nodes between lists sharing
    /// one storage.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn link_front(&mut self, storage: &mut S, key: K) {
        assert!(storage.get(key).is_some(), "invalid key");
        let head = self.head;
        self.link_between(storage, key, K::NONE, head);
    }

    /// Links a detached node to the back of the list.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn link_back(&mut self, storage: &mut S, key: K) {
        assert!(storage.get(key).is_some(), "invalid key");
        let tail = self.tail;
        self.link_between(storage, key, tail, K::NONE);
    }

    /// Links a detached node right after `after`.
    ///
    /// # Panics
    ///
    /// Panics if `after` or `key` is not valid in storage.
    #[inline]
    pub fn link_after(&mut self, storage: &mut S, after: K, key: K) {
        assert!(storage.get(after).is_some(), "invalid 'after' key");
        assert!(storage.get(key).is_some(), "invalid key");
        let next = self.next_of(storage, after);
        self.link_between(storage, key, after, next);
    }

    /// Links a detached node right before `before`.
    ///
    /// # Panics
    ///
    /// Panics if `before` or `key` is not valid in storage.
    #[inline]
    pub fn link_before(&mut self, storage: &mut S, before: K, key: K) {
        assert!(storage.get(before).is_some(), "invalid 'before' key");
        assert!(storage.get(key).is_some(), "invalid key");
        let prev = self.prev_of(storage, before);
        self.link_between(storage, key, prev, before);
    }

    /// Unlinks a node without deallocating it.
    ///
    /// The node stays in storage as a self-cycle and can be linked into
    /// another list. Returns `false` if the node was already detached.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn unlink(&mut self, storage: &mut S, key: K) -> bool {
        let node = storage.get(key).expect("invalid key");
        if node.next == key {
            return false;
        }

        self.detach(storage, key);
        true
    }

    /// Moves a node of this list to just after `anchor`.
    ///
    /// `anchor` may be `K::NONE`, the sentinel, which moves the node to the
    /// front.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage, or if `anchor` is neither
    /// `K::NONE` nor valid in storage.
    #[inline]
    pub fn move_after(&mut self, storage: &mut S, key: K, anchor: K) {
        assert!(storage.get(key).is_some(), "invalid key");
        assert!(
            anchor.is_none() || storage.get(anchor).is_some(),
            "invalid anchor key"
        );
        if key == anchor {
            return;
        }

        self.relocate_after(storage, key, anchor);
    }

    /// Moves a node of this list to just before `anchor`.
    ///
    /// `anchor` may be `K::NONE`, the sentinel, which moves the node to the
    /// back.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage, or if `anchor` is neither
    /// `K::NONE` nor valid in storage.
    #[inline]
    pub fn move_before(&mut self, storage: &mut S, key: K, anchor: K) {
        assert!(storage.get(key).is_some(), "invalid key");
        assert!(
            anchor.is_none() || storage.get(anchor).is_some(),
            "invalid anchor key"
        );
        if key == anchor {
            return;
        }

        self.detach(storage, key);
        let prev = self.prev_of(storage, anchor);
        self.link_between(storage, key, prev, anchor);
    }

    /// Moves a node to the front of the list.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn move_to_front(&mut self, storage: &mut S, key: K) {
        if self.head != key {
            self.move_after(storage, key, K::NONE);
        }
    }

    /// Moves a node to the back of the list.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn move_to_back(&mut self, storage: &mut S, key: K) {
        if self.tail != key {
            self.move_before(storage, key, K::NONE);
        }
    }

    /// Moves every node of `other` to the end of this list.
    ///
    /// `other` is left empty. This is O(1).
    #[inline]
    pub fn append(&mut self, storage: &mut S, other: &mut Self) {
        if other.is_empty() {
            return;
        }

        if self.is_empty() {
            self.head = other.head;
        } else {
            // Safety: both ends exist (non-empty lists)
            unsafe { storage.get_unchecked_mut(self.tail) }.next = other.head;
            unsafe { storage.get_unchecked_mut(other.head) }.prev = self.tail;
        }
        self.tail = other.tail;

        other.head = K::NONE;
        other.tail = K::NONE;
    }

    // ========================================================================
    // Remove operations (unlink + deallocate)
    // ========================================================================

    /// Removes and returns the front payload.
    #[inline]
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        let key = self.front_key()?;
        self.detach(storage, key);
        storage.remove(key).map(ListNode::into_data)
    }

    /// Removes and returns the back payload.
    #[inline]
    pub fn pop_back(&mut self, storage: &mut S) -> Option<T> {
        let key = self.back_key()?;
        self.detach(storage, key);
        storage.remove(key).map(ListNode::into_data)
    }

    /// Removes a node by key, returning its payload.
    ///
    /// Returns `None` if the key is not valid in storage.
    #[inline]
    pub fn remove(&mut self, storage: &mut S, key: K) -> Option<T> {
        storage.get(key)?;
        self.unlink(storage, key);
        storage.remove(key).map(ListNode::into_data)
    }

    /// Drops every element, leaving the sentinel linked to itself.
    pub fn clear(&mut self, storage: &mut S) {
        let mut key = self.head;
        while key.is_some() {
            // Safety: key came from list traversal
            let next = unsafe { storage.get_unchecked(key) }.next;
            storage.remove(key);
            key = next;
        }

        self.head = K::NONE;
        self.tail = K::NONE;
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the payload at `key`.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: K) -> Option<&'a T>
    where
        T: 'a,
        K: 'a,
    {
        storage.get(key).map(|node| &node.data)
    }

    /// Returns the payload at `key` mutably.
    #[inline]
    pub fn get_mut<'a>(&self, storage: &'a mut S, key: K) -> Option<&'a mut T>
    where
        T: 'a,
        K: 'a,
    {
        storage.get_mut(key).map(|node| &mut node.data)
    }

    /// Returns the front payload.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a T>
    where
        T: 'a,
        K: 'a,
    {
        let key = self.front_key()?;
        // Safety: head is valid when is_some()
        Some(unsafe { &storage.get_unchecked(key).data })
    }

    /// Returns the back payload.
    #[inline]
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a T>
    where
        T: 'a,
        K: 'a,
    {
        let key = self.back_key()?;
        // Safety: tail is valid when is_some()
        Some(unsafe { &storage.get_unchecked(key).data })
    }

    /// Returns the key after `key`, or `None` if `key` is last or invalid.
    #[inline]
    pub fn next_key(&self, storage: &S, key: K) -> Option<K> {
        let next = storage.get(key)?.next;
        if next.is_none() { None } else { Some(next) }
    }

    /// Returns the key before `key`, or `None` if `key` is first or invalid.
    #[inline]
    pub fn prev_key(&self, storage: &S, key: K) -> Option<K> {
        let prev = storage.get(key)?.prev;
        if prev.is_none() { None } else { Some(prev) }
    }

    /// Checks the link invariant of the whole cycle.
    ///
    /// Returns `true` if every node satisfies `a.next.prev == a` and
    /// `a.prev.next == a`, and walking from the sentinel reaches it again
    /// after the same number of steps in both directions.
    pub fn is_well_formed(&self, storage: &S) -> bool {
        if self.head.is_none() || self.tail.is_none() {
            return self.head.is_none() && self.tail.is_none();
        }

        let limit = storage.len();
        let mut forward = 0;
        let mut prev = K::NONE;
        let mut key = self.head;
        while key.is_some() {
            let Some(node) = storage.get(key) else {
                return false;
            };
            if node.prev != prev {
                return false;
            }
            forward += 1;
            if forward > limit {
                return false;
            }
            prev = key;
            key = node.next;
        }
        if prev != self.tail {
            return false;
        }

        let mut backward = 0;
        let mut key = self.tail;
        while key.is_some() {
            let Some(node) = storage.get(key) else {
                return false;
            };
            backward += 1;
            if backward > forward {
                return false;
            }
            key = node.prev;
        }

        backward == forward
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over payloads, front to back.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, T, S, K> {
        Iter {
            storage,
            front: self.head,
            back: self.tail,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over keys, front to back.
    ///
    /// Collect the keys first when the list is modified during the walk.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, T, S, K> {
        Keys {
            storage,
            front: self.head,
            back: self.tail,
            _marker: PhantomData,
        }
    }

    /// Pushes a value to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full; the list is unchanged.
    #[inline]
    pub fn try_push_front(&mut self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        let key = storage
            .try_insert(ListNode::new(value))
            .map_err(|e| Full(e.0.data))?;
        let head = self.head;
        self.link_between(storage, key, K::NONE, head);
        Ok(key)
    }

    /// Pushes a value to the back of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full; the list is unchanged.
    #[inline]
    pub fn try_push_back(&mut self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        let key = storage
            .try_insert(ListNode::new(value))
            .map_err(|e| Full(e.0.data))?;
        let tail = self.tail;
        self.link_between(storage, key, tail, K::NONE);
        Ok(key)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to list payloads.
pub struct Iter<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for Iter<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_none() {
            return None;
        }

        // Safety: list invariants guarantee front is valid
        let node = unsafe { self.storage.get_unchecked(self.front) };

        // Met in the middle
        if self.front == self.back {
            self.front = K::NONE;
            self.back = K::NONE;
        } else {
            self.front = node.next;
        }

        Some(&node.data)
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_none() {
            return None;
        }

        // Safety: list invariants guarantee back is valid
        let node = unsafe { self.storage.get_unchecked(self.back) };

        if self.front == self.back {
            self.front = K::NONE;
            self.back = K::NONE;
        } else {
            self.back = node.prev;
        }

        Some(&node.data)
    }
}

/// Iterator over the keys of a list.
pub struct Keys<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    _marker: PhantomData<T>,
}

impl<'a, T, S, K: Key> Iterator for Keys<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_none() {
            return None;
        }

        let key = self.front;
        // Safety: list invariants guarantee front is valid
        let node = unsafe { self.storage.get_unchecked(key) };

        if self.front == self.back {
            self.front = K::NONE;
            self.back = K::NONE;
        } else {
            self.front = node.next;
        }

        Some(key)
    }
}

impl<'a, T, S, K: Key> DoubleEndedIterator for Keys<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_none() {
            return None;
        }

        let key = self.back;
        // Safety: list invariants guarantee back is valid
        let node = unsafe { self.storage.get_unchecked(key) };

        if self.front == self.back {
            self.front = K::NONE;
            self.back = K::NONE;
        } else {
            self.back = node.prev;
        }

        Some(key)
    }
}
