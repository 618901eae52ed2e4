//! Structural transforms: rewire existing nodes, never allocate.

use crate::{Key, List, ListNode, Storage};

impl<T, S, K: Key> List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    /// Destroys the middle element.
    ///
    /// For an even length the second of the two middle elements goes.
    /// Returns `false` if the list is empty.
    pub fn delete_middle(&mut self, storage: &mut S) -> bool {
        let Some(head) = self.front_key() else {
            return false;
        };

        let mut slow = head;
        let mut fast = head;
        loop {
            let next = self.next_of(storage, fast);
            if next.is_none() {
                break;
            }
            slow = self.next_of(storage, slow);
            fast = self.next_of(storage, next);
            if fast.is_none() {
                break;
            }
        }

        self.destroy(storage, slow);
        true
    }

    /// Pairwise swap: 1st with 2nd, 3rd with 4th, and so on.
    ///
    /// An odd last element stays in place.
    pub fn swap_pairs(&mut self, storage: &mut S) {
        let mut first = self.head_key();
        while first.is_some() {
            let second = self.next_of(storage, first);
            if second.is_none() {
                break;
            }

            let prev = self.prev_of(storage, first);
            self.relocate_after(storage, second, prev);
            first = self.next_of(storage, first);
        }
    }

    /// Reverses the whole list by moving each node to the head position.
    pub fn reverse(&mut self, storage: &mut S) {
        let mut key = self.head_key();
        while key.is_some() {
            let next = self.next_of(storage, key);
            self.relocate_after(storage, key, K::NONE);
            key = next;
        }
    }

    /// Reverses consecutive groups of exactly `k` nodes.
    ///
    /// A trailing group shorter than `k` keeps its order. `k < 2` is a no-op.
    pub fn reverse_k_group(&mut self, storage: &mut S, k: usize) {
        if k < 2 || self.is_empty() {
            return;
        }

        let mut remaining = self.size(storage);
        let mut anchor = K::NONE;
        while remaining >= k {
            // The group's first node ends up last; pull its successors in
            // front of it one by one.
            let first = self.next_of(storage, anchor);
            for _ in 1..k {
                let moved = self.next_of(storage, first);
                self.relocate_after(storage, moved, anchor);
            }

            anchor = first;
            remaining -= k;
        }
    }
}

impl<T: PartialEq, S, K: Key> List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    /// Removes every run of two or more equal adjacent elements entirely.
    ///
    /// Expects sorted input: on unsorted input only adjacent duplicates are
    /// found. Returns `false` if the list is empty.
    pub fn delete_duplicates(&mut self, storage: &mut S) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut in_run = false;
        let mut key = self.head_key();
        while key.is_some() {
            let next = self.next_of(storage, key);
            // Safety: key and next (when not the sentinel) come from traversal
            let same = next.is_some()
                && unsafe { storage.get_unchecked(key).data == storage.get_unchecked(next).data };

            if same {
                self.destroy(storage, key);
                in_run = true;
            } else if in_run {
                self.destroy(storage, key);
                in_run = false;
            }
            key = next;
        }

        true
    }
}
