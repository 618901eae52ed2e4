//! Merge sort and the monotonic filters.
//!
//! Sorting detaches the cycle into a chain linked through `next` only,
//! sorts it recursively and reattaches it, rebuilding every `prev` in a
//! single pass.

use core::cmp::Ordering;

use crate::{Key, List, ListNode, Storage};

#[inline]
fn next_link<T, S, K: Key>(storage: &S, key: K) -> K
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    // Safety: chain keys name occupied slots
    unsafe { storage.get_unchecked(key) }.next
}

#[inline]
fn set_next_link<T, S, K: Key>(storage: &mut S, key: K, to: K)
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    // Safety: chain keys name occupied slots
    unsafe { storage.get_unchecked_mut(key) }.next = to;
}

/// Merges two sorted `NONE`-terminated chains into one.
///
/// Stable: on ties the node of `left` comes first, in either direction.
pub(crate) fn merge_chains<T: Ord, S, K: Key>(
    storage: &mut S,
    mut left: K,
    mut right: K,
    descending: bool,
) -> K
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    let mut head = K::NONE;
    let mut tail = K::NONE;

    while left.is_some() && right.is_some() {
        // Safety: both keys are live chain nodes
        let take_left = unsafe {
            let l = &storage.get_unchecked(left).data;
            let r = &storage.get_unchecked(right).data;
            if descending { l >= r } else { l <= r }
        };

        let key = if take_left {
            let key = left;
            left = next_link(storage, key);
            key
        } else {
            let key = right;
            right = next_link(storage, key);
            key
        };

        if tail.is_none() {
            head = key;
        } else {
            set_next_link(storage, tail, key);
        }
        tail = key;
    }

    let rest = if left.is_some() { left } else { right };
    if tail.is_none() {
        return rest;
    }
    set_next_link(storage, tail, rest);
    head
}

fn merge_sort<T: Ord, S, K: Key>(storage: &mut S, head: K, descending: bool) -> K
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    if head.is_none() || next_link(storage, head).is_none() {
        return head;
    }

    // slow lands on the last node of the left half
    let mut slow = head;
    let mut fast = next_link(storage, head);
    while fast.is_some() {
        let next = next_link(storage, fast);
        if next.is_none() {
            break;
        }
        slow = next_link(storage, slow);
        fast = next_link(storage, next);
    }

    let right = next_link(storage, slow);
    set_next_link(storage, slow, K::NONE);

    let left = merge_sort(storage, head, descending);
    let right = merge_sort(storage, right, descending);
    merge_chains(storage, left, right, descending)
}

impl<T: Ord, S, K: Key> List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    /// Sorts the list in place, stable, by relinking nodes.
    ///
    /// `descending` flips which side wins a comparison; equal elements keep
    /// their relative order in both directions.
    pub fn sort(&mut self, storage: &mut S, descending: bool) {
        // Empty or singleton
        if self.front_key() == self.back_key() {
            return;
        }

        let chain = self.take_chain();
        let sorted = merge_sort(storage, chain, descending);
        self.attach_chain(storage, sorted);
    }

    /// Removes every element that has a strictly smaller element anywhere to
    /// its right. The result is non-decreasing.
    ///
    /// Returns the resulting size.
    pub fn ascend(&mut self, storage: &mut S) -> usize {
        self.filter_monotonic(storage, Ordering::Greater)
    }

    /// Removes every element that has a strictly greater element anywhere to
    /// its right. The result is non-increasing.
    ///
    /// Returns the resulting size.
    pub fn descend(&mut self, storage: &mut S) -> usize {
        self.filter_monotonic(storage, Ordering::Less)
    }

    /// Walks right to left keeping the best value so far, destroying every
    /// element that compares `wrong_side` against it.
    fn filter_monotonic(&mut self, storage: &mut S, wrong_side: Ordering) -> usize {
        if self.is_empty() {
            return 0;
        }

        self.reverse(storage);

        let mut best = self.head_key();
        let mut key = self.next_of(storage, best);
        while key.is_some() {
            let next = self.next_of(storage, key);
            // Safety: key and best are live nodes of this list
            let order = unsafe {
                storage
                    .get_unchecked(key)
                    .data
                    .cmp(&storage.get_unchecked(best).data)
            };

            if order == wrong_side {
                self.destroy(storage, key);
            } else {
                best = key;
            }
            key = next;
        }

        self.reverse(storage);
        self.size(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxedListStorage;

    type TestStorage = BoxedListStorage<u32>;
    type TestList = List<u32, TestStorage>;

    fn build(items: &[u32]) -> (TestStorage, TestList) {
        let mut storage = TestStorage::with_capacity(64).unwrap();
        let mut list = TestList::new();
        for &item in items {
            list.try_push_back(&mut storage, item).unwrap();
        }
        (storage, list)
    }

    fn values(list: &TestList, storage: &TestStorage) -> Vec<u32> {
        let out: Vec<_> = list.iter(storage).copied().collect();
        assert!(list.is_well_formed(storage));
        out
    }

    /// Orders by `rank` only; `tag` tracks the original position.
    #[derive(Debug, Clone, Copy)]
    struct Tagged {
        rank: u32,
        tag: char,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.rank == other.rank
        }
    }

    impl Eq for Tagged {}

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> Ordering {
            self.rank.cmp(&other.rank)
        }
    }

    #[test]
    fn sort_ascending_and_descending() {
        let (mut storage, mut list) = build(&[5, 1, 4, 2, 3, 2]);

        list.sort(&mut storage, false);
        assert_eq!(values(&list, &storage), vec![1, 2, 2, 3, 4, 5]);

        list.sort(&mut storage, true);
        assert_eq!(values(&list, &storage), vec![5, 4, 3, 2, 2, 1]);
    }

    #[test]
    fn sort_trivial_lists() {
        let (mut storage, mut list) = build(&[]);
        list.sort(&mut storage, false);
        assert!(list.is_empty());

        let (mut storage, mut list) = build(&[9]);
        list.sort(&mut storage, true);
        assert_eq!(values(&list, &storage), vec![9]);

        let (mut storage, mut list) = build(&[2, 1]);
        list.sort(&mut storage, false);
        assert_eq!(values(&list, &storage), vec![1, 2]);
    }

    #[test]
    fn sort_is_stable_both_directions() {
        let items = [
            Tagged { rank: 1, tag: 'a' },
            Tagged { rank: 0, tag: 'b' },
            Tagged { rank: 1, tag: 'c' },
            Tagged { rank: 0, tag: 'd' },
            Tagged { rank: 1, tag: 'e' },
        ];

        let mut storage: BoxedListStorage<Tagged> = BoxedListStorage::with_capacity(8).unwrap();
        let mut list: List<Tagged, BoxedListStorage<Tagged>> = List::new();
        for item in items {
            list.try_push_back(&mut storage, item).unwrap();
        }

        list.sort(&mut storage, false);
        let tags: String = list.iter(&storage).map(|t| t.tag).collect();
        assert_eq!(tags, "bdace");

        list.sort(&mut storage, true);
        let tags: String = list.iter(&storage).map(|t| t.tag).collect();
        assert_eq!(tags, "acebd");
        assert!(list.is_well_formed(&storage));
    }

    #[test]
    fn merge_chains_prefers_left_on_ties() {
        let (mut storage, mut left) = build(&[1, 3, 3]);
        let mut right = TestList::new();
        let r1 = right.try_push_back(&mut storage, 3).unwrap();
        right.try_push_back(&mut storage, 4).unwrap();

        let l = left.take_chain();
        let r = right.take_chain();
        let merged = merge_chains::<u32, _, _>(&mut storage, l, r, false);

        let mut out = TestList::new();
        assert_eq!(out.attach_chain(&mut storage, merged), 5);
        assert_eq!(values(&out, &storage), vec![1, 3, 3, 3, 4]);

        // right's 3 follows both of left's
        let keys: Vec<_> = out.keys(&storage).collect();
        assert_eq!(keys[3], r1);
    }

    #[test]
    fn merge_chains_with_empty_side() {
        let (mut storage, mut left) = build(&[1, 2]);
        let l = left.take_chain();

        let merged = merge_chains::<u32, _, _>(&mut storage, u32::NONE, l, false);
        let mut out = TestList::new();
        out.attach_chain(&mut storage, merged);
        assert_eq!(values(&out, &storage), vec![1, 2]);

        assert!(merge_chains::<u32, _, _>(&mut storage, u32::NONE, u32::NONE, true).is_none());
    }

    #[test]
    fn ascend_keeps_non_decreasing_residue() {
        let (mut storage, mut list) = build(&[5, 2, 13, 3, 8]);
        assert_eq!(list.ascend(&mut storage), 3);
        assert_eq!(values(&list, &storage), vec![2, 3, 8]);
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn descend_keeps_non_increasing_residue() {
        let (mut storage, mut list) = build(&[5, 2, 13, 3, 8]);
        assert_eq!(list.descend(&mut storage), 2);
        assert_eq!(values(&list, &storage), vec![13, 8]);
    }

    #[test]
    fn filters_keep_equal_values() {
        let (mut storage, mut list) = build(&[2, 2, 1, 1]);
        assert_eq!(list.descend(&mut storage), 4);

        let (mut storage, mut list) = build(&[1, 1, 1]);
        assert_eq!(list.ascend(&mut storage), 3);
    }

    #[test]
    fn filters_on_empty_list() {
        let (mut storage, mut list) = build(&[]);
        assert_eq!(list.ascend(&mut storage), 0);
        assert_eq!(list.descend(&mut storage), 0);
    }
}
