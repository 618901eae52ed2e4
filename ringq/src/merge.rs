//! K-way merge over a list of queue contexts.
//!
//! Every context wraps one element queue. All queues share a single element
//! storage, so merging only relinks nodes: no payload moves and nothing is
//! allocated.

use tracing::debug;

use crate::sort::merge_chains;
use crate::{Key, List, ListNode, Storage};

/// One input queue of a merge: the queue, its recorded size and an id.
///
/// The context does not own the queue's elements, the shared element storage
/// does. Dropping a context with a non-empty queue leaves those elements in
/// storage; clear the queue first.
#[derive(Debug)]
pub struct QueueContext<T, S, K: Key = u32>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    queue: List<T, S, K>,
    size: usize,
    id: usize,
}

impl<T, S, K: Key> QueueContext<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    /// Creates a context around an empty queue.
    pub const fn new(id: usize) -> Self {
        Self {
            queue: List::new(),
            size: 0,
            id,
        }
    }

    /// Wraps an existing queue, recording its current size.
    pub fn from_queue(id: usize, queue: List<T, S, K>, storage: &S) -> Self {
        let size = queue.size(storage);
        Self { queue, size, id }
    }

    /// Identifier this context was created with.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Recorded element count.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Overwrites the recorded element count.
    ///
    /// The queue itself is not touched; see [`resync`](Self::resync) to
    /// recount from storage.
    #[inline]
    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    /// The queue header.
    #[inline]
    pub fn queue(&self) -> &List<T, S, K> {
        &self.queue
    }

    /// Returns the queue mutably. Callers keep the recorded size in step.
    #[inline]
    pub fn queue_mut(&mut self) -> &mut List<T, S, K> {
        &mut self.queue
    }

    /// Re-records the size by walking the queue.
    pub fn resync(&mut self, storage: &S) -> usize {
        self.size = self.queue.size(storage);
        self.size
    }

    /// Unwraps the queue.
    pub fn into_queue(self) -> List<T, S, K> {
        self.queue
    }
}

impl<T: Ord, S, K: Key, CS, CK: Key> List<QueueContext<T, S, K>, CS, CK>
where
    S: Storage<ListNode<T, K>, Key = K>,
    CS: Storage<ListNode<QueueContext<T, S, K>, CK>, Key = CK>,
{
    /// Merges every context's queue into the first context's queue.
    ///
    /// Each queue must already be sorted in the requested direction. Folded
    /// queues are left empty with a recorded size of 0; the first context
    /// records the total, which is returned.
    ///
    /// An empty contexts list returns 0. A single context returns its
    /// recorded size untouched.
    pub fn merge_queues(&mut self, contexts: &mut CS, storage: &mut S, descending: bool) -> usize {
        let Some(first) = self.front_key() else {
            return 0;
        };
        let Some(mut other) = self.next_key(contexts, first) else {
            // Safety: first is the live head of this list
            return unsafe { contexts.get_unchecked(first) }.data.size;
        };

        // Safety: keys below come from traversing this list
        let mut merged = unsafe { contexts.get_unchecked_mut(first) }.data.queue.take_chain();
        let mut folded = 0usize;
        loop {
            let ctx = &mut unsafe { contexts.get_unchecked_mut(other) }.data;
            let chain = ctx.queue.take_chain();
            ctx.size = 0;

            merged = merge_chains(storage, merged, chain, descending);
            folded += 1;

            match self.next_key(contexts, other) {
                Some(next) => other = next,
                None => break,
            }
        }

        let ctx = &mut unsafe { contexts.get_unchecked_mut(first) }.data;
        let total = ctx.queue.attach_chain(storage, merged);
        ctx.size = total;

        debug!(queues = folded + 1, total, descending, "merged queues");
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxedListStorage, BoxedStorage, Element};

    type Elements = BoxedListStorage<Element>;
    type Context = QueueContext<Element, Elements>;
    type Contexts = BoxedStorage<ListNode<Context, u32>, u32>;
    type ContextList = List<Context, Contexts>;

    struct Fixture {
        elements: Elements,
        contexts: Contexts,
        list: ContextList,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                elements: Elements::with_capacity(64).unwrap(),
                contexts: Contexts::with_capacity(8).unwrap(),
                list: ContextList::new(),
            }
        }

        fn add(&mut self, values: &[&str]) -> u32 {
            let mut queue = List::new();
            for value in values {
                queue.insert_tail(&mut self.elements, value).unwrap();
            }
            let id = self.list.size(&self.contexts);
            let ctx = QueueContext::from_queue(id, queue, &self.elements);
            self.list.try_push_back(&mut self.contexts, ctx).ok().unwrap()
        }

        fn ctx(&self, key: u32) -> &Context {
            self.list.get(&self.contexts, key).unwrap()
        }

        fn values(&self, key: u32) -> Vec<&str> {
            self.ctx(key).queue().values(&self.elements).collect()
        }

        fn merge(&mut self, descending: bool) -> usize {
            self.list
                .merge_queues(&mut self.contexts, &mut self.elements, descending)
        }
    }

    #[test]
    fn merge_two_sorted_queues() {
        let mut fx = Fixture::new();
        let a = fx.add(&["a", "c"]);
        let b = fx.add(&["b", "d"]);

        assert_eq!(fx.merge(false), 4);
        assert_eq!(fx.values(a), ["a", "b", "c", "d"]);
        assert_eq!(fx.ctx(a).size(), 4);
        assert!(fx.ctx(b).queue().is_empty());
        assert_eq!(fx.ctx(b).size(), 0);
        assert!(fx.ctx(a).queue().is_well_formed(&fx.elements));
    }

    #[test]
    fn merge_descending_with_empty_queue() {
        let mut fx = Fixture::new();
        let a = fx.add(&["d", "b"]);
        let empty = fx.add(&[]);
        let c = fx.add(&["e", "c", "a"]);

        assert_eq!(fx.merge(true), 5);
        assert_eq!(fx.values(a), ["e", "d", "c", "b", "a"]);
        assert_eq!(fx.ctx(empty).size(), 0);
        assert_eq!(fx.ctx(c).size(), 0);
        assert!(fx.ctx(c).queue().is_empty());
    }

    #[test]
    fn merge_into_empty_first_queue() {
        let mut fx = Fixture::new();
        let a = fx.add(&[]);
        fx.add(&["x", "y"]);

        assert_eq!(fx.merge(false), 2);
        assert_eq!(fx.values(a), ["x", "y"]);
    }

    #[test]
    fn merge_degenerate_cases() {
        let mut fx = Fixture::new();
        assert_eq!(fx.merge(false), 0);

        let a = fx.add(&["b", "a"]);
        // Recorded size comes back, nothing is reordered
        assert_eq!(fx.merge(false), 2);
        assert_eq!(fx.values(a), ["b", "a"]);
    }

    #[test]
    fn merge_is_stable_across_queues() {
        let mut fx = Fixture::new();
        let a = fx.add(&["k"]);
        let b = fx.add(&["k"]);

        let first = fx.ctx(a).queue().front_key().unwrap();
        let second = fx.ctx(b).queue().front_key().unwrap();

        fx.merge(false);
        let keys: Vec<_> = fx.ctx(a).queue().keys(&fx.elements).collect();
        assert_eq!(keys, vec![first, second]);
    }

    #[test]
    fn context_accessors() {
        let mut elements = Elements::with_capacity(4).unwrap();
        let mut ctx: Context = QueueContext::new(7);

        assert_eq!(ctx.id(), 7);
        assert_eq!(ctx.size(), 0);

        ctx.queue_mut().insert_tail(&mut elements, "v").unwrap();
        assert_eq!(ctx.size(), 0);
        assert_eq!(ctx.resync(&elements), 1);

        ctx.set_size(3);
        assert_eq!(ctx.size(), 3);

        let mut queue = ctx.into_queue();
        queue.clear(&mut elements);
        assert!(elements.is_empty());
    }
}
