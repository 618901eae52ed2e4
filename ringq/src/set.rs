//! A chain of queues sharing one element storage.
//!
//! [`QueueSet`] keeps every queue as a [`QueueContext`] linked into a parent
//! list, so the whole set can be merged into its first queue by relinking
//! only.

use tracing::debug;

use crate::{
    BoxedListStorage, BoxedStorage, Element, Key, List, ListNode, QueueBuilder, QueueContext,
    QueueError, Storage,
};

type Elements<K> = BoxedListStorage<Element, K>;
type Context<K> = QueueContext<Element, Elements<K>, K>;
type Contexts<K> = BoxedStorage<ListNode<Context<K>, K>, K>;

/// Handle naming one queue of a [`QueueSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId<K: Key = u32>(K);

impl<K: Key> QueueId<K> {
    /// Returns the context slot behind this handle.
    #[inline]
    pub fn key(self) -> K {
        self.0
    }
}

/// Several string queues over one element storage.
///
/// # Example
///
/// ```
/// use ringq::QueueSet;
///
/// let mut set = QueueSet::with_capacity(32, 4).unwrap();
/// let a = set.new_queue().unwrap();
/// let b = set.new_queue().unwrap();
///
/// set.insert_tail(a, "a").unwrap();
/// set.insert_tail(a, "c").unwrap();
/// set.insert_tail(b, "b").unwrap();
/// set.insert_tail(b, "d").unwrap();
///
/// assert_eq!(set.merge(false), 4);
/// assert_eq!(set.values(a).unwrap().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
/// assert_eq!(set.size(b).unwrap(), 0);
/// ```
pub struct QueueSet<K: Key = u32> {
    elements: Elements<K>,
    contexts: Contexts<K>,
    chain: List<Context<K>, Contexts<K>, K>,
    next_id: usize,
}

impl QueueSet {
    /// Creates a set with `capacity` element slots shared by up to `queues`
    /// queues.
    pub fn with_capacity(capacity: usize, queues: usize) -> Result<Self, QueueError> {
        Self::from_builder(capacity, queues)
    }

    /// Returns a builder; finish it with [`QueueBuilder::build_set`].
    pub const fn builder() -> QueueBuilder {
        QueueBuilder::new()
    }
}

impl<K: Key> QueueSet<K> {
    pub(crate) fn from_builder(capacity: usize, queues: usize) -> Result<Self, QueueError> {
        Ok(Self {
            elements: BoxedStorage::with_capacity(capacity)?,
            contexts: BoxedStorage::with_capacity(queues)?,
            chain: List::new(),
            next_id: 0,
        })
    }

    fn context(&self, queue: QueueId<K>) -> Result<&Context<K>, QueueError> {
        self.contexts
            .get(queue.0)
            .map(ListNode::data)
            .ok_or(QueueError::UnknownQueue)
    }

    /// Borrows a queue's context together with the shared element storage.
    fn split_mut(
        &mut self,
        queue: QueueId<K>,
    ) -> Result<(&mut Context<K>, &mut Elements<K>), QueueError> {
        let ctx = self
            .contexts
            .get_mut(queue.0)
            .map(|node| &mut node.data)
            .ok_or(QueueError::UnknownQueue)?;
        Ok((ctx, &mut self.elements))
    }

    /// Appends a new empty queue to the set.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] once every queue slot is taken.
    pub fn new_queue(&mut self) -> Result<QueueId<K>, QueueError> {
        let id = self.next_id;
        let key = self
            .chain
            .try_push_back(&mut self.contexts, QueueContext::new(id))?;
        self.next_id += 1;
        Ok(QueueId(key))
    }

    /// Removes a queue and drops its elements. Returns how many were dropped.
    pub fn remove_queue(&mut self, queue: QueueId<K>) -> Result<usize, QueueError> {
        let ctx = self
            .chain
            .remove(&mut self.contexts, queue.0)
            .ok_or(QueueError::UnknownQueue)?;

        let dropped = ctx.size();
        ctx.into_queue().clear(&mut self.elements);
        Ok(dropped)
    }

    /// Number of queues in the set.
    pub fn queue_count(&self) -> usize {
        self.chain.size(&self.contexts)
    }

    /// Queue handles in creation order.
    pub fn queues(&self) -> impl Iterator<Item = QueueId<K>> + '_ {
        self.chain.keys(&self.contexts).map(QueueId)
    }

    /// Identifier assigned when the queue was created.
    pub fn id(&self, queue: QueueId<K>) -> Result<usize, QueueError> {
        Ok(self.context(queue)?.id())
    }

    /// Recorded element count of a queue.
    pub fn size(&self, queue: QueueId<K>) -> Result<usize, QueueError> {
        Ok(self.context(queue)?.size())
    }

    /// Total elements across every queue.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if no queue holds any element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Inserts a copy of `value` at the head of `queue`.
    ///
    /// # Errors
    ///
    /// [`QueueError::UnknownQueue`] for a stale id, otherwise as
    /// [`Queue::insert_head`](crate::Queue::insert_head).
    pub fn insert_head(&mut self, queue: QueueId<K>, value: &str) -> Result<K, QueueError> {
        let (ctx, elements) = self.split_mut(queue)?;

        let key = ctx.queue_mut().insert_head(elements, value)?;
        ctx.set_size(ctx.size() + 1);
        Ok(key)
    }

    /// Inserts a copy of `value` at the tail of `queue`.
    pub fn insert_tail(&mut self, queue: QueueId<K>, value: &str) -> Result<K, QueueError> {
        let (ctx, elements) = self.split_mut(queue)?;

        let key = ctx.queue_mut().insert_tail(elements, value)?;
        ctx.set_size(ctx.size() + 1);
        Ok(key)
    }

    /// Removes the head element of a queue, copying its value into `buf` if
    /// given.
    pub fn remove_head(
        &mut self,
        queue: QueueId<K>,
        buf: Option<&mut [u8]>,
    ) -> Result<Option<Element>, QueueError> {
        let (ctx, elements) = self.split_mut(queue)?;

        let element = ctx.queue_mut().remove_head(elements, buf);
        if element.is_some() {
            ctx.set_size(ctx.size() - 1);
        }
        Ok(element)
    }

    /// Removes the tail element of a queue.
    pub fn remove_tail(
        &mut self,
        queue: QueueId<K>,
        buf: Option<&mut [u8]>,
    ) -> Result<Option<Element>, QueueError> {
        let (ctx, elements) = self.split_mut(queue)?;

        let element = ctx.queue_mut().remove_tail(elements, buf);
        if element.is_some() {
            ctx.set_size(ctx.size() - 1);
        }
        Ok(element)
    }

    /// Sorts one queue in place.
    pub fn sort(&mut self, queue: QueueId<K>, descending: bool) -> Result<(), QueueError> {
        let (ctx, elements) = self.split_mut(queue)?;

        ctx.queue_mut().sort(elements, descending);
        Ok(())
    }

    /// Values of one queue, front to back.
    pub fn values(
        &self,
        queue: QueueId<K>,
    ) -> Result<impl Iterator<Item = &str> + '_, QueueError> {
        Ok(self.context(queue)?.queue().values(&self.elements))
    }

    /// Merges every queue into the first one.
    ///
    /// Each queue must already be sorted in the requested direction; use
    /// [`sort_all`](Self::sort_all) first otherwise. Returns the size of the
    /// merged queue.
    pub fn merge(&mut self, descending: bool) -> usize {
        self.chain
            .merge_queues(&mut self.contexts, &mut self.elements, descending)
    }

    /// Sorts every queue in the set.
    pub fn sort_all(&mut self, descending: bool) {
        let Self {
            elements,
            contexts,
            chain,
            ..
        } = self;

        let mut sorted = 0usize;
        let mut next = chain.front_key();
        while let Some(key) = next {
            // Safety: key comes from traversing the chain
            let ctx = &mut unsafe { contexts.get_unchecked_mut(key) }.data;
            ctx.queue_mut().sort(elements, descending);
            sorted += 1;
            next = chain.next_key(contexts, key);
        }

        debug!(queues = sorted, descending, "sorted every queue");
    }

    /// Checks the link invariant of every queue and of the chain itself.
    pub fn is_well_formed(&self) -> bool {
        self.chain.is_well_formed(&self.contexts)
            && self.chain.iter(&self.contexts).all(|ctx| {
                ctx.queue().is_well_formed(&self.elements)
                    && ctx.queue().size(&self.elements) == ctx.size()
            })
    }
}
