//! Circular doubly-linked string queues over stable-index storage.
//!
//! A [`List`] is the sentinel of a circular doubly-linked list whose nodes
//! live in an external [`Storage`] and link to each other by [`Key`]. On top
//! of the O(1) link primitives the crate provides structural transforms,
//! a stable merge sort, monotonic filters, a k-way merge over several queues
//! and a Fisher–Yates shuffle. All of them rewire links in place.
//!
//! ```text
//! Storage (BoxedStorage)   - owns nodes, hands out stable keys
//! List                     - sentinel; coordinates keys, owns nothing
//! Queue / QueueSet         - own their storage, string payloads
//! ```
//!
//! # Quick Start
//!
//! ```
//! use ringq::Queue;
//!
//! let mut queue = Queue::with_capacity(64).unwrap();
//! for s in ["a", "a", "b", "c", "c", "c"] {
//!     queue.insert_tail(s).unwrap();
//! }
//!
//! // Sorted input: every duplicated run disappears
//! queue.delete_duplicates();
//! assert_eq!(queue.values().collect::<Vec<_>>(), ["b"]);
//! ```
//!
//! # Working With Storage Directly
//!
//! Every operation is also available on a bare [`List`] taking the storage as
//! an argument, for any payload that supports what the operation needs
//! (`Ord` for sorting, `Default` for shuffling).
//!
//! ```
//! use ringq::{BoxedListStorage, List};
//!
//! let mut storage: BoxedListStorage<u32> = BoxedListStorage::with_capacity(16).unwrap();
//! let mut list: List<u32, BoxedListStorage<u32>> = List::new();
//!
//! for i in 1..=5 {
//!     list.try_push_back(&mut storage, i).unwrap();
//! }
//!
//! list.reverse_k_group(&mut storage, 2);
//! assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), [2, 1, 4, 3, 5]);
//! assert!(list.is_well_formed(&storage));
//! ```
//!
//! # Same Storage Instance
//!
//! All operations on a list must use the storage instance its nodes were
//! inserted into. The owned [`Queue`] and [`QueueSet`] enforce this by
//! construction.
//!
//! # Logging
//!
//! Events are emitted through `tracing` (storage reservation, rejected
//! inserts, merges). No subscriber is installed by the crate.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

pub mod element;
pub mod error;
pub mod key;
pub mod list;
pub mod merge;
pub mod queue;
pub mod set;
mod shuffle;
mod sort;
pub mod storage;
mod transform;

pub use element::Element;
pub use error::{Full, QueueError};
pub use key::Key;
pub use list::{BoxedListStorage, Iter, Keys, List, ListNode};
pub use merge::QueueContext;
pub use queue::{DEFAULT_CAPACITY, DEFAULT_QUEUES, Queue, QueueBuilder};
pub use set::{QueueId, QueueSet};
pub use storage::{BoxedStorage, Storage};

#[cfg(feature = "slab")]
pub use list::SlabListStorage;
