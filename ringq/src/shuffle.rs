//! In-place Fisher–Yates shuffle over payloads.

use core::mem;

use rand::Rng;
use rand_core::RngCore;
use tracing::trace;

use crate::{Key, List, ListNode, Storage};

impl<T: Default, S, K: Key> List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    /// Shuffles the payloads uniformly using `rng`.
    ///
    /// Payloads are swapped between nodes; links and keys stay where they
    /// are. Each step walks from the head to the drawn index, so this runs in
    /// O(n²) time with O(1) extra space.
    pub fn shuffle<R: RngCore>(&mut self, storage: &mut S, rng: &mut R) {
        let len = self.size(storage);
        if len < 2 {
            return;
        }

        // Boundary of the unshuffled prefix, walking back from the tail
        let mut boundary = self.prev_of(storage, K::NONE);
        for i in (1..=len).rev() {
            let j = rng.random_range(0..i);

            let mut picked = self.head_key();
            for _ in 0..j {
                picked = self.next_of(storage, picked);
            }

            if picked != boundary {
                // Safety: both keys are distinct live nodes of this list
                unsafe {
                    let taken = mem::take(&mut storage.get_unchecked_mut(picked).data);
                    let displaced =
                        mem::replace(&mut storage.get_unchecked_mut(boundary).data, taken);
                    storage.get_unchecked_mut(picked).data = displaced;
                }
            }

            boundary = self.prev_of(storage, boundary);
        }

        trace!(len, "shuffled");
    }
}
