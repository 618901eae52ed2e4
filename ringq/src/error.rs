//! Error types for queue construction and insertion.

use core::fmt;
use std::collections::TryReserveError;

/// Error returned when storage has no free slot.
///
/// Carries the value that could not be inserted so the caller can recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

/// Error raised while building a queue or inserting a string into one.
///
/// A failed insert leaves the queue exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// Every storage slot is occupied.
    Full,
    /// Memory for the slot array or a string copy could not be reserved.
    AllocationFailed,
    /// Capacity is zero.
    ZeroCapacity,
    /// Requested capacity does not fit the key type.
    CapacityOverflow { requested: usize, max: usize },
    /// The queue key does not name a queue of this set.
    UnknownQueue,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full => write!(f, "storage is full"),
            QueueError::AllocationFailed => write!(f, "memory allocation failed"),
            QueueError::ZeroCapacity => write!(f, "capacity cannot be zero"),
            QueueError::CapacityOverflow { requested, max } => {
                write!(f, "capacity ({requested}) exceeds key maximum ({max})")
            }
            QueueError::UnknownQueue => write!(f, "unknown queue"),
        }
    }
}

impl std::error::Error for QueueError {}

impl<T> From<Full<T>> for QueueError {
    fn from(_: Full<T>) -> Self {
        QueueError::Full
    }
}

impl From<TryReserveError> for QueueError {
    fn from(_: TryReserveError) -> Self {
        QueueError::AllocationFailed
    }
}
