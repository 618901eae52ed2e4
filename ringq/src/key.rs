//! Key trait for storage slots.
//!
//! A [`Key`] names a slot in [`Storage`](crate::Storage). One value per key
//! type, [`Key::NONE`], is reserved: no slot ever carries it, and lists use it
//! to address their sentinel.

/// Index type naming a storage slot.
///
/// # Example
///
/// ```
/// use ringq::Key;
///
/// let key: u32 = 7;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// ```
///
/// # Custom Key Types
///
/// ```
/// use ringq::Key;
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// struct Slot(u32);
///
/// impl Key for Slot {
///     const NONE: Self = Slot(u32::MAX);
///
///     fn from_usize(val: usize) -> Self {
///         Slot(val as u32)
///     }
///
///     fn as_usize(&self) -> usize {
///         self.0 as usize
///     }
/// }
///
/// assert!(Slot::NONE.is_none());
/// ```
pub trait Key: Copy + Eq {
    /// Reserved value. Inside a list it references the sentinel.
    const NONE: Self;

    /// Creates a key from a slot index.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot index.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the reserved value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this names a real slot.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u16, u32, u64, usize);
