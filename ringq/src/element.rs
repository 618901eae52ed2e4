//! String payload and the string-specific insert/remove operations.

use core::fmt;

use tracing::debug;

use crate::{Full, Key, List, ListNode, QueueError, Storage};

/// A queue payload owning a copy of the caller's string.
///
/// Elements order byte-wise, the same as `str`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element {
    value: String,
}

impl Element {
    /// Duplicates `value` into a new element.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailed`] if the copy cannot be
    /// reserved.
    pub fn try_new(value: &str) -> Result<Self, QueueError> {
        let mut owned = String::new();
        owned.try_reserve_exact(value.len())?;
        owned.push_str(value);
        Ok(Self { value: owned })
    }

    /// Returns the stored string.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the stored string as bytes, without a terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Consumes the element, returning its string.
    #[inline]
    pub fn into_string(self) -> String {
        self.value
    }

    /// Copies the value into `buf` as a NUL-terminated byte string.
    ///
    /// At most `buf.len() - 1` bytes are copied, followed by a `0`. A
    /// truncated copy may split a multi-byte character. Returns the number of
    /// value bytes written; an empty buffer is left untouched.
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let Some(room) = buf.len().checked_sub(1) else {
            return 0;
        };

        let bytes = self.value.as_bytes();
        let n = bytes.len().min(room);
        buf[..n].copy_from_slice(&bytes[..n]);
        buf[n] = 0;
        n
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<S, K: Key> List<Element, S, K>
where
    S: Storage<ListNode<Element, K>, Key = K>,
{
    /// Inserts a copy of `value` at the head.
    ///
    /// # Errors
    ///
    /// On failure nothing is allocated and the list is unchanged.
    pub fn insert_head(&mut self, storage: &mut S, value: &str) -> Result<K, QueueError> {
        let element = Element::try_new(value)?;
        self.try_push_front(storage, element).map_err(rejected)
    }

    /// Inserts a copy of `value` at the tail.
    ///
    /// # Errors
    ///
    /// On failure nothing is allocated and the list is unchanged.
    pub fn insert_tail(&mut self, storage: &mut S, value: &str) -> Result<K, QueueError> {
        let element = Element::try_new(value)?;
        self.try_push_back(storage, element).map_err(rejected)
    }

    /// Detaches the head element and hands it to the caller.
    ///
    /// When `buf` is supplied the value is also copied into it, see
    /// [`Element::copy_to`].
    pub fn remove_head(&mut self, storage: &mut S, buf: Option<&mut [u8]>) -> Option<Element> {
        let element = self.pop_front(storage)?;
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Detaches the tail element and hands it to the caller.
    pub fn remove_tail(&mut self, storage: &mut S, buf: Option<&mut [u8]>) -> Option<Element> {
        let element = self.pop_back(storage)?;
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Returns the stored strings, front to back.
    pub fn values<'a>(&self, storage: &'a S) -> impl Iterator<Item = &'a str> + 'a
    where
        K: 'a,
    {
        self.iter(storage).map(Element::value)
    }
}

fn rejected(Full(element): Full<Element>) -> QueueError {
    debug!(len = element.value.len(), "storage full, insert rejected");
    QueueError::Full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxedListStorage;

    type TestStorage = BoxedListStorage<Element>;
    type TestList = List<Element, TestStorage>;

    #[test]
    fn try_new_copies_value() {
        let source = String::from("hello");
        let element = Element::try_new(&source).unwrap();
        drop(source);

        assert_eq!(element.value(), "hello");
        assert_eq!(element.to_string(), "hello");
        assert_eq!(element.into_string(), "hello");
    }

    #[test]
    fn ordering_is_bytewise() {
        let upper = Element::try_new("B").unwrap();
        let lower = Element::try_new("a").unwrap();
        let prefix = Element::try_new("a").unwrap();
        let longer = Element::try_new("ab").unwrap();

        assert!(upper < lower);
        assert!(prefix < longer);
        assert_eq!(lower, prefix);
    }

    #[test]
    fn copy_to_truncates_and_terminates() {
        let element = Element::try_new("abcdef").unwrap();

        let mut buf = [0xffu8; 4];
        assert_eq!(element.copy_to(&mut buf), 3);
        assert_eq!(&buf, b"abc\0");

        let mut buf = [0xffu8; 10];
        assert_eq!(element.copy_to(&mut buf), 6);
        assert_eq!(&buf[..7], b"abcdef\0");

        let mut buf = [0xffu8; 1];
        assert_eq!(element.copy_to(&mut buf), 0);
        assert_eq!(buf, [0]);

        let mut buf: [u8; 0] = [];
        assert_eq!(element.copy_to(&mut buf), 0);
    }

    #[test]
    fn insert_head_and_tail() {
        let mut storage = TestStorage::with_capacity(8).unwrap();
        let mut list = TestList::new();

        list.insert_tail(&mut storage, "b").unwrap();
        list.insert_head(&mut storage, "a").unwrap();
        list.insert_tail(&mut storage, "c").unwrap();

        assert_eq!(list.values(&storage).collect::<Vec<_>>(), ["a", "b", "c"]);
        assert!(list.is_well_formed(&storage));
    }

    #[test]
    fn insert_into_full_storage_is_rejected() {
        let mut storage = TestStorage::with_capacity(1).unwrap();
        let mut list = TestList::new();

        list.insert_head(&mut storage, "a").unwrap();
        assert_eq!(list.insert_tail(&mut storage, "b"), Err(QueueError::Full));
        assert_eq!(list.values(&storage).collect::<Vec<_>>(), ["a"]);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn remove_head_copies_into_buffer() {
        let mut storage = TestStorage::with_capacity(8).unwrap();
        let mut list = TestList::new();

        list.insert_tail(&mut storage, "x").unwrap();
        list.insert_tail(&mut storage, "y").unwrap();

        let mut buf = [0u8; 8];
        let element = list.remove_head(&mut storage, Some(&mut buf)).unwrap();

        assert_eq!(element.value(), "x");
        assert_eq!(&buf[..2], b"x\0");
        assert_eq!(list.values(&storage).collect::<Vec<_>>(), ["y"]);
    }

    #[test]
    fn remove_tail_without_buffer() {
        let mut storage = TestStorage::with_capacity(8).unwrap();
        let mut list = TestList::new();

        list.insert_tail(&mut storage, "x").unwrap();
        list.insert_tail(&mut storage, "y").unwrap();

        assert_eq!(list.remove_tail(&mut storage, None).unwrap().value(), "y");
        assert_eq!(list.remove_tail(&mut storage, None).unwrap().value(), "x");
        assert!(list.remove_tail(&mut storage, None).is_none());
        assert!(list.remove_head(&mut storage, None).is_none());
        assert!(storage.is_empty());
    }
}
