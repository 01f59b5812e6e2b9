//! The payload storage backing a [`crate::Frame`].

use bytes::Bytes;
use std::fmt;

/// A frame's application data, stored either owned or as a cheaply-shared view.
///
/// Outbound frames and any payload the codec mutates in place (masking, unmasking)
/// always use the owned form. A parse of an unmasked frame may instead hand back a
/// [`Bytes`] slice of the caller's own buffer without copying; the two representations
/// are otherwise indistinguishable to callers.
#[derive(Debug, Clone)]
pub enum PayloadBuffer {
    /// Exclusively owned bytes.
    Owned(Vec<u8>),
    /// A cheaply-cloned, immutable view into a caller-owned buffer.
    Shared(Bytes),
}

impl PayloadBuffer {
    /// Borrow the payload as a byte slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            PayloadBuffer::Owned(v) => v.as_slice(),
            PayloadBuffer::Shared(b) => b.as_ref(),
        }
    }

    /// Number of bytes in the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take ownership of the bytes, copying only if currently shared.
    #[must_use]
    pub fn into_owned(self) -> Vec<u8> {
        match self {
            PayloadBuffer::Owned(v) => v,
            PayloadBuffer::Shared(b) => b.to_vec(),
        }
    }

    /// Get a mutable view, converting a shared buffer to owned first (copy-on-write).
    pub fn make_mut(&mut self) -> &mut Vec<u8> {
        if let PayloadBuffer::Shared(b) = self {
            *self = PayloadBuffer::Owned(b.to_vec());
        }
        match self {
            PayloadBuffer::Owned(v) => v,
            PayloadBuffer::Shared(_) => unreachable!("converted above"),
        }
    }
}

impl From<Vec<u8>> for PayloadBuffer {
    fn from(v: Vec<u8>) -> Self {
        PayloadBuffer::Owned(v)
    }
}

impl From<Bytes> for PayloadBuffer {
    fn from(b: Bytes) -> Self {
        PayloadBuffer::Shared(b)
    }
}

impl PartialEq for PayloadBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for PayloadBuffer {}

impl fmt::Display for PayloadBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_slice() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_and_shared_equal_when_same_bytes() {
        let owned = PayloadBuffer::Owned(vec![1, 2, 3]);
        let shared = PayloadBuffer::Shared(Bytes::from(vec![1, 2, 3]));
        assert_eq!(owned, shared);
    }

    #[test]
    fn test_make_mut_copies_shared() {
        let mut buf = PayloadBuffer::Shared(Bytes::from(vec![1, 2, 3]));
        buf.make_mut()[0] = 9;
        assert_eq!(buf.as_slice(), &[9, 2, 3]);
        assert!(matches!(buf, PayloadBuffer::Owned(_)));
    }

    #[test]
    fn test_empty() {
        let buf = PayloadBuffer::Owned(Vec::new());
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn test_into_owned_from_shared_copies() {
        let shared = PayloadBuffer::Shared(Bytes::from_static(b"hi"));
        assert_eq!(shared.into_owned(), b"hi".to_vec());
    }
}
