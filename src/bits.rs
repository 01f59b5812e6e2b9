//! Named two-valued flag types for the header bits, in place of raw `bool`s.

use std::fmt;

/// The FIN bit: whether this frame is the final fragment of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinBit {
    /// More fragments follow.
    More,
    /// This is the last (or only) fragment.
    Final,
}

impl FinBit {
    /// Decode from the header bit.
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { FinBit::Final } else { FinBit::More }
    }

    /// Encode to the header bit.
    #[must_use]
    pub const fn as_bit(self) -> bool {
        matches!(self, FinBit::Final)
    }

    /// True when this is the final fragment.
    #[must_use]
    pub const fn is_final(self) -> bool {
        self.as_bit()
    }
}

impl fmt::Display for FinBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FinBit::More => "more",
            FinBit::Final => "final",
        })
    }
}

/// One of the three reserved bits (RSV1/RSV2/RSV3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedBit {
    /// Bit is clear.
    Off,
    /// Bit is set (RSV1 doubles as the permessage-deflate "compressed" marker).
    On,
}

impl ReservedBit {
    /// Decode from the header bit.
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { ReservedBit::On } else { ReservedBit::Off }
    }

    /// Encode to the header bit.
    #[must_use]
    pub const fn as_bit(self) -> bool {
        matches!(self, ReservedBit::On)
    }

    /// True when the bit is set.
    #[must_use]
    pub const fn is_set(self) -> bool {
        self.as_bit()
    }
}

impl fmt::Display for ReservedBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_set() { "1" } else { "0" })
    }
}

/// The MASK bit: whether a masking key and masked payload follow the length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskBit {
    /// No masking key; payload is sent as-is.
    Unmasked,
    /// A 4-byte masking key follows, and the payload is XOR-masked.
    Masked,
}

impl MaskBit {
    /// Decode from the header bit.
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { MaskBit::Masked } else { MaskBit::Unmasked }
    }

    /// Encode to the header bit.
    #[must_use]
    pub const fn as_bit(self) -> bool {
        matches!(self, MaskBit::Masked)
    }

    /// True when a masking key is present.
    #[must_use]
    pub const fn is_masked(self) -> bool {
        self.as_bit()
    }
}

impl fmt::Display for MaskBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_masked() { "1" } else { "0" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fin_bit_roundtrip() {
        assert_eq!(FinBit::from_bit(true), FinBit::Final);
        assert_eq!(FinBit::from_bit(false), FinBit::More);
        assert!(FinBit::Final.as_bit());
        assert!(!FinBit::More.as_bit());
    }

    #[test]
    fn test_reserved_bit_roundtrip() {
        assert_eq!(ReservedBit::from_bit(true), ReservedBit::On);
        assert!(ReservedBit::On.is_set());
        assert!(!ReservedBit::Off.is_set());
    }

    #[test]
    fn test_mask_bit_roundtrip() {
        assert_eq!(MaskBit::from_bit(true), MaskBit::Masked);
        assert!(MaskBit::Masked.is_masked());
        assert!(!MaskBit::Unmasked.is_masked());
    }

    #[test]
    fn test_display() {
        assert_eq!(FinBit::Final.to_string(), "final");
        assert_eq!(ReservedBit::On.to_string(), "1");
        assert_eq!(MaskBit::Unmasked.to_string(), "0");
    }
}
