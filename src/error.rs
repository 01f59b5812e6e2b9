//! Error types for the frame codec.
//!
//! This module defines every failure condition that can occur while decoding or
//! encoding a frame, following RFC 6455 requirements.

use thiserror::Error;

/// Result type alias for frame codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding or encoding a frame.
///
/// Each variant belongs to one of five kinds described by [`Error::close_code`] and
/// [`Error::is_incomplete`]: an incomplete read, a protocol violation (close code 1002), an
/// oversized payload (close code 1009), or a propagated source error. Callers that only
/// care about the kind, rather than the exact variant, should match on those accessors
/// instead of the full variant list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Fewer than 2 bytes were available for the mandatory header.
    #[error("incomplete frame header")]
    IncompleteHeader,

    /// A later stage (extended length, masking key, or payload) received fewer bytes
    /// than it needed before the source was exhausted.
    #[error("incomplete frame: need {needed} more byte(s)")]
    IncompleteFrame {
        /// Number of bytes the stage was requesting from the source when it ended.
        /// The byte source reports reads as all-or-nothing, so this is the stage's
        /// full request size, not how many bytes were actually short.
        needed: usize,
    },

    /// Opcode nibble is not one of the six supported values.
    #[error("unsupported opcode: {0:#x}")]
    UnsupportedOpcode(u8),

    /// RSV1 set on a frame whose opcode is not a data opcode.
    #[error("RSV1 set on non-data opcode")]
    ReservedBitOnNonData,

    /// Control frame (Close/Ping/Pong) marked as a non-final fragment.
    #[error("control frames cannot be fragmented")]
    FragmentedControlFrame,

    /// Control frame payload exceeds 125 bytes.
    #[error("control frame payload too large: {0} bytes (max 125)")]
    ControlFrameTooLarge(usize),

    /// Declared payload length exceeds the configured maximum.
    #[error("message too big: {size} bytes (max {max})")]
    MessageTooBig {
        /// Declared payload length.
        size: u64,
        /// Configured maximum.
        max: u64,
    },

    /// The byte source reported a failure unrelated to framing (I/O error, broken pipe,
    /// reset connection, etc).
    #[error("byte source error: {0}")]
    SourceError(String),
}

impl Error {
    /// Maps this error to the WebSocket close code a caller should send, if any.
    ///
    /// Returns `Some(1002)` for any well-formedness violation, `Some(1009)` for an
    /// oversized payload, and `None` for incomplete reads and source errors (neither of
    /// which has a meaningful close code: the connection either never produced a full
    /// frame, or is already broken).
    #[must_use]
    pub const fn close_code(&self) -> Option<u16> {
        match self {
            Error::UnsupportedOpcode(_)
            | Error::ReservedBitOnNonData
            | Error::FragmentedControlFrame
            | Error::ControlFrameTooLarge(_) => Some(1002),
            Error::MessageTooBig { .. } => Some(1009),
            Error::IncompleteHeader | Error::IncompleteFrame { .. } | Error::SourceError(_) => {
                None
            }
        }
    }

    /// True for the two "ran out of bytes" kinds (`IncompleteHeader`, `IncompleteFrame`).
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Error::IncompleteHeader | Error::IncompleteFrame { .. })
    }

    /// True for the four well-formedness-violation variants that share close code 1002.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedOpcode(_)
                | Error::ReservedBitOnNonData
                | Error::FragmentedControlFrame
                | Error::ControlFrameTooLarge(_)
        )
    }
}
