//! # wsframe - RFC 6455 WebSocket frame codec
//!
//! `wsframe` parses an incoming byte stream into WebSocket frames and serializes
//! outgoing frames back to bytes, applying masking, enforcing header well-formedness
//! at parse time, and mapping violations to close codes.
//!
//! ## Scope
//!
//! This crate implements the frame codec only: the [`Frame`] entity, its invariants,
//! header/length/mask decoding, payload acquisition (including chunked reads for
//! large payloads), masking, serialization, and pretty-printing. It does not
//! implement TCP/TLS transport, the HTTP upgrade handshake, message reassembly from
//! continuation frames, permessage-deflate, a connection state machine, or a public
//! client/server API — those are external collaborators that consume this codec via
//! the [`ByteSource`]/[`AsyncByteSource`]/[`ByteSink`] traits.
//!
//! ## Quick start
//!
//! ```
//! use wsframe::Frame;
//!
//! let frame = Frame::text("Hello").unwrap();
//! let wire = frame.to_bytes();
//! assert_eq!(wire, vec![0x81, 0x05, b'H', b'e', b'l', b'l', b'o']);
//! ```

pub mod bits;
pub mod config;
pub mod error;
pub mod payload;
pub mod protocol;
pub mod rng;

pub use bits::{FinBit, MaskBit, ReservedBit};
pub use config::Config;
pub use error::{Error, Result};
pub use payload::PayloadBuffer;
pub use protocol::{AsyncByteSource, ByteSink, ByteSource, ExtendedLength, Frame, OpCode, SourceReadError};
pub use rng::{CryptoRng, FixedRng, MaskRng};
