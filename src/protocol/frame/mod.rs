//! The [`Frame`] entity: RFC 6455's wire-level frame, its invariants, constructors,
//! and the staged reader/writer that move it to and from a byte source.

mod debug;
mod header;
pub mod reader;
pub mod writer;

use crate::bits::{FinBit, MaskBit, ReservedBit};
use crate::error::{Error, Result};
use crate::payload::PayloadBuffer;
use crate::protocol::opcode::OpCode;
use crate::rng::{CryptoRng, MaskRng};
use header::DecodedHeader;

pub use reader::{AsyncByteSource, ByteSource, SourceReadError};
pub use writer::ByteSink;

/// How the payload length is carried on the wire: inline in the 7-bit field, or in a
/// following 16-bit or 64-bit big-endian extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedLength {
    /// `payload_length_7 < 126`; no extra bytes follow.
    Inline,
    /// `payload_length_7 == 126`; two big-endian length bytes follow.
    Len16([u8; 2]),
    /// `payload_length_7 == 127`; eight big-endian length bytes follow.
    Len64([u8; 8]),
}

impl ExtendedLength {
    pub(crate) fn width_for(payload_length_7: u8) -> usize {
        match payload_length_7 {
            0..=125 => 0,
            126 => 2,
            127 => 8,
            _ => unreachable!("payload_length_7 is masked to 7 bits"),
        }
    }

    pub(crate) fn from_bytes(payload_length_7: u8, bytes: &[u8]) -> Self {
        match payload_length_7 {
            126 => ExtendedLength::Len16([bytes[0], bytes[1]]),
            127 => {
                let mut b = [0u8; 8];
                b.copy_from_slice(&bytes[..8]);
                ExtendedLength::Len64(b)
            }
            _ => ExtendedLength::Inline,
        }
    }

    /// Choose the three-way split (inline / 16-bit / 64-bit) for a given length.
    #[must_use]
    pub fn for_length(len: u64) -> (u8, Self) {
        if len < 126 {
            (len as u8, ExtendedLength::Inline)
        } else if len <= u64::from(u16::MAX) {
            (126, ExtendedLength::Len16((len as u16).to_be_bytes()))
        } else {
            (127, ExtendedLength::Len64(len.to_be_bytes()))
        }
    }

    /// Resolve the exact payload length given the 7-bit field this extension goes with.
    #[must_use]
    pub fn exact_length(&self, payload_length_7: u8) -> u64 {
        match self {
            ExtendedLength::Inline => u64::from(payload_length_7),
            ExtendedLength::Len16(b) => u64::from(u16::from_be_bytes(*b)),
            ExtendedLength::Len64(b) => u64::from_be_bytes(*b),
        }
    }

    /// The extension bytes as they appear on the wire (0, 2, or 8 bytes).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ExtendedLength::Inline => &[],
            ExtendedLength::Len16(b) => b,
            ExtendedLength::Len64(b) => b,
        }
    }
}

/// A single RFC 6455 WebSocket frame.
///
/// Produced either by a constructor (for outbound frames) or by the reader (for
/// frames read off a byte source). A frame read off the wire keeps its payload exactly
/// as received — masked if the header said so — until [`Frame::unmask`] is called
/// explicitly; the reader never mutates the payload on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    fin: FinBit,
    rsv1: ReservedBit,
    rsv2: ReservedBit,
    rsv3: ReservedBit,
    opcode: OpCode,
    masked: MaskBit,
    payload_length_7: u8,
    extended_length: ExtendedLength,
    masking_key: Option<[u8; 4]>,
    payload: PayloadBuffer,
}

impl Frame {
    /// Build an outbound data or control frame, masking the payload with a
    /// cryptographically strong key when `mask` is true.
    ///
    /// # Errors
    ///
    /// Returns an error if the combination of parameters would violate an invariant
    /// (a control frame over 125 bytes, `compress` on a control opcode, etc).
    pub fn new(opcode: OpCode, payload: Vec<u8>, compress: bool, mask: bool) -> Result<Self> {
        Self::new_with_rng(opcode, payload, compress, mask, &mut CryptoRng)
    }

    /// Like [`Frame::new`], but with fragmentation control and an injectable RNG.
    ///
    /// # Errors
    ///
    /// See [`Frame::new`].
    pub fn new_fragment(
        fin: FinBit,
        opcode: OpCode,
        payload: Vec<u8>,
        compress: bool,
        mask: bool,
        rng: &mut impl MaskRng,
    ) -> Result<Self> {
        Self::build(fin, opcode, payload, compress, mask, rng)
    }

    /// Like [`Frame::new`], but with an injectable RNG (for deterministic tests).
    ///
    /// # Errors
    ///
    /// See [`Frame::new`].
    pub fn new_with_rng(
        opcode: OpCode,
        payload: Vec<u8>,
        compress: bool,
        mask: bool,
        rng: &mut impl MaskRng,
    ) -> Result<Self> {
        Self::build(FinBit::Final, opcode, payload, compress, mask, rng)
    }

    fn build(
        fin: FinBit,
        opcode: OpCode,
        mut payload: Vec<u8>,
        compress: bool,
        mask: bool,
        rng: &mut impl MaskRng,
    ) -> Result<Self> {
        if opcode.is_control() {
            if !fin.is_final() {
                return Err(Error::FragmentedControlFrame);
            }
            if payload.len() > 125 {
                return Err(Error::ControlFrameTooLarge(payload.len()));
            }
        }
        let rsv1 = ReservedBit::from_bit(compress && opcode.is_message_data());
        if compress && !opcode.is_message_data() {
            return Err(Error::ReservedBitOnNonData);
        }

        let (payload_length_7, extended_length) = ExtendedLength::for_length(payload.len() as u64);

        let masking_key = if mask {
            let mut key = [0u8; 4];
            rng.fill(&mut key);
            crate::protocol::mask::apply_mask_simd(&mut payload, key);
            Some(key)
        } else {
            None
        };

        Ok(Self {
            fin,
            rsv1,
            rsv2: ReservedBit::Off,
            rsv3: ReservedBit::Off,
            opcode,
            masked: MaskBit::from_bit(mask),
            payload_length_7,
            extended_length,
            masking_key,
            payload: PayloadBuffer::Owned(payload),
        })
    }

    /// Convenience constructor for an unmasked, final, uncompressed text frame.
    ///
    /// # Errors
    ///
    /// See [`Frame::new`].
    pub fn text(payload: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(OpCode::Text, payload.into(), false, false)
    }

    /// Convenience constructor for an unmasked, final, uncompressed binary frame.
    ///
    /// # Errors
    ///
    /// See [`Frame::new`].
    pub fn binary(payload: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(OpCode::Binary, payload.into(), false, false)
    }

    /// Convenience constructor for a ping frame.
    ///
    /// # Errors
    ///
    /// See [`Frame::new`].
    pub fn ping(payload: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(OpCode::Ping, payload.into(), false, false)
    }

    /// Convenience constructor for a pong frame.
    ///
    /// # Errors
    ///
    /// See [`Frame::new`].
    pub fn pong(payload: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(OpCode::Pong, payload.into(), false, false)
    }

    /// Convenience constructor for a close frame, whose payload is a 2-byte
    /// big-endian close code followed by an optional UTF-8 reason.
    ///
    /// # Errors
    ///
    /// See [`Frame::new`].
    pub fn close(code: u16, reason: &str) -> Result<Self> {
        let mut payload = Vec::with_capacity(2 + reason.len());
        payload.extend_from_slice(&code.to_be_bytes());
        payload.extend_from_slice(reason.as_bytes());
        Self::new(OpCode::Close, payload, false, false)
    }

    pub(crate) fn from_parts(
        header: DecodedHeader,
        extended_length: ExtendedLength,
        masking_key: Option<[u8; 4]>,
        payload: PayloadBuffer,
    ) -> Self {
        Self {
            fin: header.fin,
            rsv1: header.rsv1,
            rsv2: header.rsv2,
            rsv3: header.rsv3,
            opcode: header.opcode,
            masked: header.masked,
            payload_length_7: header.payload_length_7,
            extended_length,
            masking_key,
            payload,
        }
    }

    /// Whether this is the final fragment of a message.
    #[must_use]
    pub const fn fin(&self) -> FinBit {
        self.fin
    }

    /// RSV1 (doubles as the permessage-deflate "compressed" marker on data frames).
    #[must_use]
    pub const fn rsv1(&self) -> ReservedBit {
        self.rsv1
    }

    /// RSV2.
    #[must_use]
    pub const fn rsv2(&self) -> ReservedBit {
        self.rsv2
    }

    /// RSV3.
    #[must_use]
    pub const fn rsv3(&self) -> ReservedBit {
        self.rsv3
    }

    /// This frame's opcode.
    #[must_use]
    pub const fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// Whether a masking key is present and the payload is (still) masked.
    #[must_use]
    pub const fn masked(&self) -> MaskBit {
        self.masked
    }

    /// The raw 7-bit length field as it appears on the wire.
    #[must_use]
    pub const fn payload_length_7(&self) -> u8 {
        self.payload_length_7
    }

    /// The masking key, if present.
    #[must_use]
    pub const fn masking_key(&self) -> Option<[u8; 4]> {
        self.masking_key
    }

    /// Borrow the payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.payload.as_slice()
    }

    /// Take ownership of the payload, consuming the frame.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload.into_owned()
    }

    /// The exact payload length, combining the 7-bit field and any extended-length
    /// bytes.
    #[must_use]
    pub fn exact_payload_length(&self) -> u64 {
        self.extended_length.exact_length(self.payload_length_7)
    }

    /// Total on-wire size of this frame: header + extended length + masking key +
    /// payload.
    #[must_use]
    pub fn frame_length(&self) -> u64 {
        2 + self.extended_length.as_bytes().len() as u64
            + self.masking_key.map_or(0, |_| 4)
            + self.payload.len() as u64
    }

    /// XOR-unmask the payload in place, idempotently.
    ///
    /// A frame that is already unmasked (`masked() == MaskBit::Unmasked`) is left
    /// untouched. Calling this twice on a masked frame is **not** the same as calling
    /// it once — the first call clears `masked`, so the second is a no-op, which is
    /// exactly the idempotence this method promises.
    pub fn unmask(&mut self) {
        if let Some(key) = self.masking_key.take() {
            crate::protocol::mask::apply_mask_simd(self.payload.make_mut(), key);
            self.masked = MaskBit::Unmasked;
        }
    }

    /// Serialize this frame to a freshly allocated buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        writer::to_bytes(self)
    }

    /// Write this frame to a [`ByteSink`], chunking the payload write when
    /// `payload_length_7 == 127` (mirrors the reader's chunked-read threshold).
    ///
    /// # Errors
    ///
    /// Propagates any error the sink reports.
    pub fn write_to<S: ByteSink>(&self, sink: &mut S, chunk_size: usize) -> Result<()> {
        writer::write_to(self, sink, chunk_size)
    }

    /// Read a single frame synchronously from `source`, enforcing `config`'s payload
    /// ceiling.
    ///
    /// # Errors
    ///
    /// See the error taxonomy in [`crate::error::Error`].
    pub fn read_sync<S: ByteSource>(source: &mut S, config: &crate::Config) -> Result<Self> {
        reader::read_sync(source, config)
    }

    /// Render a labeled, human-readable summary of this frame's fields.
    #[must_use]
    pub fn summary(&self) -> String {
        debug::summary(self)
    }

    /// Render a hex/binary bit dump of this frame's payload bytes.
    #[must_use]
    pub fn bit_dump(&self) -> String {
        debug::bit_dump(self.payload.as_slice())
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}
