//! Mandatory 2-byte header decode, with the control-frame/opcode/RSV1 rules of RFC
//! 6455 §5.2 enforced inline rather than deferred to a later validation pass.

use crate::bits::{FinBit, MaskBit, ReservedBit};
use crate::error::{Error, Result};
use crate::protocol::opcode::OpCode;

/// The fields decoded from the two mandatory header bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodedHeader {
    pub fin: FinBit,
    pub rsv1: ReservedBit,
    pub rsv2: ReservedBit,
    pub rsv3: ReservedBit,
    pub opcode: OpCode,
    pub masked: MaskBit,
    pub payload_length_7: u8,
}

/// Decode and validate the two mandatory header bytes.
///
/// Performs every check that can be made without knowing the extended length: opcode
/// support, RSV1-on-non-data, control-frame fragmentation, and control-frame payload
/// length (the 7-bit field alone is enough to reject an over-long control frame, since
/// any value above 125 is already out of bounds for one).
pub(crate) fn decode_header(bytes: [u8; 2]) -> Result<DecodedHeader> {
    let byte0 = bytes[0];
    let byte1 = bytes[1];

    let fin = FinBit::from_bit(byte0 & 0x80 != 0);
    let rsv1 = ReservedBit::from_bit(byte0 & 0x40 != 0);
    let rsv2 = ReservedBit::from_bit(byte0 & 0x20 != 0);
    let rsv3 = ReservedBit::from_bit(byte0 & 0x10 != 0);
    let opcode = OpCode::from_u8(byte0 & 0x0F)?;

    if rsv1.is_set() && !opcode.is_message_data() {
        return Err(Error::ReservedBitOnNonData);
    }

    let masked = MaskBit::from_bit(byte1 & 0x80 != 0);
    let payload_length_7 = byte1 & 0x7F;

    if opcode.is_control() {
        if !fin.is_final() {
            return Err(Error::FragmentedControlFrame);
        }
        if payload_length_7 > 125 {
            return Err(Error::ControlFrameTooLarge(payload_length_7 as usize));
        }
    }

    Ok(DecodedHeader { fin, rsv1, rsv2, rsv3, opcode, masked, payload_length_7 })
}

/// Pack a [`DecodedHeader`]'s fields back into the two header bytes.
pub(crate) fn encode_header(h: &DecodedHeader) -> [u8; 2] {
    let mut byte0 = 0u8;
    if h.fin.as_bit() {
        byte0 |= 0x80;
    }
    if h.rsv1.as_bit() {
        byte0 |= 0x40;
    }
    if h.rsv2.as_bit() {
        byte0 |= 0x20;
    }
    if h.rsv3.as_bit() {
        byte0 |= 0x10;
    }
    byte0 |= h.opcode.as_u8();

    let mut byte1 = 0u8;
    if h.masked.as_bit() {
        byte1 |= 0x80;
    }
    byte1 |= h.payload_length_7 & 0x7F;

    [byte0, byte1]
}
