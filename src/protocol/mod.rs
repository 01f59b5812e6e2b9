//! WebSocket frame codec core (RFC 6455 §5).

pub mod frame;
pub mod mask;
pub mod opcode;

pub use frame::{AsyncByteSource, ByteSink, ByteSource, ExtendedLength, Frame, SourceReadError};
pub use mask::{apply_mask, apply_mask_fast, apply_mask_simd};
pub use opcode::OpCode;
