//! Frame serialization: lays a [`Frame`] out to a byte buffer or a [`ByteSink`],
//! mirroring the reader's chunked-write threshold for large payloads.

use super::header::{encode_header, DecodedHeader};
use super::Frame;
use crate::error::Result;

/// A sink that accepts serialized frame bytes.
pub trait ByteSink {
    /// Write all of `bytes` to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SourceError`] on failure.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Write `bytes` in slices of at most `chunk_size`. The default implementation
    /// loops calling [`ByteSink::write_all`].
    ///
    /// # Errors
    ///
    /// See [`ByteSink::write_all`].
    fn write_chunked(&mut self, bytes: &[u8], chunk_size: usize) -> Result<()> {
        for chunk in bytes.chunks(chunk_size.max(1)) {
            self.write_all(chunk)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> ByteSink for W {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        std::io::Write::write_all(self, bytes)
            .map_err(|e| crate::Error::SourceError(e.to_string()))
    }
}

fn header_fields(frame: &Frame) -> DecodedHeader {
    DecodedHeader {
        fin: frame.fin(),
        rsv1: frame.rsv1(),
        rsv2: frame.rsv2(),
        rsv3: frame.rsv3(),
        opcode: frame.opcode(),
        masked: frame.masked(),
        payload_length_7: frame.payload_length_7(),
    }
}

/// Serialize `frame` to a freshly allocated buffer.
pub(crate) fn to_bytes(frame: &Frame) -> Vec<u8> {
    let mut buf = Vec::with_capacity(frame.frame_length() as usize);
    buf.extend_from_slice(&encode_header(&header_fields(frame)));
    buf.extend_from_slice(frame.extended_length.as_bytes());
    if let Some(key) = frame.masking_key() {
        buf.extend_from_slice(&key);
    }
    buf.extend_from_slice(frame.payload());
    buf
}

/// Write `frame` to `sink`, chunking the payload write when `payload_length_7 == 127`.
pub(crate) fn write_to<S: ByteSink>(frame: &Frame, sink: &mut S, chunk_size: usize) -> Result<()> {
    sink.write_all(&encode_header(&header_fields(frame)))?;
    sink.write_all(frame.extended_length.as_bytes())?;
    if let Some(key) = frame.masking_key() {
        sink.write_all(&key)?;
    }
    if frame.payload_length_7() < 127 {
        sink.write_all(frame.payload())?;
    } else {
        sink.write_chunked(frame.payload(), chunk_size)?;
    }
    Ok(())
}
