//! The staged frame reader.
//!
//! Unlike a buffering codec that reads ahead into an accumulator and re-parses on
//! every new chunk, this reader issues exactly the read each stage needs — 2 bytes for
//! the header, then 0/2/8 bytes for the extended length, then 0/4 bytes for the
//! masking key, then the payload — and nothing more. At most one stage's worth of
//! bytes is ever in flight, so a caller that wants to cancel mid-frame only ever loses
//! a single bounded read.

use super::header::{decode_header, DecodedHeader};
use super::{ExtendedLength, Frame};
use crate::error::{Error, Result};
use crate::payload::PayloadBuffer;
use crate::Config;

/// Why a read fell short of the requested byte count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceReadError {
    /// The source ended (clean EOF) before delivering the requested bytes.
    Eof,
    /// The source reported a failure unrelated to running out of bytes.
    Io(String),
}

impl From<std::io::Error> for SourceReadError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            SourceReadError::Eof
        } else {
            SourceReadError::Io(err.to_string())
        }
    }
}

/// A synchronous, blocking source of bytes.
pub trait ByteSource {
    /// Read exactly `n` bytes, blocking until they are available.
    ///
    /// # Errors
    ///
    /// Returns [`SourceReadError::Eof`] if the source ends first, or
    /// [`SourceReadError::Io`] for any other failure.
    fn read_exact(&mut self, n: usize) -> std::result::Result<Vec<u8>, SourceReadError>;

    /// Read exactly `n` bytes in slices of at most `chunk_size`, for allocation-careful
    /// handling of large payloads. The default implementation loops calling
    /// [`ByteSource::read_exact`].
    ///
    /// # Errors
    ///
    /// See [`ByteSource::read_exact`].
    fn read_exact_chunked(
        &mut self,
        n: usize,
        chunk_size: usize,
    ) -> std::result::Result<Vec<u8>, SourceReadError> {
        let mut out = Vec::with_capacity(n);
        let mut remaining = n;
        while remaining > 0 {
            let take = remaining.min(chunk_size.max(1));
            out.extend_from_slice(&self.read_exact(take)?);
            remaining -= take;
        }
        Ok(out)
    }
}

impl<R: std::io::Read> ByteSource for R {
    fn read_exact(&mut self, n: usize) -> std::result::Result<Vec<u8>, SourceReadError> {
        let mut buf = vec![0u8; n];
        std::io::Read::read_exact(self, &mut buf).map_err(SourceReadError::from)?;
        Ok(buf)
    }
}

/// An asynchronous, callback-driven source of bytes.
///
/// `read_exact` consumes `self` and passes it back to `on_ok` together with the bytes,
/// so the next stage can keep reading from the same source without any shared or
/// interior mutability. A real transport (a wrapped socket, say) would queue the read
/// against its event loop and invoke the continuations once the bytes are available;
/// the codec imposes no thread affinity on when or where that happens.
pub trait AsyncByteSource: Sized {
    /// Issue an asynchronous read of exactly `n` bytes.
    fn read_exact(
        self,
        n: usize,
        on_ok: impl FnOnce(Self, Vec<u8>) + 'static,
        on_err: impl FnOnce(SourceReadError) + 'static,
    );

    /// Asynchronous counterpart to [`ByteSource::read_exact_chunked`]. The default
    /// implementation issues one `chunk_size`-sized read at a time, recursing until
    /// `n` bytes are accumulated.
    fn read_exact_chunked(
        self,
        n: usize,
        chunk_size: usize,
        on_ok: impl FnOnce(Self, Vec<u8>) + 'static,
        on_err: impl FnOnce(SourceReadError) + 'static,
    ) {
        read_chunked_rec(self, n, chunk_size, Vec::with_capacity(n), on_ok, on_err);
    }
}

fn read_chunked_rec<S: AsyncByteSource>(
    source: S,
    remaining: usize,
    chunk_size: usize,
    mut acc: Vec<u8>,
    on_ok: impl FnOnce(S, Vec<u8>) + 'static,
    on_err: impl FnOnce(SourceReadError) + 'static,
) {
    if remaining == 0 {
        on_ok(source, acc);
        return;
    }
    let take = remaining.min(chunk_size.max(1));
    source.read_exact(
        take,
        move |source, bytes| {
            acc.extend_from_slice(&bytes);
            read_chunked_rec(source, remaining - take, chunk_size, acc, on_ok, on_err);
        },
        on_err,
    );
}

fn header_err(e: SourceReadError) -> Error {
    match e {
        SourceReadError::Eof => Error::IncompleteHeader,
        SourceReadError::Io(msg) => Error::SourceError(msg),
    }
}

/// `needed` is the byte count the failed stage was asking for (extended length,
/// masking key, or payload); the source gave up fewer than that before ending.
fn stage_err(needed: usize, e: SourceReadError) -> Error {
    match e {
        SourceReadError::Eof => Error::IncompleteFrame { needed },
        SourceReadError::Io(msg) => Error::SourceError(msg),
    }
}

fn build_payload_buffer<S: ByteSource>(
    source: &mut S,
    header: &DecodedHeader,
    exact_len: u64,
    config: &Config,
) -> Result<PayloadBuffer> {
    config.check_payload_size(exact_len)?;
    if exact_len == 0 {
        return Ok(PayloadBuffer::Owned(Vec::new()));
    }
    let len = exact_len as usize;
    let bytes = if header.payload_length_7 < 127 {
        source.read_exact(len).map_err(|e| stage_err(len, e))?
    } else {
        source.read_exact_chunked(len, config.chunk_size).map_err(|e| stage_err(len, e))?
    };
    Ok(PayloadBuffer::Owned(bytes))
}

/// Read a single frame synchronously: header, extended length, masking key, payload,
/// in that order, each as its own bounded read.
///
/// # Errors
///
/// See the error taxonomy in [`crate::error::Error`].
pub fn read_sync<S: ByteSource>(source: &mut S, config: &Config) -> Result<Frame> {
    let head = source.read_exact(2).map_err(header_err)?;
    let header = decode_header([head[0], head[1]])?;

    let width = ExtendedLength::width_for(header.payload_length_7);
    let extended_length = if width == 0 {
        ExtendedLength::Inline
    } else {
        let bytes = source.read_exact(width).map_err(|e| stage_err(width, e))?;
        ExtendedLength::from_bytes(header.payload_length_7, &bytes)
    };

    let masking_key = if header.masked.is_masked() {
        let bytes = source.read_exact(4).map_err(|e| stage_err(4, e))?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    } else {
        None
    };

    let exact_len = extended_length.exact_length(header.payload_length_7);
    let payload = build_payload_buffer(source, &header, exact_len, config)?;

    Ok(Frame::from_parts(header, extended_length, masking_key, payload))
}

/// Read a single frame via the completion-callback protocol, chaining the four
/// stages. Exactly one of `on_success` or `on_error` is invoked; every failure —
/// short reads, protocol violations, oversized payloads, propagated source errors —
/// routes through `on_error`.
pub fn read_async<S: AsyncByteSource + 'static>(
    source: S,
    config: Config,
    on_success: impl FnOnce(Frame) + 'static,
    on_error: impl FnOnce(Error) + 'static,
) {
    drive_header(source, config, on_success, on_error);
}

fn drive_header<S: AsyncByteSource + 'static>(
    source: S,
    config: Config,
    on_success: impl FnOnce(Frame) + 'static,
    on_error: impl FnOnce(Error) + 'static,
) {
    source.read_exact(
        2,
        move |source, head| match decode_header([head[0], head[1]]) {
            Ok(header) => drive_ext_len(source, header, config, on_success, on_error),
            Err(e) => on_error(e),
        },
        move |e| on_error(header_err(e)),
    );
}

fn drive_ext_len<S: AsyncByteSource + 'static>(
    source: S,
    header: DecodedHeader,
    config: Config,
    on_success: impl FnOnce(Frame) + 'static,
    on_error: impl FnOnce(Error) + 'static,
) {
    let width = ExtendedLength::width_for(header.payload_length_7);
    if width == 0 {
        drive_mask(source, header, ExtendedLength::Inline, config, on_success, on_error);
        return;
    }
    source.read_exact(
        width,
        move |source, bytes| {
            let extended_length = ExtendedLength::from_bytes(header.payload_length_7, &bytes);
            drive_mask(source, header, extended_length, config, on_success, on_error);
        },
        move |e| on_error(stage_err(width, e)),
    );
}

fn drive_mask<S: AsyncByteSource + 'static>(
    source: S,
    header: DecodedHeader,
    extended_length: ExtendedLength,
    config: Config,
    on_success: impl FnOnce(Frame) + 'static,
    on_error: impl FnOnce(Error) + 'static,
) {
    if !header.masked.is_masked() {
        drive_payload(source, header, extended_length, None, config, on_success, on_error);
        return;
    }
    source.read_exact(
        4,
        move |source, bytes| {
            let key = [bytes[0], bytes[1], bytes[2], bytes[3]];
            drive_payload(source, header, extended_length, Some(key), config, on_success, on_error);
        },
        move |e| on_error(stage_err(4, e)),
    );
}

fn drive_payload<S: AsyncByteSource + 'static>(
    source: S,
    header: DecodedHeader,
    extended_length: ExtendedLength,
    masking_key: Option<[u8; 4]>,
    config: Config,
    on_success: impl FnOnce(Frame) + 'static,
    on_error: impl FnOnce(Error) + 'static,
) {
    let exact_len = extended_length.exact_length(header.payload_length_7);
    if let Err(e) = config.check_payload_size(exact_len) {
        on_error(e);
        return;
    }
    if exact_len == 0 {
        let frame = Frame::from_parts(header, extended_length, masking_key, PayloadBuffer::Owned(Vec::new()));
        on_success(frame);
        return;
    }
    let len = exact_len as usize;
    let finish = move |_source: S, bytes: Vec<u8>| {
        let frame = Frame::from_parts(header, extended_length, masking_key, PayloadBuffer::Owned(bytes));
        on_success(frame);
    };
    if header.payload_length_7 < 127 {
        source.read_exact(len, finish, move |e| on_error(stage_err(len, e)));
    } else {
        source.read_exact_chunked(len, config.chunk_size, finish, move |e| on_error(stage_err(len, e)));
    }
}
