//! Configuration for the frame codec's two open policy knobs: the payload size ceiling
//! and the chunk size used for large reads/writes.

/// Resource limits for frame decoding.
///
/// These bound how much memory a single frame read can allocate; they do not affect
/// the wire format itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum accepted `exact_payload_length`, checked before any payload bytes are
    /// read. Declaring a length above this yields [`crate::Error::MessageTooBig`].
    ///
    /// Default: 64 MiB (64 * 1024 * 1024)
    pub payload_max: u64,

    /// Slice size used by the chunked read/write path for payloads whose
    /// `payload_length_7` field is 127 (the widest length encoding).
    ///
    /// Default: 1024 bytes
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            payload_max: 64 * 1024 * 1024,
            chunk_size: 1024,
        }
    }
}

impl Config {
    /// Create a configuration with custom values.
    #[must_use]
    pub const fn new(payload_max: u64, chunk_size: usize) -> Self {
        Self { payload_max, chunk_size }
    }

    /// Limits suitable for small embedded systems: a 64 KiB payload ceiling and a
    /// 256-byte chunk size.
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            payload_max: 64 * 1024,
            chunk_size: 256,
        }
    }

    /// No practical payload ceiling (the RFC's own limit, 2^63 - 1). Use only in
    /// trusted environments; an adversarial peer can declare an arbitrarily large
    /// frame and force a correspondingly large read.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self {
            payload_max: u64::MAX >> 1,
            chunk_size: 1024 * 1024,
        }
    }

    /// Validate a declared payload length against `payload_max`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MessageTooBig`] if `size` exceeds `payload_max`.
    pub const fn check_payload_size(&self, size: u64) -> crate::error::Result<()> {
        if size > self.payload_max {
            Err(crate::Error::MessageTooBig { size, max: self.payload_max })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.payload_max, 64 * 1024 * 1024);
        assert_eq!(config.chunk_size, 1024);
    }

    #[test]
    fn test_config_embedded() {
        let config = Config::embedded();
        assert_eq!(config.payload_max, 64 * 1024);
        assert_eq!(config.chunk_size, 256);
    }

    #[test]
    fn test_config_unrestricted_allows_huge_frames() {
        let config = Config::unrestricted();
        assert!(config.check_payload_size(u64::MAX >> 1).is_ok());
    }

    #[test]
    fn test_check_payload_size() {
        let config = Config::default();
        assert!(config.check_payload_size(1024).is_ok());
        assert!(matches!(
            config.check_payload_size(100 * 1024 * 1024),
            Err(crate::Error::MessageTooBig { .. })
        ));
    }
}
