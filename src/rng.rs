//! Injectable masking-key randomness.
//!
//! RFC 6455 doesn't strictly require cryptographic strength for the masking key, but a
//! predictable mask is still an unnecessary weakness, so this crate treats the RNG as
//! an injectable capability with a cryptographically strong default.

/// A source of 4-byte masking keys.
pub trait MaskRng {
    /// Fill `dst` with a fresh masking key.
    fn fill(&mut self, dst: &mut [u8; 4]);
}

/// The default RNG: draws from the operating system's cryptographic source on every
/// call. Zero-sized and stateless, since `getrandom` needs no internal state.
#[derive(Debug, Default, Clone, Copy)]
pub struct CryptoRng;

impl MaskRng for CryptoRng {
    fn fill(&mut self, dst: &mut [u8; 4]) {
        getrandom::getrandom(dst).expect("operating system RNG unavailable");
    }
}

/// A deterministic RNG for tests: cycles through a fixed sequence of keys, repeating
/// the last one once exhausted.
#[derive(Debug, Clone)]
pub struct FixedRng {
    keys: Vec<[u8; 4]>,
    next: usize,
}

impl FixedRng {
    /// Build a deterministic RNG that yields `keys` in order, then repeats the last.
    ///
    /// # Panics
    ///
    /// Panics if `keys` is empty.
    #[must_use]
    pub fn new(keys: Vec<[u8; 4]>) -> Self {
        assert!(!keys.is_empty(), "FixedRng needs at least one key");
        Self { keys, next: 0 }
    }

    /// Build a deterministic RNG that always yields the same key.
    #[must_use]
    pub fn constant(key: [u8; 4]) -> Self {
        Self::new(vec![key])
    }
}

impl MaskRng for FixedRng {
    fn fill(&mut self, dst: &mut [u8; 4]) {
        let idx = self.next.min(self.keys.len() - 1);
        *dst = self.keys[idx];
        if self.next < self.keys.len() {
            self.next += 1;
        }
    }
}
