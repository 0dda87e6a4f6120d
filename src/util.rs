//! Internal utilities.
//!
//! Currently just [`DetRng`], the deterministic PRNG behind backoff jitter.

/// A deterministic pseudo-random number generator using xorshift64.
///
/// Intentionally simple and fast, with no external dependencies. It is NOT
/// cryptographically secure; jitter only needs uniformity, and a seedable
/// generator keeps the backoff schedule reproducible in tests.
#[derive(Debug, Clone)]
pub struct DetRng {
    state: u64,
}

impl DetRng {
    /// Creates a new PRNG with the given seed.
    ///
    /// The seed must be non-zero. If zero is provided, it will be replaced
    /// with 1.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Creates a PRNG seeded from the system clock.
    #[must_use]
    pub fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(1, |d| d.subsec_nanos().into());
        Self::new(nanos | 1)
    }

    /// Generates the next pseudo-random u64 value.
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64 algorithm
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generates a pseudo-random value in the inclusive range `[0, bound]`.
    pub fn next_inclusive(&mut self, bound: u64) -> u64 {
        if bound == u64::MAX {
            return self.next_u64();
        }
        self.next_u64() % (bound + 1)
    }
}
