//! Shared utilities

/// Simple deterministic RNG using xorshift64
/// Every random draw in the engine goes through one of these so a seed
/// reproduces a whole session (star placement, spawn times, tile layout).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random f32 in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() & 0xFFFFFF) as f32 / 0x1000000 as f32
    }

    /// Get a random f32 between `a` and `b`
    ///
    /// `a` may be larger than `b`; the value is then drawn from (b, a].
    #[inline]
    pub fn range_f32(&mut self, a: f32, b: f32) -> f32 {
        a + self.next_f32() * (b - a)
    }

    /// True with probability `p`
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}
