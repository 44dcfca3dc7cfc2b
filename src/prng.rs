//! Seeded pseudo-random source used by random icon assignment.

/// Replacement state for a zero seed, which is a fixed point of xorshift.
const ZERO_SEED_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A small xorshift64 generator.
///
/// Not suitable for anything security related. Two generators built from
/// the same seed always produce the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { ZERO_SEED_STATE } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Returns a uniformly distributed value in `0..bound`.
    ///
    /// Uses a widening multiply with rejection of the biased low range.
    /// `bound` must be non-zero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        let bound = bound as u64;
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let m = u128::from(self.next_u64()) * u128::from(bound);
            if (m as u64) >= threshold {
                return (m >> 64) as usize;
            }
        }
    }
}
