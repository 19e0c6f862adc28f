// Tiny RNG (no external crate) for brush bristle jitter and random palette picks.

/// Deterministic xorshift32. Seed it from the clock in the app, from a constant in tests.
#[derive(Clone, Debug)]
pub struct Rng32 {
    state: u32,
}

impl Rng32 {
    pub fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }

    /// Seed from the wall clock so every run jitters differently.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(0xC0FFEE);
        Self::from_seed(nanos)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform [0,1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / ((1u32 << 24) as f32)
    }

    /// Uniform [min,max)
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}
