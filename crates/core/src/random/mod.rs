use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness used for timer jitter, gaze targets and
/// emotion sampling. Any [`rand::Rng`] qualifies, so tests can plug in a
/// seeded generator.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[min, max)`. Returns `min` for an empty range.
    fn next_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.next_unit() * (max - min)
    }
}

impl<R: Rng> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Deterministic generator for reproducible runs.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator seeded from the operating system.
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}
