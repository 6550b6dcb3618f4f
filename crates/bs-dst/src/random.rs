//! Seeded random source for simulation runs.
//!
//! Xoshiro256** gives identical sequences for identical seeds on every
//! platform, which is what makes a `DST_SEED` replayable.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Calls beyond this almost certainly mean a runaway loop in a test.
const RNG_CALLS_WARNING_THRESHOLD: u64 = 1_000_000_000;

/// Deterministic random number generator.
///
/// ```rust
/// use bs_dst::SimRng;
///
/// let mut a = SimRng::new(12345);
/// let mut b = SimRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
pub struct SimRng {
    seed: u64,
    rng: Xoshiro256StarStar,
    calls_count: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        debug_assert!(seed != 0, "Seed should not be zero");

        Self {
            seed,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            calls_count: 0,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn since creation or the last reset.
    #[must_use]
    pub fn calls_count(&self) -> u64 {
        self.calls_count
    }

    fn tick(&mut self) {
        self.calls_count += 1;
        debug_assert!(
            self.calls_count < RNG_CALLS_WARNING_THRESHOLD,
            "Very high number of RNG calls - possible infinite loop"
        );
    }

    pub fn next_u64(&mut self) -> u64 {
        self.tick();
        self.rng.gen()
    }

    /// Uniform value in `range`.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.tick();
        self.rng.gen_range(range)
    }

    /// `true` with the given probability.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0.0, 1.0]"
        );
        self.tick();
        self.rng.gen_bool(probability)
    }

    /// Draw an index according to `weights`.
    ///
    /// Returns `None` when all weights are zero or the slice is empty.
    pub fn choose_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let dist = WeightedIndex::new(weights).ok()?;
        self.tick();
        Some(dist.sample(&mut self.rng))
    }

    /// Derive an independent RNG.
    ///
    /// Each simulation iteration gets its own fork so iterations can be
    /// replayed in isolation from their own seed.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        let seed = self.next_u64().max(1);
        Self::new(seed)
    }

    /// Restart the sequence from the original seed.
    pub fn reset(&mut self) {
        self.rng = Xoshiro256StarStar::seed_from_u64(self.seed);
        self.calls_count = 0;
    }
}
