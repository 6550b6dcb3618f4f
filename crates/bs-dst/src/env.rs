//! Simulation environment.
//!
//! `SimEnv` is the single context a DST test works against. Everything it
//! hands out is derived from one seed.

use std::fmt;
use std::ops::RangeInclusive;

use bs_core::StackOp;

use crate::error::DstError;
use crate::random::SimRng;
use crate::workload::WorkloadConfig;

/// Complete DST environment.
///
/// ```rust
/// use bs_dst::SimEnv;
///
/// let mut a = SimEnv::new(42);
/// let mut b = SimEnv::new(42);
/// assert_eq!(a.gen_capacity(1..=16), b.gen_capacity(1..=16));
/// ```
pub struct SimEnv {
    seed: u64,
    rng: SimRng,
    workloads_count: u64,
    operations_count: u64,
}

impl SimEnv {
    /// Create a new environment with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        debug_assert!(seed != 0, "Seed should not be zero");

        // Derive the working RNG so that the seed itself is never the
        // first value drawn.
        let mut master = SimRng::new(seed);
        let rng = master.fork();

        Self {
            seed,
            rng,
            workloads_count: 0,
            operations_count: 0,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    /// Pick a capacity for the next stack under test.
    pub fn gen_capacity(&mut self, range: RangeInclusive<usize>) -> usize {
        debug_assert!(*range.start() > 0, "Capacities must be positive");
        debug_assert!(!range.is_empty(), "Capacity range must not be empty");
        self.rng.gen_range(range)
    }

    /// Generate a workload and account for it in the stats.
    pub fn generate_workload(&mut self, config: &WorkloadConfig) -> Result<Vec<StackOp>, DstError> {
        let ops = config.generate(&mut self.rng)?;
        self.workloads_count += 1;
        self.operations_count += ops.len() as u64;
        Ok(ops)
    }

    /// Derive a child environment for one iteration of a campaign.
    ///
    /// `SimEnv::new(child.seed())` reproduces the child exactly. Forking
    /// from that seed instead would give a grandchild.
    #[must_use]
    pub fn fork(&mut self) -> SimEnv {
        let seed = self.rng.next_u64().max(1);
        SimEnv::new(seed)
    }

    /// Format seed for error messages.
    #[must_use]
    pub fn format_seed(&self) -> String {
        format!("DST_SEED={}", self.seed)
    }

    /// Format seed as the command-line variable that replays this
    /// environment as a single iteration.
    #[must_use]
    pub fn format_replay_seed(&self) -> String {
        format!("{}={}", crate::REPLAY_ENV_VAR, self.seed)
    }

    #[must_use]
    pub fn stats(&self) -> SimStats {
        SimStats {
            seed: self.seed,
            rng_calls: self.rng.calls_count(),
            workloads_count: self.workloads_count,
            operations_count: self.operations_count,
        }
    }
}

/// Statistics about a simulation environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimStats {
    pub seed: u64,
    pub rng_calls: u64,
    pub workloads_count: u64,
    pub operations_count: u64,
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DST_SEED={} rng_calls={} workloads={} operations={}",
            self.seed, self.rng_calls, self.workloads_count, self.operations_count
        )
    }
}
