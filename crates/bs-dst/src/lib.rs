//! # bs-dst
//!
//! Deterministic Simulation Testing for the bounded stack.
//!
//! A single seed drives capacity selection and operation generation, so any
//! failing run can be replayed exactly.
//!
//! ## Usage
//!
//! ```rust
//! use bs_dst::{SimEnv, WorkloadConfig};
//!
//! let mut env = SimEnv::new(12345);
//! let capacity = env.gen_capacity(1..=8);
//! let ops = env.generate_workload(&WorkloadConfig::default()).unwrap();
//! assert!(capacity >= 1 && capacity <= 8);
//! assert_eq!(ops.len(), WorkloadConfig::default().operations_count);
//! ```
//!
//! ## Reproducibility
//!
//! ```bash
//! DST_SEED=12345 DST_ITERATIONS=500 cargo test
//! ```
//!
//! `DST_SEED` seeds a whole campaign; each iteration runs on a child
//! environment forked from it. A failing iteration reports its child seed,
//! and `DST_REPLAY_SEED` runs exactly that iteration again:
//!
//! ```bash
//! DST_REPLAY_SEED=3964280215984007040 cargo test
//! ```

pub mod env;
pub mod error;
pub mod random;
pub mod workload;

pub use bs_core::StackOp;
pub use env::{SimEnv, SimStats};
pub use error::DstError;
pub use random::SimRng;
pub use workload::WorkloadConfig;

/// Environment variable holding a fixed seed.
pub const SEED_ENV_VAR: &str = "DST_SEED";

/// Environment variable holding the iteration count.
pub const ITERATIONS_ENV_VAR: &str = "DST_ITERATIONS";

/// Environment variable holding the seed of a single iteration to replay.
pub const REPLAY_ENV_VAR: &str = "DST_REPLAY_SEED";

/// Read `DST_SEED` or generate a random non-zero seed.
///
/// Prints the seed to stderr for reproduction.
pub fn seed_from_env_or_random() -> Result<u64, DstError> {
    match std::env::var(SEED_ENV_VAR) {
        Ok(s) => {
            let seed = parse_seed(&s)?;
            eprintln!("DST_SEED={} (from environment)", seed);
            Ok(seed)
        }
        Err(_) => {
            let seed = rand::random::<u64>().max(1);
            eprintln!("DST_SEED={} (randomly generated)", seed);
            Ok(seed)
        }
    }
}

/// Read `DST_ITERATIONS`, falling back to `default`.
pub fn iterations_from_env(default: u64) -> Result<u64, DstError> {
    debug_assert!(default > 0, "Default iteration count must be positive");

    match std::env::var(ITERATIONS_ENV_VAR) {
        Ok(s) => {
            let iterations: u64 = s
                .trim()
                .parse()
                .map_err(|_| DstError::InvalidIterations(s.clone()))?;
            if iterations == 0 {
                return Err(DstError::InvalidIterations(s));
            }
            Ok(iterations)
        }
        Err(_) => Ok(default),
    }
}

/// Read `DST_REPLAY_SEED`, if set.
///
/// The seed is that of an iteration's own environment, so the caller runs
/// `SimEnv::new(seed)` directly instead of forking from it.
pub fn replay_seed_from_env() -> Result<Option<u64>, DstError> {
    match std::env::var(REPLAY_ENV_VAR) {
        Ok(s) => {
            let seed = parse_seed(&s)?;
            eprintln!("DST_REPLAY_SEED={} (replaying one iteration)", seed);
            Ok(Some(seed))
        }
        Err(_) => Ok(None),
    }
}

/// Parse a seed string. Zero is rejected.
pub fn parse_seed(s: &str) -> Result<u64, DstError> {
    match s.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(DstError::InvalidSeed(s.to_string())),
        Ok(seed) => Ok(seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("12345").unwrap(), 12345);
        assert_eq!(parse_seed(" 7 ").unwrap(), 7);
        assert!(matches!(parse_seed("0"), Err(DstError::InvalidSeed(_))));
        assert!(matches!(parse_seed("abc"), Err(DstError::InvalidSeed(_))));
    }

    // Nothing else in this crate reads DST_REPLAY_SEED.
    #[test]
    fn test_replay_seed_from_env() {
        std::env::set_var(REPLAY_ENV_VAR, "123");
        let set = replay_seed_from_env();
        std::env::set_var(REPLAY_ENV_VAR, "0");
        let zero = replay_seed_from_env();
        std::env::remove_var(REPLAY_ENV_VAR);
        let unset = replay_seed_from_env();

        assert_eq!(set, Ok(Some(123)));
        assert!(matches!(zero, Err(DstError::InvalidSeed(_))));
        assert_eq!(unset, Ok(None));
    }
}
