//! Campaign configuration.

use bs_dst::WorkloadConfig;

use crate::error::CampaignError;

/// Configuration for a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignConfig {
    /// Number of DST iterations
    pub iterations: u64,
    /// Campaign seed (if None, taken from `DST_SEED` or generated)
    pub seed: Option<u64>,
    /// Iteration seed to replay alone, as recorded in a failure.
    ///
    /// When set, the campaign runs one iteration on `SimEnv::new(seed)` and
    /// ignores `seed` and `iterations`.
    pub replay_seed: Option<u64>,
    /// Smallest capacity a run may pick
    pub capacity_min: usize,
    /// Largest capacity a run may pick
    pub capacity_max: usize,
    /// Shape of each run's operation sequence
    pub workload: WorkloadConfig,
    /// Stop on first failing iteration
    pub fail_fast: bool,
    /// Print progress to stdout
    pub verbose: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            seed: None,
            replay_seed: None,
            capacity_min: 1,
            capacity_max: 16,
            workload: WorkloadConfig::default(),
            fail_fast: true,
            verbose: false,
        }
    }
}

impl CampaignConfig {
    /// Fast config for quick iteration.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            iterations: 100,
            capacity_max: 4,
            ..Default::default()
        }
    }

    /// Thorough config for CI.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            iterations: 10_000,
            capacity_max: 64,
            workload: WorkloadConfig {
                operations_count: 256,
                ..WorkloadConfig::with_destroy()
            },
            fail_fast: false,
            ..Default::default()
        }
    }

    /// Replay a single iteration from the seed its failure recorded.
    #[must_use]
    pub fn replay(seed: u64) -> Self {
        Self {
            replay_seed: Some(seed),
            ..Default::default()
        }
    }

    /// Apply `DST_SEED`, `DST_ITERATIONS` and `DST_REPLAY_SEED` when they are set.
    pub fn with_env_overrides(self) -> Result<Self, CampaignError> {
        self.with_env_seed()?
            .with_env_iterations()?
            .with_env_replay_seed()
    }

    /// Apply `DST_SEED` when it is set.
    pub fn with_env_seed(mut self) -> Result<Self, CampaignError> {
        if let Ok(s) = std::env::var(bs_dst::SEED_ENV_VAR) {
            self.seed = Some(bs_dst::parse_seed(&s)?);
        }
        Ok(self)
    }

    /// Apply `DST_ITERATIONS` when it is set.
    pub fn with_env_iterations(mut self) -> Result<Self, CampaignError> {
        self.iterations = bs_dst::iterations_from_env(self.iterations)?;
        Ok(self)
    }

    /// Apply `DST_REPLAY_SEED` when it is set.
    pub fn with_env_replay_seed(mut self) -> Result<Self, CampaignError> {
        if let Some(seed) = bs_dst::replay_seed_from_env()? {
            self.replay_seed = Some(seed);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), CampaignError> {
        if self.iterations == 0 {
            return Err(CampaignError::InvalidConfig(
                "iterations must be positive".to_string(),
            ));
        }
        if self.capacity_min == 0 {
            return Err(CampaignError::InvalidConfig(
                "capacity_min must be positive".to_string(),
            ));
        }
        if self.capacity_min > self.capacity_max {
            return Err(CampaignError::InvalidConfig(format!(
                "capacity range {}..={} is empty",
                self.capacity_min, self.capacity_max
            )));
        }
        if self.seed == Some(0) || self.replay_seed == Some(0) {
            return Err(CampaignError::InvalidConfig(
                "seed must be non-zero".to_string(),
            ));
        }
        self.workload.validate()?;
        Ok(())
    }
}
