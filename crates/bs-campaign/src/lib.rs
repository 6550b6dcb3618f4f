//! # bs-campaign
//!
//! Runs many seeded DST iterations against the bounded stack and
//! summarizes them.
//!
//! Each iteration forks its own seed from the campaign seed, picks a
//! capacity, generates a workload, replays it on a
//! [`bs_stack::RecordedStack`] and checks every stack property. A failing
//! iteration is reported with its own seed; [`CampaignConfig::replay`]
//! (CLI `--replay`, env `DST_REPLAY_SEED`) runs that iteration alone.
//!
//! | Preset | Iterations | Capacities | Workload |
//! |--------|------------|------------|----------|
//! | `fast` | 100 | 1..=4 | default mix |
//! | `default` | 1000 | 1..=16 | default mix |
//! | `thorough` | 10000 | 1..=64 | 256 ops, with destroy |

pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use config::CampaignConfig;
pub use error::CampaignError;
pub use report::{CampaignReport, FailureRecord, OutcomeTotals, PropertyTally};
pub use runner::{plan_iteration, run_campaign, IterationPlan};
