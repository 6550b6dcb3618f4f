//! CLI for running DST campaigns against the bounded stack.
//!
//! # Usage
//!
//! ```bash
//! # Default campaign with a random seed
//! cargo run -p bs-campaign --features cli -- --preset default
//!
//! # Replay a failing iteration from the seed its report printed
//! cargo run -p bs-campaign --features cli -- --replay 3964280215984007040
//!
//! # Machine-readable report
//! cargo run -p bs-campaign --features cli -- --preset thorough --json --quiet
//! ```
//!
//! `DST_SEED`, `DST_ITERATIONS` and `DST_REPLAY_SEED` are honored; an
//! explicit flag wins, and its variable is not read at all.

use std::process::ExitCode;

use bs_campaign::{run_campaign, CampaignConfig};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Fast,
    Default,
    Thorough,
}

#[derive(Debug, Parser)]
#[command(
    name = "bs-campaign",
    version,
    about = "Run deterministic simulation campaigns against the bounded stack"
)]
struct Args {
    /// Base configuration
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Campaign seed (overrides DST_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of iterations (overrides DST_ITERATIONS)
    #[arg(long, short = 'n')]
    iterations: Option<u64>,

    /// Run only the iteration with this seed (overrides DST_REPLAY_SEED)
    #[arg(long, value_name = "SEED")]
    replay: Option<u64>,

    #[arg(long)]
    capacity_min: Option<usize>,

    #[arg(long)]
    capacity_max: Option<usize>,

    /// Operations per iteration
    #[arg(long)]
    ops: Option<usize>,

    /// Let workloads destroy the stack
    #[arg(long)]
    destroy: bool,

    /// Keep running after the first failing iteration
    #[arg(long)]
    keep_going: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// No progress output
    #[arg(long, short)]
    quiet: bool,
}

impl Args {
    fn into_config(self) -> Result<(CampaignConfig, bool), bs_campaign::CampaignError> {
        let base = match self.preset {
            Preset::Fast => CampaignConfig::fast(),
            Preset::Default => CampaignConfig::default(),
            Preset::Thorough => CampaignConfig::thorough(),
        };
        let mut config = match self.seed {
            Some(seed) => CampaignConfig {
                seed: Some(seed),
                ..base
            },
            None => base.with_env_seed()?,
        };
        config = match self.iterations {
            Some(iterations) => CampaignConfig {
                iterations,
                ..config
            },
            None => config.with_env_iterations()?,
        };
        config = match self.replay {
            Some(seed) => CampaignConfig {
                replay_seed: Some(seed),
                ..config
            },
            None => config.with_env_replay_seed()?,
        };

        if let Some(min) = self.capacity_min {
            config.capacity_min = min;
        }
        if let Some(max) = self.capacity_max {
            config.capacity_max = max;
        }
        if let Some(ops) = self.ops {
            config.workload.operations_count = ops;
        }
        if self.destroy && config.workload.destroy_weight == 0 {
            config.workload.destroy_weight = 1;
        }
        if self.keep_going {
            config.fail_fast = false;
        }
        config.verbose = !self.quiet && !self.json;

        Ok((config, self.json))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (config, json) = match args.into_config() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let report = match run_campaign(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if json {
        match report.to_json() {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        }
    } else {
        println!();
        println!("{}", report.format_summary());
    }

    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
