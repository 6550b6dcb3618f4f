//! Campaign execution.

use bs_core::{BoundedStackProperties, BoundedStackPropertyChecker, PropertyChecker, StackOp};
use bs_dst::SimEnv;
use bs_stack::RecordedStack;

use crate::config::CampaignConfig;
use crate::error::CampaignError;
use crate::report::CampaignReport;

/// Capacity and operations of one iteration, drawn from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationPlan {
    pub capacity: usize,
    pub operations: Vec<StackOp>,
}

/// Draw the plan for the iteration that `run` belongs to.
///
/// `run` is the iteration's own environment: a fork of the campaign
/// environment, or `SimEnv::new(seed)` when replaying a recorded seed.
pub fn plan_iteration(
    run: &mut SimEnv,
    config: &CampaignConfig,
) -> Result<IterationPlan, CampaignError> {
    let capacity = run.gen_capacity(config.capacity_min..=config.capacity_max);
    let operations = run.generate_workload(&config.workload)?;
    Ok(IterationPlan {
        capacity,
        operations,
    })
}

/// Run every iteration of `config` and summarize the results.
///
/// Property failures do not make this return `Err`; they are recorded in the
/// report. `Err` means the campaign could not run at all.
pub fn run_campaign(config: &CampaignConfig) -> Result<CampaignReport, CampaignError> {
    config.validate()?;

    if let Some(seed) = config.replay_seed {
        return replay_iteration(config, seed);
    }

    let seed = match config.seed {
        Some(seed) => seed,
        None => bs_dst::seed_from_env_or_random()?,
    };

    if config.verbose {
        println!(
            "=== CAMPAIGN START === DST_SEED={} iterations={} capacities={}..={} ops={}",
            seed,
            config.iterations,
            config.capacity_min,
            config.capacity_max,
            config.workload.operations_count
        );
    }

    let mut env = SimEnv::new(seed);
    let mut report = CampaignReport::new(seed);

    for iteration in 0..config.iterations {
        let mut run = env.fork();
        let passed = run_iteration(&mut run, iteration, config, &mut report)?;
        if !passed && config.fail_fast {
            break;
        }
    }

    if config.verbose {
        println!(
            "=== CAMPAIGN COMPLETE === {} iterations, {} operations",
            report.iterations_run, report.operations_run
        );
    }

    Ok(report)
}

/// Run the single iteration whose environment was seeded with `seed`.
fn replay_iteration(
    config: &CampaignConfig,
    seed: u64,
) -> Result<CampaignReport, CampaignError> {
    if config.verbose {
        println!("=== REPLAY === DST_REPLAY_SEED={}", seed);
    }

    let mut run = SimEnv::new(seed);
    let mut report = CampaignReport::replay(seed);
    run_iteration(&mut run, 0, config, &mut report)?;
    Ok(report)
}

fn run_iteration(
    run: &mut SimEnv,
    iteration: u64,
    config: &CampaignConfig,
    report: &mut CampaignReport,
) -> Result<bool, CampaignError> {
    let plan = plan_iteration(run, config)?;

    let mut stack = RecordedStack::new(plan.capacity)?;
    for op in plan.operations {
        // Errors are expected outcomes here; the history captures them.
        let _ = stack.apply(op);
    }

    let checker = BoundedStackPropertyChecker::new(&stack).with_seed(run.seed());
    let results = checker.check_all();
    let passed = report.record_iteration(
        iteration,
        run.seed(),
        plan.capacity,
        stack.history(),
        &results,
    );

    if !passed && config.verbose {
        eprintln!(
            "iteration {} failed (capacity {}, {})",
            iteration,
            plan.capacity,
            run.format_replay_seed()
        );
    }
    Ok(passed)
}
