//! Campaign results.

use std::collections::BTreeMap;

use bs_core::{PropertyResult, StackHistory, StackOpKind};
use serde::Serialize;

use crate::error::CampaignError;

/// How many operations ended in each outcome, across all iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTotals {
    pub pushes_ok: u64,
    pub pushes_rejected: u64,
    pub pops_ok: u64,
    pub pops_empty: u64,
    pub peeks_ok: u64,
    pub peeks_empty: u64,
    pub destroys: u64,
    pub invalid_state: u64,
}

impl OutcomeTotals {
    fn add_history(&mut self, history: &StackHistory) {
        self.pushes_ok += history.successes_count(StackOpKind::Push);
        self.pushes_rejected += history.failures_count(StackOpKind::Push, "CapacityExceeded");
        self.pops_ok += history.successes_count(StackOpKind::Pop);
        self.pops_empty += history.failures_count(StackOpKind::Pop, "EmptyContainer");
        self.peeks_ok += history.successes_count(StackOpKind::Peek);
        self.peeks_empty += history.failures_count(StackOpKind::Peek, "EmptyContainer");
        self.destroys += history.successes_count(StackOpKind::Destroy);
        self.invalid_state += [StackOpKind::Push, StackOpKind::Pop, StackOpKind::Peek]
            .into_iter()
            .map(|kind| history.failures_count(kind, "InvalidState"))
            .sum::<u64>();
    }
}

/// Pass/fail counts for one property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PropertyTally {
    pub passed: u64,
    pub failed: u64,
}

/// The first failing iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub iteration: u64,
    /// Seed of the iteration's own environment; `--replay <seed>` or
    /// `DST_REPLAY_SEED=<seed>` runs this iteration alone
    pub seed: u64,
    pub capacity: usize,
    pub property: String,
    pub violation: String,
    pub counterexample: Option<String>,
}

/// Summary of a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignReport {
    /// Campaign seed, or the iteration seed when `replay` is set
    pub seed: u64,
    /// Whether this report covers a single replayed iteration
    pub replay: bool,
    pub iterations_run: u64,
    pub iterations_failed: u64,
    pub operations_run: u64,
    pub outcomes: OutcomeTotals,
    pub properties: BTreeMap<String, PropertyTally>,
    pub first_failure: Option<FailureRecord>,
}

impl CampaignReport {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            replay: false,
            iterations_run: 0,
            iterations_failed: 0,
            operations_run: 0,
            outcomes: OutcomeTotals::default(),
            properties: BTreeMap::new(),
            first_failure: None,
        }
    }

    /// Report for a single iteration replayed from its own seed.
    #[must_use]
    pub fn replay(seed: u64) -> Self {
        Self {
            replay: true,
            ..Self::new(seed)
        }
    }

    /// Fold one iteration into the report. Returns whether it passed.
    pub fn record_iteration(
        &mut self,
        iteration: u64,
        seed: u64,
        capacity: usize,
        history: &StackHistory,
        results: &[PropertyResult],
    ) -> bool {
        self.iterations_run += 1;
        self.operations_run += history.len() as u64;
        self.outcomes.add_history(history);

        for result in results {
            let tally = self.properties.entry(result.name.to_string()).or_default();
            if result.holds {
                tally.passed += 1;
            } else {
                tally.failed += 1;
            }
        }

        let Some(failure) = results.iter().find(|r| !r.holds) else {
            return true;
        };

        self.iterations_failed += 1;
        if self.first_failure.is_none() {
            self.first_failure = Some(FailureRecord {
                iteration,
                seed,
                capacity,
                property: failure.name.to_string(),
                violation: failure.violation.clone().unwrap_or_default(),
                counterexample: failure.counterexample.as_ref().map(|ce| ce.render_diagram()),
            });
        }
        false
    }

    /// True when no iteration failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.iterations_failed == 0
    }

    /// Multi-line human-readable summary.
    #[must_use]
    pub fn format_summary(&self) -> String {
        let (label, variable) = if self.replay {
            ("Replay", bs_dst::REPLAY_ENV_VAR)
        } else {
            ("Campaign", bs_dst::SEED_ENV_VAR)
        };
        let mut out = format!(
            "{} {}={}: {}/{} iterations passed, {} operations\n",
            label,
            variable,
            self.seed,
            self.iterations_run - self.iterations_failed,
            self.iterations_run,
            self.operations_run
        );

        let o = &self.outcomes;
        out.push_str(&format!(
            "  push ok={} rejected={} | pop ok={} empty={} | peek ok={} empty={} | destroy={} invalid_state={}\n",
            o.pushes_ok,
            o.pushes_rejected,
            o.pops_ok,
            o.pops_empty,
            o.peeks_ok,
            o.peeks_empty,
            o.destroys,
            o.invalid_state
        ));

        for (name, tally) in &self.properties {
            let status = if tally.failed == 0 { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "  [{}] {} ({} passed, {} failed)\n",
                status, name, tally.passed, tally.failed
            ));
        }

        if let Some(failure) = &self.first_failure {
            out.push_str(&format!(
                "\nFirst failure: iteration {} capacity {} DST_REPLAY_SEED={}\n  {}: {}\n",
                failure.iteration, failure.capacity, failure.seed, failure.property, failure.violation
            ));
            if let Some(diagram) = &failure.counterexample {
                out.push_str(diagram);
            }
        }

        out
    }

    pub fn to_json(&self) -> Result<String, CampaignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use bs_core::{Counterexample, StackError};

    use super::*;

    fn history() -> StackHistory {
        let mut h = StackHistory::new();
        h.record(StackOpKind::Push, Some(1), None, 0, 1);
        h.record(
            StackOpKind::Push,
            Some(2),
            Some(StackError::CapacityExceeded { capacity: 1 }),
            1,
            1,
        );
        h.record(StackOpKind::Pop, Some(1), None, 1, 0);
        h.record(StackOpKind::Peek, None, Some(StackError::EmptyContainer), 0, 0);
        h.record(StackOpKind::Destroy, None, None, 0, 0);
        h.record(StackOpKind::Pop, None, Some(StackError::InvalidState), 0, 0);
        h
    }

    #[test]
    fn test_record_passing_iteration() {
        let mut report = CampaignReport::new(5);
        let passed = report.record_iteration(
            0,
            77,
            1,
            &history(),
            &[PropertyResult::pass("LifoOrder")],
        );

        assert!(passed);
        assert!(report.passed());
        assert_eq!(report.operations_run, 6);
        assert_eq!(
            report.outcomes,
            OutcomeTotals {
                pushes_ok: 1,
                pushes_rejected: 1,
                pops_ok: 1,
                pops_empty: 0,
                peeks_ok: 0,
                peeks_empty: 1,
                destroys: 1,
                invalid_state: 1,
            }
        );
        assert_eq!(report.properties["LifoOrder"].passed, 1);
    }

    #[test]
    fn test_first_failure_kept() {
        let mut report = CampaignReport::new(5);
        let failing = PropertyResult::fail(
            "NoLostElements",
            "element 3 lost".to_string(),
            Some(Counterexample::with_seed(11)),
        );

        assert!(!report.record_iteration(3, 11, 4, &StackHistory::new(), &[failing.clone()]));
        assert!(!report.record_iteration(4, 12, 4, &StackHistory::new(), &[failing]));

        assert!(!report.passed());
        assert_eq!(report.iterations_failed, 2);
        let first = report.first_failure.as_ref().unwrap();
        assert_eq!(first.iteration, 3);
        assert_eq!(first.seed, 11);
        assert!(first
            .counterexample
            .as_ref()
            .unwrap()
            .contains("DST_REPLAY_SEED=11"));

        let summary = report.format_summary();
        assert!(summary.contains("0/2 iterations passed"));
        assert!(summary.contains("[FAIL] NoLostElements (0 passed, 2 failed)"));
        assert!(summary.starts_with("Campaign DST_SEED=5: "));
        assert!(summary.contains("First failure: iteration 3 capacity 4 DST_REPLAY_SEED=11"));
    }

    #[test]
    fn test_replay_summary_names_replay_seed() {
        let mut report = CampaignReport::replay(42);
        report.record_iteration(0, 42, 2, &history(), &[PropertyResult::pass("LifoOrder")]);
        assert!(report
            .format_summary()
            .starts_with("Replay DST_REPLAY_SEED=42: 1/1 iterations passed"));
    }

    #[test]
    fn test_json_report() {
        let mut report = CampaignReport::new(5);
        report.record_iteration(0, 9, 2, &history(), &[PropertyResult::pass("LifoOrder")]);

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["seed"], 5);
        assert_eq!(value["replay"], false);
        assert_eq!(value["outcomes"]["pushes_rejected"], 1);
        assert_eq!(value["properties"]["LifoOrder"]["passed"], 1);
        assert!(value["first_failure"].is_null());
    }
}
