//! Counterexamples for failed properties.
//!
//! A counterexample records the DST seed (when the failure came from a
//! simulation run) and the sequence of states that led to the violation.

use std::fmt::Write as _;

/// One observed state on the way to a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Step number in the operation history (1-based)
    pub step: u64,
    /// What happened at this step
    pub description: String,
    /// Named variable values at this step
    pub variables: Vec<(String, String)>,
}

/// Reproduction data for a property violation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counterexample {
    /// Seed of the iteration's own environment, if it came from DST
    pub dst_seed: Option<u64>,
    /// States leading to the violation, in order
    pub states: Vec<StateSnapshot>,
}

impl Counterexample {
    /// Create an empty counterexample with no seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dst_seed: None,
            states: Vec::new(),
        }
    }

    /// Create an empty counterexample for a seeded run.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            dst_seed: Some(seed),
            states: Vec::new(),
        }
    }

    /// Append a state snapshot.
    pub fn add_state(&mut self, state: StateSnapshot) {
        debug_assert!(
            self.states.last().map_or(true, |last| last.step <= state.step),
            "Snapshots must be added in step order"
        );
        self.states.push(state);
    }

    /// Command that replays the failing iteration.
    ///
    /// The seed is an iteration seed, not a campaign seed, so it goes
    /// through `DST_REPLAY_SEED` rather than `DST_SEED`.
    #[must_use]
    pub fn reproduce_command(&self) -> Option<String> {
        self.dst_seed
            .map(|seed| format!("DST_REPLAY_SEED={} cargo test", seed))
    }

    /// Render the states as a vertical diagram.
    #[must_use]
    pub fn render_diagram(&self) -> String {
        let mut out = String::new();

        if let Some(cmd) = self.reproduce_command() {
            let _ = writeln!(out, "  reproduce: {}", cmd);
        }

        for (index, state) in self.states.iter().enumerate() {
            let _ = writeln!(out, "  [step {}] {}", state.step, state.description);
            for (name, value) in &state.variables {
                let _ = writeln!(out, "      {} = {}", name, value);
            }
            if index + 1 < self.states.len() {
                out.push_str("      |\n      v\n");
            }
        }

        out
    }
}
