//! Property verification types.
//!
//! Every invariant of the container is checked as a named property so a
//! report can say exactly which law was broken.

use crate::counterexample::Counterexample;

/// Result of checking a single property.
#[derive(Debug, Clone)]
pub struct PropertyResult {
    /// Property name (e.g., "LifoOrder")
    pub name: &'static str,

    /// Whether the property holds
    pub holds: bool,

    /// Description of violation if property doesn't hold
    pub violation: Option<String>,

    /// Counterexample showing how to reproduce the violation
    pub counterexample: Option<Counterexample>,
}

impl PropertyResult {
    /// Create a passing property result.
    #[must_use]
    pub fn pass(name: &'static str) -> Self {
        debug_assert!(!name.is_empty(), "Property name must not be empty");

        Self {
            name,
            holds: true,
            violation: None,
            counterexample: None,
        }
    }

    /// Create a failing property result.
    #[must_use]
    pub fn fail(
        name: &'static str,
        violation: String,
        counterexample: Option<Counterexample>,
    ) -> Self {
        debug_assert!(!name.is_empty(), "Property name must not be empty");
        debug_assert!(!violation.is_empty(), "Violation description must not be empty");

        Self {
            name,
            holds: false,
            violation: Some(violation),
            counterexample,
        }
    }

    /// Format as a single-line status.
    #[must_use]
    pub fn format_status(&self) -> String {
        if self.holds {
            format!("[PASS] {}", self.name)
        } else {
            format!(
                "[FAIL] {}: {}",
                self.name,
                self.violation.as_deref().unwrap_or("unknown")
            )
        }
    }
}

/// Trait for verifying properties against a state.
pub trait PropertyChecker {
    /// Check all properties and return results.
    ///
    /// Passing properties are included so reports list every law.
    fn check_all(&self) -> Vec<PropertyResult>;

    /// Verify all properties, returning the first failure.
    fn verify_all(&self) -> Result<(), PropertyResult> {
        match self.check_all().into_iter().find(|r| !r.holds) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// Check if all properties hold.
    fn all_hold(&self) -> bool {
        self.check_all().iter().all(|r| r.holds)
    }

    /// Get a summary of all property check results.
    fn summary(&self) -> PropertySummary {
        let results = self.check_all();
        let passed = results.iter().filter(|r| r.holds).count() as u64;
        let total = results.len() as u64;

        PropertySummary {
            passed,
            failed: total - passed,
            total,
            results,
        }
    }
}

/// Summary of property check results.
#[derive(Debug, Clone)]
pub struct PropertySummary {
    /// Number of properties that passed
    pub passed: u64,
    /// Number of properties that failed
    pub failed: u64,
    /// Total number of properties checked
    pub total: u64,
    /// Individual results
    pub results: Vec<PropertyResult>,
}

impl PropertySummary {
    /// Format as a report string.
    #[must_use]
    pub fn format_report(&self) -> String {
        let mut report = format!(
            "Property Check Summary: {}/{} passed\n",
            self.passed, self.total
        );

        for result in &self.results {
            report.push_str(&result.format_status());
            report.push('\n');
        }

        let first_counterexample = self
            .results
            .iter()
            .filter(|r| !r.holds)
            .find_map(|r| r.counterexample.as_ref());
        if let Some(ce) = first_counterexample {
            report.push_str("\nCounterexample:\n");
            report.push_str(&ce.render_diagram());
        }

        report
    }
}
