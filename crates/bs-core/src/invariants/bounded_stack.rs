//! Bounded stack invariants.
//!
//! | Property | Description |
//! |----------|-------------|
//! | CountWithinCapacity | `0 <= count <= capacity`, capacity positive |
//! | ContentsMatchCount | Live elements equal `count` |
//! | LifoOrder | Pops and peeks return the most recent unpopped push |
//! | RejectedPushPreservesCount | A full stack rejects push without mutation |
//! | EmptyFailuresOnlyWhenEmpty | Pop/peek fail only at `count == 0`, without mutation |
//! | NoLostElements | Accepted pushes = popped + current contents |
//! | DestroyedRejectsOperations | After destroy everything fails `InvalidState` |
//!
//! The checker replays the recorded history against a plain `Vec` model, so
//! the history must cover the stack's whole lifetime.

use std::collections::HashMap;

use crate::counterexample::{Counterexample, StateSnapshot};
use crate::error::StackError;
use crate::property::{PropertyChecker, PropertyResult};

/// State a bounded stack exposes for property checking.
pub trait BoundedStackProperties {
    /// Capacity fixed at creation.
    fn capacity(&self) -> usize;

    /// Number of occupied slots.
    fn count(&self) -> usize;

    /// Whether the backing storage has been released.
    fn is_destroyed(&self) -> bool;

    /// Current contents, bottom to top.
    fn current_contents(&self) -> Vec<u64>;

    /// Every operation applied since creation.
    fn history(&self) -> &StackHistory;
}

/// Kind of stack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOpKind {
    Push,
    Pop,
    Peek,
    Destroy,
}

impl StackOpKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StackOpKind::Push => "push",
            StackOpKind::Pop => "pop",
            StackOpKind::Peek => "peek",
            StackOpKind::Destroy => "destroy",
        }
    }
}

/// An operation that can be applied to a stack under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOp {
    Push(u64),
    Pop,
    Peek,
    Destroy,
}

impl StackOp {
    #[must_use]
    pub fn kind(&self) -> StackOpKind {
        match self {
            StackOp::Push(_) => StackOpKind::Push,
            StackOp::Pop => StackOpKind::Pop,
            StackOp::Peek => StackOpKind::Peek,
            StackOp::Destroy => StackOpKind::Destroy,
        }
    }
}

/// A single recorded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOperation {
    /// Step number (1-based, dense)
    pub step: u64,
    /// Type of operation
    pub kind: StackOpKind,
    /// Value pushed (even if rejected), or value returned by pop/peek
    pub value: Option<u64>,
    /// Error returned, if the operation failed
    pub error: Option<StackError>,
    /// Count observed before the operation
    pub count_before: usize,
    /// Count observed after the operation
    pub count_after: usize,
}

impl StackOperation {
    /// One-line description used in counterexamples.
    #[must_use]
    pub fn describe(&self) -> String {
        let value = self
            .value
            .map_or_else(String::new, |v| format!(" {}", v));
        match self.error {
            Some(err) => format!("{}{} -> {}", self.kind.name(), value, err.name()),
            None => format!("{}{} -> ok", self.kind.name(), value),
        }
    }
}

/// History of stack operations in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackHistory {
    pub operations: Vec<StackOperation>,
}

impl StackHistory {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Record an operation. Steps are assigned in order starting at 1.
    pub fn record(
        &mut self,
        kind: StackOpKind,
        value: Option<u64>,
        error: Option<StackError>,
        count_before: usize,
        count_after: usize,
    ) {
        let step = self.operations.len() as u64 + 1;
        self.operations.push(StackOperation {
            step,
            kind,
            value,
            error,
            count_before,
            count_after,
        });
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations of `kind` that failed with an error named `error_name`.
    #[must_use]
    pub fn failures_count(&self, kind: StackOpKind, error_name: &str) -> u64 {
        self.operations
            .iter()
            .filter(|op| op.kind == kind)
            .filter(|op| op.error.map_or(false, |e| e.name() == error_name))
            .count() as u64
    }

    /// Number of operations of `kind` that succeeded.
    #[must_use]
    pub fn successes_count(&self, kind: StackOpKind) -> u64 {
        self.operations
            .iter()
            .filter(|op| op.kind == kind && op.error.is_none())
            .count() as u64
    }
}

/// Property checker for bounded stack implementations.
pub struct BoundedStackPropertyChecker<'a, T: BoundedStackProperties> {
    stack: &'a T,
    dst_seed: Option<u64>,
}

impl<'a, T: BoundedStackProperties> BoundedStackPropertyChecker<'a, T> {
    /// Create a new checker for the given stack.
    #[must_use]
    pub fn new(stack: &'a T) -> Self {
        Self {
            stack,
            dst_seed: None,
        }
    }

    /// Set DST seed for counterexample reproduction.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        debug_assert!(seed != 0, "DST seed should not be zero");
        self.dst_seed = Some(seed);
        self
    }

    fn counterexample_at(&self, op: &StackOperation) -> Counterexample {
        let mut ce = match self.dst_seed {
            Some(seed) => Counterexample::with_seed(seed),
            None => Counterexample::new(),
        };
        ce.add_state(StateSnapshot {
            step: op.step,
            description: op.describe(),
            variables: vec![
                ("capacity".to_string(), self.stack.capacity().to_string()),
                ("count_before".to_string(), op.count_before.to_string()),
                ("count_after".to_string(), op.count_after.to_string()),
            ],
        });
        ce
    }

    fn counterexample_final(&self, description: String) -> Counterexample {
        let mut ce = match self.dst_seed {
            Some(seed) => Counterexample::with_seed(seed),
            None => Counterexample::new(),
        };
        ce.add_state(StateSnapshot {
            step: self.stack.history().len() as u64,
            description,
            variables: vec![
                ("capacity".to_string(), self.stack.capacity().to_string()),
                ("count".to_string(), self.stack.count().to_string()),
                (
                    "contents".to_string(),
                    format!("{:?}", self.stack.current_contents()),
                ),
            ],
        });
        ce
    }

    /// CountWithinCapacity
    fn check_count_within_capacity(&self) -> PropertyResult {
        const NAME: &str = "CountWithinCapacity";
        let capacity = self.stack.capacity();
        let count = self.stack.count();

        if capacity == 0 {
            return PropertyResult::fail(NAME, "capacity is zero".to_string(), None);
        }

        if let Some(op) = self
            .stack
            .history()
            .operations
            .iter()
            .find(|op| op.count_before > capacity || op.count_after > capacity)
        {
            return PropertyResult::fail(
                NAME,
                format!(
                    "step {} ({}) observed count {} above capacity {}",
                    op.step,
                    op.describe(),
                    op.count_after.max(op.count_before),
                    capacity
                ),
                Some(self.counterexample_at(op)),
            );
        }

        if count > capacity {
            return PropertyResult::fail(
                NAME,
                format!("count {} exceeds capacity {}", count, capacity),
                Some(self.counterexample_final("final state".to_string())),
            );
        }

        PropertyResult::pass(NAME)
    }

    /// ContentsMatchCount
    fn check_contents_match_count(&self) -> PropertyResult {
        const NAME: &str = "ContentsMatchCount";
        let contents_len = self.stack.current_contents().len();
        let count = self.stack.count();

        if contents_len != count {
            return PropertyResult::fail(
                NAME,
                format!("{} live elements but count is {}", contents_len, count),
                Some(self.counterexample_final("final state".to_string())),
            );
        }

        if self.stack.is_destroyed() && count != 0 {
            return PropertyResult::fail(
                NAME,
                format!("destroyed stack still reports count {}", count),
                None,
            );
        }

        PropertyResult::pass(NAME)
    }

    /// LifoOrder
    ///
    /// Replays accepted operations against a model stack: every successful
    /// pop or peek must return the model's top.
    fn check_lifo_order(&self) -> PropertyResult {
        const NAME: &str = "LifoOrder";
        let mut model: Vec<u64> = Vec::new();

        for op in &self.stack.history().operations {
            match (op.kind, op.error) {
                (StackOpKind::Push, None) => {
                    if let Some(value) = op.value {
                        model.push(value);
                    }
                }
                (StackOpKind::Pop, None) => {
                    let expected = model.pop();
                    if expected != op.value {
                        return PropertyResult::fail(
                            NAME,
                            format!(
                                "pop at step {} returned {:?} but LIFO expected {:?}",
                                op.step, op.value, expected
                            ),
                            Some(self.counterexample_at(op)),
                        );
                    }
                }
                (StackOpKind::Peek, None) => {
                    let expected = model.last().copied();
                    if expected != op.value {
                        return PropertyResult::fail(
                            NAME,
                            format!(
                                "peek at step {} returned {:?} but LIFO expected {:?}",
                                op.step, op.value, expected
                            ),
                            Some(self.counterexample_at(op)),
                        );
                    }
                }
                (StackOpKind::Destroy, _) => model.clear(),
                _ => {}
            }
        }

        let contents = self.stack.current_contents();
        if !self.stack.is_destroyed() && contents != model {
            return PropertyResult::fail(
                NAME,
                format!(
                    "contents {:?} differ from replayed history {:?}",
                    contents, model
                ),
                Some(self.counterexample_final("final state".to_string())),
            );
        }

        PropertyResult::pass(NAME)
    }

    /// RejectedPushPreservesCount
    fn check_rejected_push_preserves_count(&self) -> PropertyResult {
        const NAME: &str = "RejectedPushPreservesCount";
        let capacity = self.stack.capacity();

        for op in &self.stack.history().operations {
            if op.kind != StackOpKind::Push {
                continue;
            }

            let consistent = match op.error {
                None => op.count_before < capacity && op.count_after == op.count_before + 1,
                Some(StackError::CapacityExceeded { capacity: reported }) => {
                    reported == capacity
                        && op.count_before == capacity
                        && op.count_after == op.count_before
                }
                Some(StackError::InvalidState) => op.count_after == op.count_before,
                Some(_) => false,
            };

            if !consistent {
                return PropertyResult::fail(
                    NAME,
                    format!(
                        "push at step {} ({}) went from count {} to {} with capacity {}",
                        op.step,
                        op.describe(),
                        op.count_before,
                        op.count_after,
                        capacity
                    ),
                    Some(self.counterexample_at(op)),
                );
            }
        }

        PropertyResult::pass(NAME)
    }

    /// EmptyFailuresOnlyWhenEmpty
    fn check_empty_failures_only_when_empty(&self) -> PropertyResult {
        const NAME: &str = "EmptyFailuresOnlyWhenEmpty";

        for op in &self.stack.history().operations {
            let consistent = match (op.kind, op.error) {
                (StackOpKind::Pop, None) => {
                    op.count_before > 0 && op.count_after + 1 == op.count_before
                }
                (StackOpKind::Peek, None) => {
                    op.count_before > 0 && op.count_after == op.count_before
                }
                (StackOpKind::Pop | StackOpKind::Peek, Some(StackError::EmptyContainer)) => {
                    op.count_before == 0 && op.count_after == 0
                }
                (StackOpKind::Pop | StackOpKind::Peek, Some(StackError::InvalidState)) => true,
                (StackOpKind::Pop | StackOpKind::Peek, Some(_)) => false,
                _ => true,
            };

            if !consistent {
                return PropertyResult::fail(
                    NAME,
                    format!(
                        "{} at step {} went from count {} to {}",
                        op.describe(),
                        op.step,
                        op.count_before,
                        op.count_after
                    ),
                    Some(self.counterexample_at(op)),
                );
            }
        }

        PropertyResult::pass(NAME)
    }

    /// NoLostElements
    ///
    /// Counts are tracked as a multiset since values may repeat.
    fn check_no_lost_elements(&self) -> PropertyResult {
        const NAME: &str = "NoLostElements";
        let mut live: HashMap<u64, u64> = HashMap::new();
        let mut released = false;

        for op in &self.stack.history().operations {
            match (op.kind, op.error, op.value) {
                (StackOpKind::Push, None, Some(value)) => {
                    *live.entry(value).or_insert(0) += 1;
                }
                (StackOpKind::Pop, None, Some(value)) => match live.get_mut(&value) {
                    Some(n) if *n > 0 => *n -= 1,
                    _ => {
                        return PropertyResult::fail(
                            NAME,
                            format!(
                                "pop at step {} returned {} which is not live",
                                op.step, value
                            ),
                            Some(self.counterexample_at(op)),
                        );
                    }
                },
                (StackOpKind::Destroy, None, _) if !released => {
                    let live_total: u64 = live.values().sum();
                    if live_total != op.count_before as u64 {
                        return PropertyResult::fail(
                            NAME,
                            format!(
                                "destroy at step {} released {} elements but {} were live",
                                op.step, op.count_before, live_total
                            ),
                            Some(self.counterexample_at(op)),
                        );
                    }
                    live.clear();
                    released = true;
                }
                _ => {}
            }
        }

        let mut in_stack: HashMap<u64, u64> = HashMap::new();
        for value in self.stack.current_contents() {
            *in_stack.entry(value).or_insert(0) += 1;
        }
        live.retain(|_, n| *n > 0);

        if live != in_stack {
            let missing: Vec<u64> = live
                .iter()
                .filter(|(v, n)| in_stack.get(*v).copied().unwrap_or(0) < **n)
                .map(|(v, _)| *v)
                .collect();
            return PropertyResult::fail(
                NAME,
                format!(
                    "elements {:?} were pushed but are neither in the stack nor popped",
                    missing
                ),
                Some(self.counterexample_final("final state".to_string())),
            );
        }

        PropertyResult::pass(NAME)
    }

    /// DestroyedRejectsOperations
    fn check_destroyed_rejects_operations(&self) -> PropertyResult {
        const NAME: &str = "DestroyedRejectsOperations";
        let mut destroyed = false;

        for op in &self.stack.history().operations {
            let consistent = if op.kind == StackOpKind::Destroy {
                op.error.is_none() && op.count_after == 0
            } else if destroyed {
                op.error == Some(StackError::InvalidState) && op.count_after == 0
            } else {
                op.error != Some(StackError::InvalidState)
            };

            if !consistent {
                return PropertyResult::fail(
                    NAME,
                    format!(
                        "{} at step {} while destroyed={}",
                        op.describe(),
                        op.step,
                        destroyed
                    ),
                    Some(self.counterexample_at(op)),
                );
            }

            if op.kind == StackOpKind::Destroy {
                destroyed = true;
            }
        }

        if destroyed != self.stack.is_destroyed() {
            return PropertyResult::fail(
                NAME,
                format!(
                    "history says destroyed={} but stack says {}",
                    destroyed,
                    self.stack.is_destroyed()
                ),
                None,
            );
        }

        PropertyResult::pass(NAME)
    }
}

impl<T: BoundedStackProperties> PropertyChecker for BoundedStackPropertyChecker<'_, T> {
    fn check_all(&self) -> Vec<PropertyResult> {
        vec![
            self.check_count_within_capacity(),
            self.check_contents_match_count(),
            self.check_lifo_order(),
            self.check_rejected_push_preserves_count(),
            self.check_empty_failures_only_when_empty(),
            self.check_no_lost_elements(),
            self.check_destroyed_rejects_operations(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Vec-backed stack that records its own history.
    struct TestStack {
        capacity: usize,
        contents: Vec<u64>,
        destroyed: bool,
        history: StackHistory,
    }

    impl TestStack {
        fn new(capacity: usize) -> Self {
            Self {
                capacity,
                contents: Vec::new(),
                destroyed: false,
                history: StackHistory::new(),
            }
        }

        fn push(&mut self, value: u64) {
            let before = self.contents.len();
            let error = if self.destroyed {
                Some(StackError::InvalidState)
            } else if before == self.capacity {
                Some(StackError::CapacityExceeded {
                    capacity: self.capacity,
                })
            } else {
                self.contents.push(value);
                None
            };
            self.history
                .record(StackOpKind::Push, Some(value), error, before, self.contents.len());
        }

        fn pop(&mut self) {
            let before = self.contents.len();
            let (value, error) = if self.destroyed {
                (None, Some(StackError::InvalidState))
            } else {
                match self.contents.pop() {
                    Some(v) => (Some(v), None),
                    None => (None, Some(StackError::EmptyContainer)),
                }
            };
            self.history
                .record(StackOpKind::Pop, value, error, before, self.contents.len());
        }

        fn destroy(&mut self) {
            let before = self.contents.len();
            self.contents.clear();
            self.destroyed = true;
            self.history
                .record(StackOpKind::Destroy, None, None, before, 0);
        }
    }

    impl BoundedStackProperties for TestStack {
        fn capacity(&self) -> usize {
            self.capacity
        }

        fn count(&self) -> usize {
            self.contents.len()
        }

        fn is_destroyed(&self) -> bool {
            self.destroyed
        }

        fn current_contents(&self) -> Vec<u64> {
            self.contents.clone()
        }

        fn history(&self) -> &StackHistory {
            &self.history
        }
    }

    fn result_named<'r>(results: &'r [PropertyResult], name: &str) -> &'r PropertyResult {
        results.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_correct_stack_passes_all() {
        let mut stack = TestStack::new(3);
        stack.push(1);
        stack.push(2);
        stack.push(3);
        stack.push(4);
        stack.pop();
        stack.pop();
        stack.pop();
        stack.pop();

        let checker = BoundedStackPropertyChecker::new(&stack);
        let summary = checker.summary();
        assert_eq!(summary.failed, 0, "{}", summary.format_report());
        assert_eq!(summary.total, 7);
    }

    #[test]
    fn test_destroyed_stack_passes_all() {
        let mut stack = TestStack::new(2);
        stack.push(5);
        stack.destroy();
        stack.push(6);
        stack.pop();
        stack.destroy();

        let checker = BoundedStackPropertyChecker::new(&stack);
        assert!(checker.all_hold(), "{}", checker.summary().format_report());
    }

    #[test]
    fn test_lifo_violation_detected() {
        let mut stack = TestStack::new(3);
        stack.push(1);
        stack.push(2);
        // A FIFO bug: the bottom element comes out first.
        stack.history.record(StackOpKind::Pop, Some(1), None, 2, 1);
        stack.contents = vec![2];

        let checker = BoundedStackPropertyChecker::new(&stack).with_seed(42);
        let results = checker.check_all();

        let lifo = result_named(&results, "LifoOrder");
        assert!(!lifo.holds);
        assert!(lifo.violation.as_ref().unwrap().contains("step 3"));
        assert_eq!(lifo.counterexample.as_ref().unwrap().dst_seed, Some(42));
    }

    #[test]
    fn test_rejected_push_mutation_detected() {
        let mut stack = TestStack::new(1);
        stack.push(1);
        stack.history.record(
            StackOpKind::Push,
            Some(2),
            Some(StackError::CapacityExceeded { capacity: 1 }),
            1,
            2,
        );

        let checker = BoundedStackPropertyChecker::new(&stack);
        let results = checker.check_all();
        assert!(!result_named(&results, "RejectedPushPreservesCount").holds);
        assert!(!result_named(&results, "CountWithinCapacity").holds);
    }

    #[test]
    fn test_lost_element_detected() {
        let mut stack = TestStack::new(3);
        stack.push(1);
        stack.push(2);
        stack.push(3);
        stack.contents = vec![1, 2];

        let checker = BoundedStackPropertyChecker::new(&stack);
        let results = checker.check_all();

        let no_lost = result_named(&results, "NoLostElements");
        assert!(!no_lost.holds);
        assert!(no_lost.violation.as_ref().unwrap().contains("3"));
    }

    #[test]
    fn test_count_mismatch_detected() {
        struct Lying(TestStack);

        impl BoundedStackProperties for Lying {
            fn capacity(&self) -> usize {
                self.0.capacity()
            }
            fn count(&self) -> usize {
                self.0.count() + 1
            }
            fn is_destroyed(&self) -> bool {
                false
            }
            fn current_contents(&self) -> Vec<u64> {
                self.0.current_contents()
            }
            fn history(&self) -> &StackHistory {
                self.0.history()
            }
        }

        let mut inner = TestStack::new(2);
        inner.push(9);
        let stack = Lying(inner);

        let checker = BoundedStackPropertyChecker::new(&stack);
        let results = checker.check_all();
        assert!(!result_named(&results, "ContentsMatchCount").holds);
    }

    #[test]
    fn test_empty_failure_on_nonempty_detected() {
        let mut stack = TestStack::new(2);
        stack.push(1);
        stack
            .history
            .record(StackOpKind::Peek, None, Some(StackError::EmptyContainer), 1, 1);

        let checker = BoundedStackPropertyChecker::new(&stack);
        let results = checker.check_all();
        assert!(!result_named(&results, "EmptyFailuresOnlyWhenEmpty").holds);
    }

    #[test]
    fn test_operation_after_destroy_detected() {
        let mut stack = TestStack::new(2);
        stack.destroy();
        stack.history.record(StackOpKind::Push, Some(1), None, 0, 1);

        let checker = BoundedStackPropertyChecker::new(&stack);
        let results = checker.check_all();
        assert!(!result_named(&results, "DestroyedRejectsOperations").holds);
    }

    #[test]
    fn test_history_counters() {
        let mut stack = TestStack::new(1);
        stack.push(1);
        stack.push(2);
        stack.pop();
        stack.pop();

        let history = stack.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history.successes_count(StackOpKind::Push), 1);
        assert_eq!(history.failures_count(StackOpKind::Push, "CapacityExceeded"), 1);
        assert_eq!(history.failures_count(StackOpKind::Pop, "EmptyContainer"), 1);
        assert_eq!(history.operations[3].describe(), "pop -> EmptyContainer");
    }
}
