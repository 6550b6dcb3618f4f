//! History-recording stack for simulation testing.

use bs_core::{BoundedStackProperties, StackError, StackHistory, StackOp, StackOpKind};

use crate::bounded_stack::BoundedStack;

/// A `BoundedStack<u64>` that records every operation applied to it.
///
/// The recorded history starts at creation, which is what the
/// [`bs_core::BoundedStackPropertyChecker`] needs to replay it.
///
/// ```rust
/// use bs_core::{BoundedStackPropertyChecker, PropertyChecker};
/// use bs_stack::RecordedStack;
///
/// let mut stack = RecordedStack::new(2).unwrap();
/// let _ = stack.push(1);
/// let _ = stack.push(2);
/// let _ = stack.push(3);
/// let _ = stack.pop();
///
/// assert!(BoundedStackPropertyChecker::new(&stack).all_hold());
/// ```
#[derive(Debug, Clone)]
pub struct RecordedStack {
    stack: BoundedStack<u64>,
    history: StackHistory,
}

impl RecordedStack {
    pub fn new(capacity: usize) -> Result<Self, StackError> {
        Ok(Self {
            stack: BoundedStack::new(capacity)?,
            history: StackHistory::new(),
        })
    }

    pub fn push(&mut self, value: u64) -> Result<(), StackError> {
        let count_before = self.stack.len();
        let result = self.stack.push(value).map_err(StackError::from);
        self.history.record(
            StackOpKind::Push,
            Some(value),
            result.err(),
            count_before,
            self.stack.len(),
        );
        result
    }

    pub fn pop(&mut self) -> Result<u64, StackError> {
        let count_before = self.stack.len();
        let result = self.stack.pop();
        self.history.record(
            StackOpKind::Pop,
            result.ok(),
            result.err(),
            count_before,
            self.stack.len(),
        );
        result
    }

    /// Takes `&mut self` because the peek is recorded.
    pub fn peek(&mut self) -> Result<u64, StackError> {
        let count_before = self.stack.len();
        let result = self.stack.peek().copied();
        self.history.record(
            StackOpKind::Peek,
            result.ok(),
            result.err(),
            count_before,
            self.stack.len(),
        );
        result
    }

    pub fn destroy(&mut self) {
        let count_before = self.stack.len();
        self.stack.destroy();
        self.history
            .record(StackOpKind::Destroy, None, None, count_before, 0);
    }

    /// Apply a generated operation.
    ///
    /// Returns the value produced by pop/peek, `None` for push and destroy.
    pub fn apply(&mut self, op: StackOp) -> Result<Option<u64>, StackError> {
        match op {
            StackOp::Push(value) => self.push(value).map(|()| None),
            StackOp::Pop => self.pop().map(Some),
            StackOp::Peek => self.peek().map(Some),
            StackOp::Destroy => {
                self.destroy();
                Ok(None)
            }
        }
    }

    /// The stack being recorded.
    #[must_use]
    pub fn inner(&self) -> &BoundedStack<u64> {
        &self.stack
    }

    #[must_use]
    pub fn into_parts(self) -> (BoundedStack<u64>, StackHistory) {
        (self.stack, self.history)
    }
}

impl BoundedStackProperties for RecordedStack {
    fn capacity(&self) -> usize {
        self.stack.capacity()
    }

    fn count(&self) -> usize {
        self.stack.len()
    }

    fn is_destroyed(&self) -> bool {
        self.stack.is_destroyed()
    }

    fn current_contents(&self) -> Vec<u64> {
        self.stack.iter().copied().collect()
    }

    fn history(&self) -> &StackHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use bs_core::{BoundedStackPropertyChecker, PropertyChecker};

    use super::*;

    #[test]
    fn test_records_every_operation() {
        let mut stack = RecordedStack::new(1).unwrap();
        assert!(stack.push(4).is_ok());
        assert_eq!(
            stack.push(5),
            Err(StackError::CapacityExceeded { capacity: 1 })
        );
        assert_eq!(stack.peek(), Ok(4));
        assert_eq!(stack.pop(), Ok(4));
        assert_eq!(stack.pop(), Err(StackError::EmptyContainer));
        stack.destroy();

        let ops = &stack.history().operations;
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[1].describe(), "push 5 -> CapacityExceeded");
        assert_eq!(ops[1].count_before, 1);
        assert_eq!(ops[1].count_after, 1);
        assert_eq!(ops[2].value, Some(4));
        assert_eq!(ops[4].error, Some(StackError::EmptyContainer));
        assert_eq!(ops[5].kind, StackOpKind::Destroy);
        assert_eq!(ops[5].step, 6);
    }

    #[test]
    fn test_apply_maps_outputs() {
        let mut stack = RecordedStack::new(2).unwrap();
        assert_eq!(stack.apply(StackOp::Push(8)), Ok(None));
        assert_eq!(stack.apply(StackOp::Peek), Ok(Some(8)));
        assert_eq!(stack.apply(StackOp::Pop), Ok(Some(8)));
        assert_eq!(stack.apply(StackOp::Pop), Err(StackError::EmptyContainer));
        assert_eq!(stack.apply(StackOp::Destroy), Ok(None));
        assert_eq!(stack.apply(StackOp::Push(1)), Err(StackError::InvalidState));
    }

    #[test]
    fn test_properties_hold_after_misuse() {
        let mut stack = RecordedStack::new(2).unwrap();
        let _ = stack.pop();
        let _ = stack.push(1);
        let _ = stack.push(1);
        let _ = stack.push(1);
        let _ = stack.peek();
        let _ = stack.pop();
        stack.destroy();
        let _ = stack.peek();
        stack.destroy();

        let checker = BoundedStackPropertyChecker::new(&stack);
        let summary = checker.summary();
        assert_eq!(summary.failed, 0, "{}", summary.format_report());
    }

    #[test]
    fn test_into_parts() {
        let mut stack = RecordedStack::new(3).unwrap();
        stack.push(1).unwrap();
        let (inner, history) = stack.into_parts();
        assert_eq!(inner.len(), 1);
        assert_eq!(history.len(), 1);
    }
}
