//! Random operation sequences for the bounded stack.

use bs_core::StackOp;

use crate::error::DstError;
use crate::random::SimRng;

/// Shape of a generated workload.
///
/// Weights are relative; a zero weight disables that operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    /// Operations per generated workload
    pub operations_count: usize,
    pub push_weight: u32,
    pub pop_weight: u32,
    pub peek_weight: u32,
    pub destroy_weight: u32,
    /// Pushed values are drawn from `0..=value_max`.
    ///
    /// A small range produces repeated values, which exercises the
    /// multiset accounting in the element-loss check.
    pub value_max: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            operations_count: 64,
            push_weight: 5,
            pop_weight: 4,
            peek_weight: 2,
            destroy_weight: 0,
            value_max: 1_000,
        }
    }
}

impl WorkloadConfig {
    /// Mostly pushes, so runs spend time at capacity.
    #[must_use]
    pub fn push_heavy() -> Self {
        Self {
            push_weight: 8,
            pop_weight: 2,
            peek_weight: 1,
            ..Default::default()
        }
    }

    /// Mostly pops, so runs spend time empty.
    #[must_use]
    pub fn pop_heavy() -> Self {
        Self {
            push_weight: 2,
            pop_weight: 8,
            peek_weight: 2,
            ..Default::default()
        }
    }

    /// Occasionally destroys the stack mid-run.
    #[must_use]
    pub fn with_destroy() -> Self {
        Self {
            destroy_weight: 1,
            ..Default::default()
        }
    }

    /// Reject configurations that cannot produce a workload.
    pub fn validate(&self) -> Result<(), DstError> {
        if self.operations_count == 0 {
            return Err(DstError::EmptyWorkload);
        }
        if self.weights().iter().all(|w| *w == 0) {
            return Err(DstError::NoOperationWeights);
        }
        Ok(())
    }

    fn weights(&self) -> [u32; 4] {
        [
            self.push_weight,
            self.pop_weight,
            self.peek_weight,
            self.destroy_weight,
        ]
    }

    /// Draw a single operation.
    pub fn next_op(&self, rng: &mut SimRng) -> Result<StackOp, DstError> {
        let index = rng
            .choose_weighted(&self.weights())
            .ok_or(DstError::NoOperationWeights)?;

        let op = match index {
            0 => StackOp::Push(rng.gen_range(0..=self.value_max)),
            1 => StackOp::Pop,
            2 => StackOp::Peek,
            _ => StackOp::Destroy,
        };
        Ok(op)
    }

    /// Generate a full workload.
    pub fn generate(&self, rng: &mut SimRng) -> Result<Vec<StackOp>, DstError> {
        self.validate()?;

        let mut ops = Vec::with_capacity(self.operations_count);
        for _ in 0..self.operations_count {
            ops.push(self.next_op(rng)?);
        }
        Ok(ops)
    }
}
