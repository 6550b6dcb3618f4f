//! Stateright model for the bounded stack.

use bs_core::StackError;
use bs_stack::BoundedStack;
use stateright::Model;

/// Operation chosen by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackAction {
    Push { value: u64 },
    Pop,
    Peek,
    Destroy,
}

/// What the last action did to the stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepOutcome {
    pub action: StackAction,
    pub count_before: usize,
    pub count_after: usize,
    /// Value returned by pop/peek on success
    pub result: Result<Option<u64>, StackError>,
}

/// State of the model: the real stack plus a reference `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackState {
    /// Implementation under test
    pub stack: BoundedStack<u64>,
    /// Reference contents, bottom to top
    pub reference: Vec<u64>,
    /// Whether destroy has been applied
    pub destroyed: bool,
    /// Outcome of the action that produced this state
    pub last: Option<StepOutcome>,
}

impl StackState {
    /// Initial state around an empty stack.
    pub fn new(stack: BoundedStack<u64>) -> Self {
        debug_assert!(stack.is_empty(), "Model must start from an empty stack");

        Self {
            stack,
            reference: Vec::new(),
            destroyed: false,
            last: None,
        }
    }

    // ========== Invariants ==========

    /// `count <= capacity`.
    pub fn count_within_capacity(&self) -> bool {
        self.stack.len() <= self.stack.capacity()
    }

    /// The implementation holds exactly the reference contents.
    pub fn matches_reference(&self) -> bool {
        self.stack.is_destroyed() == self.destroyed
            && self.stack.iter().copied().eq(self.reference.iter().copied())
    }

    /// A push rejected for capacity happened on a full stack and changed nothing.
    pub fn rejected_push_preserves_count(&self) -> bool {
        match &self.last {
            Some(StepOutcome {
                action: StackAction::Push { .. },
                count_before,
                count_after,
                result: Err(StackError::CapacityExceeded { capacity }),
            }) => {
                *capacity == self.stack.capacity()
                    && *count_before == *capacity
                    && count_after == count_before
            }
            _ => true,
        }
    }

    /// Pop/peek fail `EmptyContainer` only on an empty stack.
    pub fn empty_failures_only_when_empty(&self) -> bool {
        match &self.last {
            Some(StepOutcome {
                action: StackAction::Pop | StackAction::Peek,
                count_before,
                count_after,
                result: Err(StackError::EmptyContainer),
            }) => *count_before == 0 && *count_after == 0,
            _ => true,
        }
    }

    /// After destroy, everything except destroy itself fails `InvalidState`.
    pub fn destroyed_rejects_operations(&self) -> bool {
        match &self.last {
            Some(outcome) if self.destroyed => match outcome.action {
                StackAction::Destroy => outcome.result == Ok(None),
                _ => outcome.result == Err(StackError::InvalidState),
            },
            _ => true,
        }
    }

    /// Combined invariant check.
    pub fn invariants_hold(&self) -> bool {
        self.count_within_capacity()
            && self.matches_reference()
            && self.rejected_push_preserves_count()
            && self.empty_failures_only_when_empty()
            && self.destroyed_rejects_operations()
    }

    fn last_rejected_push(&self) -> bool {
        matches!(
            self.last,
            Some(StepOutcome {
                action: StackAction::Push { .. },
                result: Err(StackError::CapacityExceeded { .. }),
                ..
            })
        )
    }

    fn last_pop_on_empty(&self) -> bool {
        matches!(
            self.last,
            Some(StepOutcome {
                action: StackAction::Pop,
                result: Err(StackError::EmptyContainer),
                ..
            })
        )
    }
}

/// Model for exhaustive checking.
pub struct StackModel {
    pub capacity: usize,
    /// Values a push may carry
    pub values: Vec<u64>,
    /// Whether the checker may destroy the stack
    pub destroy_enabled: bool,
}

impl StackModel {
    /// Create a new model with given parameters.
    pub fn new(capacity: usize, values: Vec<u64>) -> Self {
        debug_assert!(capacity > 0, "Capacity must be positive");
        debug_assert!(!values.is_empty(), "Need at least one value to push");

        Self {
            capacity,
            values,
            destroy_enabled: false,
        }
    }

    /// Also explore destroy and every operation after it.
    #[must_use]
    pub fn with_destroy(mut self) -> Self {
        self.destroy_enabled = true;
        self
    }

    fn apply(state: &mut StackState, action: StackAction) -> Result<Option<u64>, StackError> {
        match action {
            StackAction::Push { value } => state
                .stack
                .push(value)
                .map(|()| None)
                .map_err(StackError::from),
            StackAction::Pop => state.stack.pop().map(Some),
            StackAction::Peek => state.stack.peek().map(|v| Some(*v)),
            StackAction::Destroy => {
                state.stack.destroy();
                Ok(None)
            }
        }
    }

    fn apply_reference(&self, state: &mut StackState, action: StackAction) {
        if state.destroyed {
            return;
        }
        match action {
            StackAction::Push { value } => {
                if state.reference.len() < self.capacity {
                    state.reference.push(value);
                }
            }
            StackAction::Pop => {
                state.reference.pop();
            }
            StackAction::Peek => {}
            StackAction::Destroy => {
                state.reference.clear();
                state.destroyed = true;
            }
        }
    }
}

impl Model for StackModel {
    type State = StackState;
    type Action = StackAction;

    fn init_states(&self) -> Vec<Self::State> {
        BoundedStack::new(self.capacity)
            .map(StackState::new)
            .into_iter()
            .collect()
    }

    fn actions(&self, state: &Self::State, actions: &mut Vec<Self::Action>) {
        if state.destroyed {
            // One probe per operation kind is enough; the state cannot change.
            actions.push(StackAction::Push {
                value: self.values[0],
            });
            actions.push(StackAction::Pop);
            actions.push(StackAction::Peek);
            actions.push(StackAction::Destroy);
            return;
        }

        for &value in &self.values {
            actions.push(StackAction::Push { value });
        }
        actions.push(StackAction::Pop);
        actions.push(StackAction::Peek);
        if self.destroy_enabled {
            actions.push(StackAction::Destroy);
        }
    }

    fn next_state(&self, state: &Self::State, action: Self::Action) -> Option<Self::State> {
        let mut next = state.clone();

        let count_before = next.stack.len();
        let result = Self::apply(&mut next, action);
        self.apply_reference(&mut next, action);

        next.last = Some(StepOutcome {
            action,
            count_before,
            count_after: next.stack.len(),
            result,
        });

        Some(next)
    }

    fn properties(&self) -> Vec<stateright::Property<Self>> {
        vec![
            stateright::Property::always("CountWithinCapacity", |_: &Self, state: &StackState| {
                state.count_within_capacity()
            }),
            stateright::Property::always("MatchesReference", |_: &Self, state: &StackState| {
                state.matches_reference()
            }),
            stateright::Property::always(
                "RejectedPushPreservesCount",
                |_: &Self, state: &StackState| state.rejected_push_preserves_count(),
            ),
            stateright::Property::always(
                "EmptyFailuresOnlyWhenEmpty",
                |_: &Self, state: &StackState| state.empty_failures_only_when_empty(),
            ),
            stateright::Property::always(
                "DestroyedRejectsOperations",
                |_: &Self, state: &StackState| state.destroyed_rejects_operations(),
            ),
            stateright::Property::sometimes("FullReached", |_: &Self, state: &StackState| {
                state.stack.is_full()
            }),
            stateright::Property::sometimes("PushRejected", |_: &Self, state: &StackState| {
                state.last_rejected_push()
            }),
            stateright::Property::sometimes("PopOnEmpty", |_: &Self, state: &StackState| {
                state.last_pop_on_empty()
            }),
        ]
    }
}
