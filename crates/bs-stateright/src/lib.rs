//! # bs-stateright
//!
//! Exhaustive model checking of the bounded stack.
//!
//! The model drives the real [`bs_stack::BoundedStack`] through every
//! reachable sequence of operations over a small value domain and checks it
//! against a plain `Vec` reference after each step.

pub mod bounded_stack;

pub use bounded_stack::{StackAction, StackModel, StackState, StepOutcome};
