//! Invariant traits for verified data structures.
//!
//! Each module defines the properties that implementations must satisfy.

pub mod bounded_stack;

pub use bounded_stack::{
    BoundedStackProperties, BoundedStackPropertyChecker, StackHistory, StackOp, StackOpKind,
    StackOperation,
};
