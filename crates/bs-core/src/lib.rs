//! # bs-core
//!
//! Core types shared by every crate in the bounded stack workspace:
//!
//! - [`StackError`] and [`PushError`]: the error taxonomy of the container
//! - [`PropertyResult`] / [`PropertyChecker`]: named, individually reportable invariants
//! - [`Counterexample`]: reproduction data (DST seed and state snapshots)
//! - [`invariants`]: the properties any bounded stack must satisfy

pub mod counterexample;
pub mod error;
pub mod invariants;
pub mod property;

pub use counterexample::{Counterexample, StateSnapshot};
pub use error::{PushError, StackError};
pub use invariants::{
    BoundedStackProperties, BoundedStackPropertyChecker, StackHistory, StackOp, StackOpKind,
    StackOperation,
};
pub use property::{PropertyChecker, PropertyResult, PropertySummary};
