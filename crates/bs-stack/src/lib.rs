//! # bs-stack
//!
//! A fixed-capacity, index-based LIFO container.
//!
//! - [`BoundedStack`]: the container; capacity is fixed at creation and
//!   every overflow or underflow is reported as a [`StackError`]
//! - [`RecordedStack`]: a `BoundedStack<u64>` that records its history and
//!   implements [`bs_core::BoundedStackProperties`] for DST
//! - [`SharedStack`]: a mutex-guarded handle for use across threads
//!   (loom tests under `#[cfg(loom)]`)
//!
//! ```rust
//! use bs_stack::{BoundedStack, StackError};
//!
//! let mut stack = BoundedStack::new(2)?;
//! stack.push(1)?;
//! stack.push(2)?;
//! assert_eq!(stack.push(3).unwrap_err().into_value(), 3);
//! assert_eq!(stack.pop()?, 2);
//! assert_eq!(*stack.peek()?, 1);
//! # Ok::<(), StackError>(())
//! ```

pub mod bounded_stack;
pub mod recorded;
pub mod shared;
mod sync;

pub use bounded_stack::BoundedStack;
pub use bs_core::{PushError, StackError};
pub use recorded::RecordedStack;
pub use shared::SharedStack;
