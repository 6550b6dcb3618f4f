//! Error taxonomy for bounded stack operations.
//!
//! Every failure is a contract violation reported to the immediate caller.
//! None of them are fatal and none of them are worth retrying.

use std::fmt;

use thiserror::Error;

/// Errors returned by bounded stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StackError {
    /// Construction parameters were rejected (capacity must be positive).
    #[error("invalid argument: capacity must be positive, got {capacity}")]
    InvalidArgument { capacity: usize },

    /// Push on a stack that already holds `capacity` elements.
    #[error("capacity exceeded: stack is full at {capacity} elements")]
    CapacityExceeded { capacity: usize },

    /// Pop or peek on a stack with no elements.
    #[error("empty container: no element to pop or peek")]
    EmptyContainer,

    /// Operation on a stack whose storage has been released.
    #[error("invalid state: stack has been destroyed")]
    InvalidState,
}

impl StackError {
    /// Short stable name, used in histories and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StackError::InvalidArgument { .. } => "InvalidArgument",
            StackError::CapacityExceeded { .. } => "CapacityExceeded",
            StackError::EmptyContainer => "EmptyContainer",
            StackError::InvalidState => "InvalidState",
        }
    }
}

/// A rejected push.
///
/// Hands the value back so a failed push never drops caller data.
#[derive(Clone, PartialEq, Eq, Error)]
#[error("push rejected: {error}")]
pub struct PushError<T> {
    value: T,
    #[source]
    error: StackError,
}

impl<T> PushError<T> {
    /// Wrap a rejected value with the reason it was rejected.
    #[must_use]
    pub fn new(value: T, error: StackError) -> Self {
        debug_assert!(
            matches!(
                error,
                StackError::CapacityExceeded { .. } | StackError::InvalidState
            ),
            "push can only fail on a full or destroyed stack"
        );
        Self { value, error }
    }

    /// The reason the push was rejected.
    #[must_use]
    pub fn error(&self) -> StackError {
        self.error
    }

    /// Borrow the rejected value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take back the rejected value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

// Manual impl so `T` does not need to be `Debug` for the error to be printable.
impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> From<PushError<T>> for StackError {
    fn from(err: PushError<T>) -> Self {
        err.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StackError::InvalidArgument { capacity: 0 };
        assert!(err.to_string().contains("capacity must be positive"));

        let err = StackError::CapacityExceeded { capacity: 3 };
        assert!(err.to_string().contains("3"));

        assert!(StackError::EmptyContainer.to_string().contains("empty"));
        assert!(StackError::InvalidState.to_string().contains("destroyed"));
    }

    #[test]
    fn test_push_error_returns_value() {
        let err = PushError::new(String::from("payload"), StackError::CapacityExceeded { capacity: 1 });
        assert_eq!(err.error(), StackError::CapacityExceeded { capacity: 1 });
        assert_eq!(err.value(), "payload");
        assert_eq!(err.into_value(), "payload");
    }

    #[test]
    fn test_push_error_display_and_source() {
        use std::error::Error as _;

        struct Opaque;

        let err = PushError::new(Opaque, StackError::CapacityExceeded { capacity: 2 });
        assert_eq!(
            err.to_string(),
            "push rejected: capacity exceeded: stack is full at 2 elements"
        );
        assert!(format!("{:?}", err).contains("CapacityExceeded"));

        let source = err.source().unwrap();
        assert_eq!(
            source.downcast_ref::<StackError>(),
            Some(&StackError::CapacityExceeded { capacity: 2 })
        );
    }

    #[test]
    fn test_push_error_converts_to_stack_error() {
        fn push_then_convert() -> Result<(), StackError> {
            let rejected: Result<(), PushError<u64>> =
                Err(PushError::new(7, StackError::InvalidState));
            rejected?;
            Ok(())
        }

        assert_eq!(push_then_convert(), Err(StackError::InvalidState));
    }

    #[test]
    fn test_push_error_source_is_stack_error() {
        use std::error::Error;

        let err = PushError::new((), StackError::CapacityExceeded { capacity: 2 });
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), StackError::CapacityExceeded { capacity: 2 }.to_string());
        assert!(err.to_string().starts_with("push rejected"));
    }

    #[test]
    fn test_names_are_stable() {
        assert_eq!(StackError::EmptyContainer.name(), "EmptyContainer");
        assert_eq!(StackError::CapacityExceeded { capacity: 9 }.name(), "CapacityExceeded");
    }
}
