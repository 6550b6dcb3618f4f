//! Cross-thread access to a bounded stack.
//!
//! `BoundedStack` has no internal locking. `SharedStack` pairs it with a
//! mutex: every operation acquires the lock, applies exactly one stack
//! operation and releases it when the guard drops.
//!
//! A poisoned lock is recovered rather than propagated. Each stack operation
//! leaves the stack consistent before it can panic, so the data behind a
//! poisoned lock still satisfies every invariant.

use std::sync::PoisonError;

use bs_core::{PushError, StackError};

use crate::bounded_stack::BoundedStack;
use crate::sync::{Arc, Mutex, MutexGuard};

/// Reference-counted, mutex-guarded [`BoundedStack`].
pub struct SharedStack<T> {
    inner: Arc<Mutex<BoundedStack<T>>>,
}

impl<T> Clone for SharedStack<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedStack<T> {
    /// Create a shared stack with room for `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self, StackError> {
        Ok(Self::from_stack(BoundedStack::new(capacity)?))
    }

    /// Share an existing stack.
    #[must_use]
    pub fn from_stack(stack: BoundedStack<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(stack)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoundedStack<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the stack.
    ///
    /// The lock is held for the duration of `f` only. Use this to make a
    /// compound operation (e.g. check-then-push) atomic.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut BoundedStack<T>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn push(&self, value: T) -> Result<(), PushError<T>> {
        self.lock().push(value)
    }

    pub fn pop(&self) -> Result<T, StackError> {
        self.lock().pop()
    }

    /// Copy of the top element.
    pub fn peek_cloned(&self) -> Result<T, StackError>
    where
        T: Clone,
    {
        self.lock().peek().cloned()
    }

    pub fn destroy(&self) {
        self.lock().destroy();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lock().is_destroyed()
    }
}


#[cfg(all(test, loom))]
mod loom_tests {
    use loom::thread;

    use super::*;

    #[test]
    fn loom_push_and_pop_race() {
        loom::model(|| {
            let stack = SharedStack::new(2).unwrap();

            let pusher = {
                let stack = stack.clone();
                thread::spawn(move || stack.push(1).is_ok())
            };
            let popper = {
                let stack = stack.clone();
                thread::spawn(move || stack.pop().ok())
            };

            assert!(pusher.join().unwrap());
            match popper.join().unwrap() {
                Some(v) => {
                    assert_eq!(v, 1);
                    assert_eq!(stack.len(), 0);
                }
                None => assert_eq!(stack.len(), 1),
            }
        });
    }

    #[test]
    fn loom_full_stack_admits_one_pusher() {
        loom::model(|| {
            let stack = SharedStack::new(1).unwrap();

            let handles: Vec<_> = (0..2_u64)
                .map(|v| {
                    let stack = stack.clone();
                    thread::spawn(move || stack.push(v).map_err(PushError::into_value))
                })
                .collect();

            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let accepted = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(accepted, 1);

            let returned = results.iter().find_map(|r| r.err()).unwrap();
            let kept = stack.pop().unwrap();
            assert_ne!(returned, kept);
            assert_eq!(returned + kept, 1);
        });
    }
}
