//! Fixed-capacity LIFO container.
//!
//! # Invariants
//!
//! - `capacity` is positive and never changes after creation
//! - `0 <= len() <= capacity`
//! - slots `[0, len())` hold the elements, bottom to top
//!
//! The backing storage is reserved once at creation and never grows, so a
//! push on a non-full stack never reallocates.
//!
//! # Lifecycle
//!
//! [`BoundedStack::destroy`] releases the storage early. It is idempotent;
//! every other operation on a destroyed stack fails with
//! [`StackError::InvalidState`]. Dropping the stack releases the storage as
//! well, so calling `destroy` is only needed when the owner wants the memory
//! back while keeping the handle.

use std::fmt;

use bs_core::{PushError, StackError};

/// A stack that holds at most `capacity` elements.
#[derive(PartialEq, Eq, Hash)]
pub struct BoundedStack<T> {
    capacity: usize,
    /// `None` once destroyed.
    storage: Option<Vec<T>>,
}

impl<T> BoundedStack<T> {
    /// Create an empty stack with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// [`StackError::InvalidArgument`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, StackError> {
        if capacity == 0 {
            return Err(StackError::InvalidArgument { capacity });
        }

        Ok(Self {
            capacity,
            storage: Some(Vec::with_capacity(capacity)),
        })
    }

    /// Push `value` onto the top of the stack.
    ///
    /// # Errors
    ///
    /// Hands `value` back inside a [`PushError`] when the stack is full
    /// ([`StackError::CapacityExceeded`]) or destroyed. The stack is not
    /// modified.
    pub fn push(&mut self, value: T) -> Result<(), PushError<T>> {
        let capacity = self.capacity;
        let Some(items) = self.storage.as_mut() else {
            return Err(PushError::new(value, StackError::InvalidState));
        };

        if items.len() == capacity {
            return Err(PushError::new(
                value,
                StackError::CapacityExceeded { capacity },
            ));
        }

        items.push(value);
        debug_assert!(items.len() <= capacity);
        Ok(())
    }

    /// Remove and return the top element.
    ///
    /// # Errors
    ///
    /// [`StackError::EmptyContainer`] on an empty stack,
    /// [`StackError::InvalidState`] on a destroyed one.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.storage
            .as_mut()
            .ok_or(StackError::InvalidState)?
            .pop()
            .ok_or(StackError::EmptyContainer)
    }

    /// Borrow the top element without removing it.
    ///
    /// # Errors
    ///
    /// Same as [`BoundedStack::pop`].
    pub fn peek(&self) -> Result<&T, StackError> {
        self.as_slice()?.last().ok_or(StackError::EmptyContainer)
    }

    /// Mutably borrow the top element.
    ///
    /// # Errors
    ///
    /// Same as [`BoundedStack::pop`].
    pub fn peek_mut(&mut self) -> Result<&mut T, StackError> {
        self.storage
            .as_mut()
            .ok_or(StackError::InvalidState)?
            .last_mut()
            .ok_or(StackError::EmptyContainer)
    }

    /// Release the backing storage. Calling it again is a no-op.
    pub fn destroy(&mut self) {
        self.storage = None;
    }

    /// Drop every element but keep the storage.
    ///
    /// # Errors
    ///
    /// [`StackError::InvalidState`] on a destroyed stack.
    pub fn clear(&mut self) -> Result<(), StackError> {
        self.storage
            .as_mut()
            .ok_or(StackError::InvalidState)?
            .clear();
        Ok(())
    }

    /// Elements bottom to top.
    ///
    /// # Errors
    ///
    /// [`StackError::InvalidState`] on a destroyed stack.
    pub fn as_slice(&self) -> Result<&[T], StackError> {
        self.storage.as_deref().ok_or(StackError::InvalidState)
    }

    /// Iterate bottom to top. Empty for a destroyed stack.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.as_deref().unwrap_or(&[]).iter()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements; zero once destroyed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.storage
            .as_ref()
            .map_or(false, |items| items.len() == self.capacity)
    }

    /// Pushes left before the stack is full; zero once destroyed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.storage
            .as_ref()
            .map_or(0, |items| self.capacity - items.len())
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.storage.is_none()
    }
}

impl<T: Clone> Clone for BoundedStack<T> {
    fn clone(&self) -> Self {
        // Reserve the full capacity again; `Vec::clone` would only keep `len`.
        let storage = self.storage.as_ref().map(|items| {
            let mut copy = Vec::with_capacity(self.capacity);
            copy.extend_from_slice(items);
            copy
        });

        Self {
            capacity: self.capacity,
            storage,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.storage {
            Some(items) => f
                .debug_struct("BoundedStack")
                .field("capacity", &self.capacity)
                .field("items", items)
                .finish(),
            None => f
                .debug_struct("BoundedStack")
                .field("capacity", &self.capacity)
                .field("destroyed", &true)
                .finish(),
        }
    }
}

impl<'a, T> IntoIterator for &'a BoundedStack<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
