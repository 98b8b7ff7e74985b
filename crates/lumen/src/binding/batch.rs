//! Batched configuration changes.

use std::fmt;

use crate::binding::DataItemsBinding;
use crate::model::Observable;

/// Nesting depth of open change batches.
#[derive(Debug, Default)]
pub(crate) struct BatchState {
    depth: usize,
}

/// What closing a batch level means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchExit {
    /// The outermost batch closed; staged configuration must be flushed.
    Flush,
    /// An inner batch closed.
    Nested,
    /// No batch was open.
    Unbalanced,
}

impl BatchState {
    pub fn is_batching(&self) -> bool {
        self.depth > 0
    }

    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn exit(&mut self) -> BatchExit {
        match self.depth {
            0 => BatchExit::Unbalanced,
            1 => {
                self.depth = 0;
                BatchExit::Flush
            }
            _ => {
                self.depth -= 1;
                BatchExit::Nested
            }
        }
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }
}

/// Scope guard returned by [`DataItemsBinding::changes`].
///
/// Filter and sort assignments made while the guard is alive are applied
/// together when the outermost guard drops, including during unwinding.
#[must_use = "changes are flushed as soon as the guard is dropped"]
pub struct ChangesGuard<'a, T: Observable> {
    binding: &'a DataItemsBinding<T>,
}

impl<'a, T: Observable> ChangesGuard<'a, T> {
    pub(crate) fn new(binding: &'a DataItemsBinding<T>) -> Self {
        binding.begin_changes();
        Self { binding }
    }
}

impl<T: Observable> Drop for ChangesGuard<'_, T> {
    fn drop(&mut self) {
        self.binding.end_changes();
    }
}

impl<T: Observable> fmt::Debug for ChangesGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangesGuard").finish_non_exhaustive()
    }
}
