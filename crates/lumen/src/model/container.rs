//! An ordered, observable collection of items.

use std::fmt;
use std::sync::Arc;

use lumen_core::{Signal, Subscription};
use parking_lot::Mutex;

use crate::logging::targets;

/// A mutation of an [`ItemsContainer`].
pub enum ContainerEvent<T> {
    /// `item` now sits at `index`.
    Inserted {
        item: Arc<T>,
        index: usize,
        is_move: bool,
    },
    /// `item` was taken out of `index`.
    Removed {
        item: Arc<T>,
        index: usize,
        is_move: bool,
    },
}

impl<T> Clone for ContainerEvent<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Inserted {
                item,
                index,
                is_move,
            } => Self::Inserted {
                item: item.clone(),
                index: *index,
                is_move: *is_move,
            },
            Self::Removed {
                item,
                index,
                is_move,
            } => Self::Removed {
                item: item.clone(),
                index: *index,
                is_move: *is_move,
            },
        }
    }
}

impl<T> fmt::Debug for ContainerEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted { index, is_move, .. } => f
                .debug_struct("Inserted")
                .field("index", index)
                .field("is_move", is_move)
                .finish(),
            Self::Removed { index, is_move, .. } => f
                .debug_struct("Removed")
                .field("index", index)
                .field("is_move", is_move)
                .finish(),
        }
    }
}

/// An ordered source collection of items, compared by identity.
///
/// Mutations are applied under the container lock and announced after it is
/// released. Announcements reflect the order mutations were applied as long
/// as the container has a single writer at a time, which is how a document
/// model drives it from its owning thread.
pub struct ItemsContainer<T> {
    items: Mutex<Vec<Arc<T>>>,
    events: Signal<ContainerEvent<T>>,
}

impl<T: Send + Sync + 'static> Default for ItemsContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> ItemsContainer<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            events: Signal::new(),
        }
    }

    /// Snapshot of the items.
    pub fn items(&self) -> Vec<Arc<T>> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Position of `item`, by identity.
    pub fn index_of(&self, item: &Arc<T>) -> Option<usize> {
        self.items.lock().iter().position(|i| Arc::ptr_eq(i, item))
    }

    /// Insert `item` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&self, index: usize, item: Arc<T>) {
        let slots = {
            let mut items = self.items.lock();
            assert!(
                index <= items.len(),
                "insert index {index} out of range for container of length {}",
                items.len()
            );
            items.insert(index, item.clone());
            self.events.slots()
        };
        self.deliver(
            &slots,
            ContainerEvent::Inserted {
                item,
                index,
                is_move: false,
            },
        );
    }

    /// Append `item`.
    pub fn push(&self, item: Arc<T>) {
        let index = self.len();
        self.insert(index, item);
    }

    /// Remove `item`, returning its former position.
    pub fn remove(&self, item: &Arc<T>) -> Option<usize> {
        let (index, slots) = {
            let mut items = self.items.lock();
            let index = items.iter().position(|i| Arc::ptr_eq(i, item))?;
            items.remove(index);
            (index, self.events.slots())
        };
        self.deliver(
            &slots,
            ContainerEvent::Removed {
                item: item.clone(),
                index,
                is_move: false,
            },
        );
        Some(index)
    }

    /// Move `item` to `to`, announced as a removal followed by an insertion
    /// with `is_move` set. Returns `false` if the item is not present.
    ///
    /// # Panics
    ///
    /// Panics if `to` is not a valid position once the item is taken out.
    pub fn move_item(&self, item: &Arc<T>, to: usize) -> bool {
        let (from, slots) = {
            let mut items = self.items.lock();
            let Some(from) = items.iter().position(|i| Arc::ptr_eq(i, item)) else {
                return false;
            };
            assert!(
                to < items.len(),
                "move target {to} out of range for container of length {}",
                items.len()
            );
            let moved = items.remove(from);
            items.insert(to, moved);
            (from, self.events.slots())
        };
        tracing::trace!(target: targets::MODEL, from, to, "moving container item");
        self.deliver(
            &slots,
            ContainerEvent::Removed {
                item: item.clone(),
                index: from,
                is_move: true,
            },
        );
        self.deliver(
            &slots,
            ContainerEvent::Inserted {
                item: item.clone(),
                index: to,
                is_move: true,
            },
        );
        true
    }

    /// Signal announcing every mutation.
    pub fn events(&self) -> &Signal<ContainerEvent<T>> {
        &self.events
    }

    /// Atomically snapshot the items and subscribe to subsequent mutations.
    ///
    /// Every mutation is either part of the returned snapshot or delivered
    /// to `slot`, never both.
    pub fn attach<F>(&self, slot: F) -> (Vec<Arc<T>>, Subscription)
    where
        F: Fn(&ContainerEvent<T>) + Send + Sync + 'static,
    {
        let items = self.items.lock();
        let subscription = self.events.subscribe(slot);
        (items.clone(), subscription)
    }

    fn deliver(&self, slots: &[lumen_core::Slot<ContainerEvent<T>>], event: ContainerEvent<T>) {
        for slot in slots {
            slot(&event);
        }
    }
}

impl<T> fmt::Debug for ItemsContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemsContainer")
            .field("len", &self.items.lock().len())
            .finish()
    }
}
