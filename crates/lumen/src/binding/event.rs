//! Change notifications emitted by a binding.

use std::fmt;
use std::sync::Arc;

use crate::model::AspectSet;

/// An immutable snapshot of a binding's ordered items.
pub type ItemList<T> = Arc<Vec<Arc<T>>>;

/// A change to a binding's ordered items.
///
/// Positions refer to the ordered items: `Removed` and the `from` of `Moved`
/// are positions before the change, `Inserted` and the `to` of `Moved` are
/// positions after it. Replaying events in delivery order with
/// [`apply`](Self::apply) reproduces the binding's items.
pub enum BindingEvent<T> {
    /// `item` was inserted at `index`.
    Inserted { item: Arc<T>, index: usize },
    /// `item` was removed from `index`.
    Removed { item: Arc<T>, index: usize },
    /// `item` moved from `from` to `to`.
    Moved { item: Arc<T>, from: usize, to: usize },
    /// The ordered items were re-derived from scratch.
    Reset { items: ItemList<T> },
    /// The content of an item in the ordered items changed. Its position is
    /// already settled by the time this is delivered.
    ContentChanged { item: Arc<T>, aspects: AspectSet },
}

impl<T> BindingEvent<T> {
    /// Apply this event to a listener-side copy of the ordered items.
    pub fn apply(&self, items: &mut Vec<Arc<T>>) {
        match self {
            Self::Inserted { item, index } => items.insert(*index, item.clone()),
            Self::Removed { index, .. } => {
                items.remove(*index);
            }
            Self::Moved { from, to, .. } => {
                let item = items.remove(*from);
                items.insert(*to, item);
            }
            Self::Reset { items: new_items } => {
                items.clone_from(new_items);
            }
            Self::ContentChanged { .. } => {}
        }
    }

    /// The item this event is about, if it concerns a single item.
    pub fn item(&self) -> Option<&Arc<T>> {
        match self {
            Self::Inserted { item, .. }
            | Self::Removed { item, .. }
            | Self::Moved { item, .. }
            | Self::ContentChanged { item, .. } => Some(item),
            Self::Reset { .. } => None,
        }
    }
}

impl<T> Clone for BindingEvent<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Inserted { item, index } => Self::Inserted {
                item: item.clone(),
                index: *index,
            },
            Self::Removed { item, index } => Self::Removed {
                item: item.clone(),
                index: *index,
            },
            Self::Moved { item, from, to } => Self::Moved {
                item: item.clone(),
                from: *from,
                to: *to,
            },
            Self::Reset { items } => Self::Reset {
                items: items.clone(),
            },
            Self::ContentChanged { item, aspects } => Self::ContentChanged {
                item: item.clone(),
                aspects: aspects.clone(),
            },
        }
    }
}

impl<T> fmt::Debug for BindingEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted { index, .. } => {
                f.debug_struct("Inserted").field("index", index).finish()
            }
            Self::Removed { index, .. } => {
                f.debug_struct("Removed").field("index", index).finish()
            }
            Self::Moved { from, to, .. } => f
                .debug_struct("Moved")
                .field("from", from)
                .field("to", to)
                .finish(),
            Self::Reset { items } => f.debug_struct("Reset").field("len", &items.len()).finish(),
            Self::ContentChanged { aspects, .. } => f
                .debug_struct("ContentChanged")
                .field("aspects", aspects)
                .finish(),
        }
    }
}
