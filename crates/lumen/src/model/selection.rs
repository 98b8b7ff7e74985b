//! The currently selected data item.

use std::sync::Arc;

use lumen_core::Signal;
use parking_lot::RwLock;

use crate::logging::targets;
use crate::model::data_item::DataItem;

/// Tracks which data item is selected and announces selection changes.
///
/// Selection is compared by identity, so re-selecting the current item does
/// not emit.
#[derive(Default)]
pub struct SelectedDataItem {
    current: RwLock<Option<Arc<DataItem>>>,
    changed: Signal<Option<Arc<DataItem>>>,
}

impl SelectedDataItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected item, if any.
    pub fn get(&self) -> Option<Arc<DataItem>> {
        self.current.read().clone()
    }

    /// Select `item`, emitting [`changed`](Self::changed) if the selection
    /// is a different item.
    pub fn set(&self, item: Option<Arc<DataItem>>) {
        {
            let mut current = self.current.write();
            let same = match (current.as_ref(), item.as_ref()) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if same {
                return;
            }
            *current = item.clone();
        }
        tracing::debug!(target: targets::MODEL, selected = item.is_some(), "selection changed");
        self.changed.emit(item);
    }

    /// Signal emitted with the new selection.
    pub fn changed(&self) -> &Signal<Option<Arc<DataItem>>> {
        &self.changed
    }
}
