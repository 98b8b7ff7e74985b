//! The filtered, sorted projection of a binding's master items.
//!
//! `Projection` holds no locks and emits nothing; it applies one mutation at
//! a time and reports the resulting [`BindingEvent`]. The owning binding
//! serializes access and queues the events.
//!
//! # Ordering
//!
//! Ordered items follow a strict total order: the comparator (reversed if
//! requested) and then the item's position in the master items. Incremental
//! updates find positions by binary search over this order, and rebuilds
//! stable-sort the filtered master items with the same comparator, so both
//! paths always agree.

use std::cmp::Ordering;
use std::sync::Arc;

use lumen_core::PerfSpan;

use crate::binding::event::{BindingEvent, ItemList};
use crate::logging::span_names;

/// Decides whether an item is part of the ordered items.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Orders two items. Must be a total order.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Filter and sort configuration.
pub(crate) struct Config<T> {
    pub filter: Option<Predicate<T>>,
    pub comparator: Option<Comparator<T>>,
    pub reverse: bool,
}

impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            comparator: self.comparator.clone(),
            reverse: self.reverse,
        }
    }
}

impl<T> Default for Config<T> {
    fn default() -> Self {
        Self {
            filter: None,
            comparator: None,
            reverse: false,
        }
    }
}

pub(crate) struct Projection<T> {
    master: Vec<Arc<T>>,
    ordered: ItemList<T>,
    config: Config<T>,
    /// Configuration waiting for [`commit`](Self::commit).
    staged: Option<Config<T>>,
}

impl<T> Projection<T> {
    pub fn new() -> Self {
        Self {
            master: Vec::new(),
            ordered: Arc::new(Vec::new()),
            config: Config::default(),
            staged: None,
        }
    }

    pub fn master(&self) -> &[Arc<T>] {
        &self.master
    }

    pub fn ordered(&self) -> &ItemList<T> {
        &self.ordered
    }

    pub fn master_position(&self, item: &Arc<T>) -> Option<usize> {
        self.master.iter().position(|m| Arc::ptr_eq(m, item))
    }

    pub fn ordered_position(&self, item: &Arc<T>) -> Option<usize> {
        self.ordered.iter().position(|o| Arc::ptr_eq(o, item))
    }

    fn passes(&self, item: &T) -> bool {
        self.config.filter.as_ref().is_none_or(|filter| filter(item))
    }

    /// Comparator order, reversed if configured. Without a comparator every
    /// pair is equal and `reverse` has no effect.
    fn key_order(&self, a: &T, b: &T) -> Ordering {
        match &self.config.comparator {
            Some(comparator) => {
                let order = comparator(a, b);
                if self.config.reverse {
                    order.reverse()
                } else {
                    order
                }
            }
            None => Ordering::Equal,
        }
    }

    /// Position at which `item` belongs among the ordered items, which must
    /// not contain it.
    fn target_position(&self, item: &Arc<T>, master_position: usize) -> usize {
        self.ordered.partition_point(|probe| {
            let order = self.key_order(probe, item).then_with(|| {
                let probe_position = self.master_position(probe).unwrap_or(usize::MAX);
                probe_position.cmp(&master_position)
            });
            order == Ordering::Less
        })
    }

    /// Record `item` at `index` in the master items.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the number of master items.
    pub fn insert(&mut self, item: Arc<T>, index: usize) -> Option<BindingEvent<T>> {
        assert!(
            index <= self.master.len(),
            "insert index {index} out of range for binding with {} items",
            self.master.len()
        );
        self.master.insert(index, item.clone());
        if !self.passes(&item) {
            return None;
        }
        let position = self.target_position(&item, index);
        Arc::make_mut(&mut self.ordered).insert(position, item.clone());
        Some(BindingEvent::Inserted {
            item,
            index: position,
        })
    }

    /// Remove the master item at `master_position`.
    pub fn remove_at(&mut self, master_position: usize) -> Option<BindingEvent<T>> {
        let item = self.master.remove(master_position);
        let position = self.ordered_position(&item)?;
        Arc::make_mut(&mut self.ordered).remove(position);
        Some(BindingEvent::Removed {
            item,
            index: position,
        })
    }

    /// Move the master item at `from` to `to` and re-place it in the ordered
    /// items if its tie-break position changed.
    pub fn move_master(&mut self, from: usize, to: usize) -> Option<BindingEvent<T>> {
        let item = self.master.remove(from);
        self.master.insert(to, item.clone());
        self.reevaluate(&item)
    }

    /// Re-evaluate the filter and sort position of `item`.
    ///
    /// Returns at most one positional event: an insertion when the item
    /// entered the filter, a removal when it left, or a move when its
    /// position changed.
    pub fn reevaluate(&mut self, item: &Arc<T>) -> Option<BindingEvent<T>> {
        let master_position = self.master_position(item)?;
        let passes = self.passes(item);
        match (self.ordered_position(item), passes) {
            (None, false) => None,
            (None, true) => {
                let position = self.target_position(item, master_position);
                Arc::make_mut(&mut self.ordered).insert(position, item.clone());
                Some(BindingEvent::Inserted {
                    item: item.clone(),
                    index: position,
                })
            }
            (Some(position), false) => {
                Arc::make_mut(&mut self.ordered).remove(position);
                Some(BindingEvent::Removed {
                    item: item.clone(),
                    index: position,
                })
            }
            (Some(from), true) => {
                let ordered = Arc::make_mut(&mut self.ordered);
                let moving = ordered.remove(from);
                let to = self.target_position(item, master_position);
                Arc::make_mut(&mut self.ordered).insert(to, moving);
                (from != to).then(|| BindingEvent::Moved {
                    item: item.clone(),
                    from,
                    to,
                })
            }
        }
    }

    /// Replace the master items wholesale. Call [`rebuild`](Self::rebuild)
    /// afterwards.
    pub fn replace_master(&mut self, items: Vec<Arc<T>>) {
        self.master = items;
    }

    /// Re-derive the ordered items from the master items.
    ///
    /// Returns `true` if membership or order changed.
    pub fn rebuild(&mut self) -> bool {
        let _span = PerfSpan::new(span_names::BINDING_REBUILD);
        let mut items: Vec<Arc<T>> = self
            .master
            .iter()
            .filter(|item| self.passes(item))
            .cloned()
            .collect();
        if self.config.comparator.is_some() {
            items.sort_by(|a, b| self.key_order(a, b));
        }
        let changed = items.len() != self.ordered.len()
            || items
                .iter()
                .zip(self.ordered.iter())
                .any(|(a, b)| !Arc::ptr_eq(a, b));
        self.ordered = Arc::new(items);
        changed
    }

    fn staged_mut(&mut self) -> &mut Config<T> {
        let current = &self.config;
        self.staged.get_or_insert_with(|| current.clone())
    }

    pub fn stage_filter(&mut self, filter: Option<Predicate<T>>) {
        self.staged_mut().filter = filter;
    }

    pub fn stage_comparator(&mut self, comparator: Option<Comparator<T>>) {
        self.staged_mut().comparator = comparator;
    }

    pub fn stage_reverse(&mut self, reverse: bool) {
        self.staged_mut().reverse = reverse;
    }

    /// The configuration as it will be after the next commit.
    pub fn effective_reverse(&self) -> bool {
        self.staged.as_ref().unwrap_or(&self.config).reverse
    }

    /// Apply staged configuration and rebuild.
    ///
    /// Returns `true` if the ordered items changed.
    pub fn commit(&mut self) -> bool {
        match self.staged.take() {
            Some(config) => {
                self.config = config;
                self.rebuild()
            }
            None => false,
        }
    }

    /// Check that the ordered items are exactly the sorted, filtered master
    /// items.
    #[cfg(test)]
    pub fn is_consistent(&self) -> bool {
        let mut expected: Vec<Arc<T>> = self
            .master
            .iter()
            .filter(|item| self.passes(item))
            .cloned()
            .collect();
        if self.config.comparator.is_some() {
            expected.sort_by(|a, b| self.key_order(a, b));
        }
        expected.len() == self.ordered.len()
            && expected
                .iter()
                .zip(self.ordered.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}
