//! Live, filtered and sorted views over a changing collection of items.
//!
//! A [`DataItemsBinding`] keeps an ordered projection of its *master items*:
//! the items passing its filter, sorted by its sort key with ties kept in
//! master order. It is updated incrementally as the source inserts, removes
//! or changes items, and announces every change to listeners as a
//! [`BindingEvent`].
//!
//! # Sources
//!
//! - A *root* binding is fed by explicit [`insert`](DataItemsBinding::insert)
//!   and [`remove`](DataItemsBinding::remove) calls, or by an
//!   [`ItemsContainer`] via [`bind_container`](DataItemsBinding::bind_container).
//!   It watches every item's content-changed signal.
//! - A *chained* binding, created with [`DataItemsBinding::filtered`], takes
//!   another binding's ordered items as its master items and follows its
//!   events.
//!
//! # Threading
//!
//! Any thread may call into a binding. Each mutating call holds the
//! binding's delivery lock until its events have reached every listener, so
//! listeners run synchronously on the mutating thread and a chained binding
//! is up to date when the upstream call returns. Other threads wait for the
//! delivery lock. The state lock is never held while a listener runs, so
//! listeners may call back into the binding; their own events are delivered
//! after the current one, before the outer call returns. Filters, sort keys
//! and comparators run under the state lock and must not call back into the
//! binding.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lumen::binding::DataItemsBinding;
//! use lumen::model::{DataItem, ImageData};
//!
//! let binding = DataItemsBinding::new();
//! binding.set_sort_key(|item: &DataItem| item.title());
//!
//! for title in ["Spectrum", "Image", "Line"] {
//!     let item = Arc::new(DataItem::new(ImageData::zeros((16, 16))).with_title(title));
//!     binding.insert(item, 0, false);
//! }
//!
//! let titles: Vec<String> = binding.items().iter().map(|item| item.title()).collect();
//! assert_eq!(titles, ["Image", "Line", "Spectrum"]);
//! ```

mod batch;
mod chain;
mod event;
mod projection;

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use lumen_core::{Signal, Subscription};
use parking_lot::{Mutex, ReentrantMutex};

use crate::logging::targets;
use crate::model::{AspectSet, ContainerEvent, ItemsContainer, Observable};

pub use batch::ChangesGuard;
pub use event::{BindingEvent, ItemList};
pub use projection::{Comparator, Predicate};

use batch::{BatchExit, BatchState};
use projection::Projection;

/// A filtered, sorted, live view over a collection of items.
///
/// `DataItemsBinding` is a cheap handle; clones share the same binding.
pub struct DataItemsBinding<T: Observable> {
    inner: Arc<BindingInner<T>>,
}

impl<T: Observable> Clone for DataItemsBinding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub(crate) struct BindingInner<T> {
    /// Held across a mutation and the delivery of its events. Always taken
    /// before `state`.
    delivery: ReentrantMutex<()>,
    state: Mutex<BindingState<T>>,
    events: Signal<BindingEvent<T>>,
    /// Root bindings subscribe to each item's content-changed signal.
    watch_items: bool,
}

struct BindingState<T> {
    projection: Projection<T>,
    batch: BatchState,
    /// Events not yet delivered, each with the ordered items right after it.
    pending: VecDeque<(BindingEvent<T>, ItemList<T>)>,
    /// Ordered items as of the last delivered event.
    published: ItemList<T>,
    dispatching: bool,
    item_subscriptions: HashMap<usize, Subscription>,
    source: Option<Subscription>,
    /// Master position of the bound container's first item.
    container_offset: usize,
    closed: bool,
}

fn item_key<T>(item: &Arc<T>) -> usize {
    Arc::as_ptr(item) as usize
}

impl<T> BindingState<T> {
    fn new() -> Self {
        Self {
            projection: Projection::new(),
            batch: BatchState::default(),
            pending: VecDeque::new(),
            published: Arc::new(Vec::new()),
            dispatching: false,
            item_subscriptions: HashMap::new(),
            source: None,
            container_offset: 0,
            closed: false,
        }
    }

    fn queue(&mut self, event: Option<BindingEvent<T>>) {
        if let Some(event) = event {
            tracing::trace!(target: targets::BINDING, ?event, "queueing binding event");
            let snapshot = self.projection.ordered().clone();
            self.pending.push_back((event, snapshot));
        }
    }

    /// Re-evaluate `item` and announce its content change if it remains in
    /// the ordered items.
    fn reevaluate(&mut self, item: &Arc<T>, aspects: &AspectSet) {
        if self.projection.master_position(item).is_none() {
            tracing::debug!(
                target: targets::BINDING,
                "content change for an item not in the binding"
            );
            return;
        }
        let event = self.projection.reevaluate(item);
        self.queue(event);
        if self.projection.ordered_position(item).is_some() {
            self.queue(Some(BindingEvent::ContentChanged {
                item: item.clone(),
                aspects: aspects.clone(),
            }));
        }
    }

    fn remove(&mut self, item: &Arc<T>) {
        let Some(position) = self.projection.master_position(item) else {
            tracing::warn!(target: targets::BINDING, "removing an item that is not in the binding");
            return;
        };
        if position < self.container_offset {
            self.container_offset -= 1;
        }
        let event = self.projection.remove_at(position);
        self.queue(event);
        self.item_subscriptions.remove(&item_key(item));
    }

    /// Apply staged configuration, announcing a reset if the ordered items
    /// changed.
    fn flush_config(&mut self) {
        if self.projection.commit() {
            let items = self.projection.ordered().clone();
            tracing::debug!(target: targets::BINDING, len = items.len(), "binding reset");
            self.queue(Some(BindingEvent::Reset { items }));
        }
    }
}

impl<T: Observable> BindingInner<T> {
    fn new(watch_items: bool) -> Self {
        Self {
            delivery: ReentrantMutex::new(()),
            state: Mutex::new(BindingState::new()),
            events: Signal::new(),
            watch_items,
        }
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Run `f` under the state lock, then deliver the events it queued on
    /// this thread.
    ///
    /// Returns `None` without running `f` if the binding is closed.
    fn mutate<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut BindingState<T>) -> R,
    ) -> Option<R> {
        let _delivery = self.delivery.lock();
        let result = {
            let mut state = self.state.lock();
            if state.closed {
                tracing::warn!(
                    target: targets::BINDING,
                    operation,
                    "ignoring operation on closed binding"
                );
                return None;
            }
            f(&mut state)
        };
        self.dispatch();
        Some(result)
    }

    /// Deliver queued events until the queue is empty.
    ///
    /// Must be called with the delivery lock held, so only a listener
    /// re-entering the binding can find delivery in progress. It returns at
    /// once and the outer loop, on the same thread, delivers its events.
    fn dispatch(&self) {
        {
            let mut state = self.state.lock();
            if state.dispatching || state.pending.is_empty() {
                return;
            }
            state.dispatching = true;
        }

        let mut guard = DispatchGuard {
            inner: self,
            finished: false,
        };
        loop {
            let next = {
                let mut state = self.state.lock();
                match state.pending.pop_front() {
                    Some((event, snapshot)) => {
                        state.published = snapshot;
                        Some((event, self.events.slots()))
                    }
                    None => {
                        state.dispatching = false;
                        None
                    }
                }
            };
            let Some((event, slots)) = next else {
                break;
            };
            for slot in &slots {
                slot(&event);
            }
        }
        guard.finished = true;
    }

    fn insert_locked(self: &Arc<Self>, state: &mut BindingState<T>, item: Arc<T>, index: usize) {
        if state.projection.master_position(&item).is_some() {
            tracing::warn!(
                target: targets::BINDING,
                index,
                "item already in binding, insert ignored"
            );
            return;
        }
        let event = state.projection.insert(item.clone(), index);
        state.queue(event);
        if self.watch_items {
            let subscription = self.watch(&item);
            state.item_subscriptions.insert(item_key(&item), subscription);
        }
    }

    /// Follow `item`'s content-changed signal.
    fn watch(self: &Arc<Self>, item: &Arc<T>) -> Subscription {
        let binding = Arc::downgrade(self);
        let watched = Arc::downgrade(item);
        item.content_changed_signal().subscribe(move |aspects| {
            if let (Some(binding), Some(item)) = (binding.upgrade(), watched.upgrade()) {
                binding.mutate("content_changed", |state| state.reevaluate(&item, aspects));
            }
        })
    }

    fn insert(self: &Arc<Self>, item: Arc<T>, index: usize, is_move: bool) {
        tracing::trace!(target: targets::BINDING, index, is_move, "insert");
        self.mutate("insert", |state| {
            if index <= state.container_offset && state.source.is_some() {
                state.container_offset += 1;
            }
            self.insert_locked(state, item, index)
        });
    }

    fn apply_container(self: &Arc<Self>, event: &ContainerEvent<T>) {
        if self.is_closed() {
            return;
        }
        match event {
            ContainerEvent::Inserted {
                item,
                index,
                is_move,
            } => {
                tracing::trace!(target: targets::BINDING, index, is_move, "container insertion");
                self.mutate("insert", |state| {
                    let index = state.container_offset + index;
                    self.insert_locked(state, item.clone(), index)
                });
            }
            ContainerEvent::Removed { item, is_move, .. } => {
                tracing::trace!(target: targets::BINDING, is_move, "container removal");
                self.mutate("remove", |state| state.remove(item));
            }
        }
    }
}

/// Clears the dispatching flag if a listener unwinds mid-delivery.
struct DispatchGuard<'a, T: Observable> {
    inner: &'a BindingInner<T>,
    finished: bool,
}

impl<T: Observable> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            self.inner.state.lock().dispatching = false;
        }
    }
}

impl<T: Observable> Default for DataItemsBinding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Observable> DataItemsBinding<T> {
    /// Create an empty root binding that accepts every item in insertion
    /// order.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BindingInner::new(true)),
        }
    }

    // =========================================================================
    // Source notifications
    // =========================================================================

    /// Record `item` at `index` among the master items.
    ///
    /// `is_move` marks the second half of a move in the source; it is
    /// informational only. Inserting an item that is already present is
    /// ignored with a warning.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the number of master items.
    pub fn insert(&self, item: Arc<T>, index: usize, is_move: bool) {
        self.inner.insert(item, index, is_move);
    }

    /// Remove `item` from the master items. Unknown items are ignored with a
    /// warning.
    pub fn remove(&self, item: &Arc<T>) {
        self.inner.mutate("remove", |state| state.remove(item));
    }

    /// Re-evaluate `item` after its content changed.
    pub fn content_changed(&self, item: &Arc<T>, aspects: &AspectSet) {
        self.inner
            .mutate("content_changed", |state| state.reevaluate(item, aspects));
    }

    /// Populate from `container` and follow its insertions and removals.
    ///
    /// The container's current items are appended to the master items in
    /// container order. Container positions are offset by the number of
    /// items ahead of them, so items already in the binding stay in front.
    /// A previously bound source is released.
    pub fn bind_container(&self, container: &ItemsContainer<T>) {
        let inner = &self.inner;
        let binding = Arc::downgrade(inner);
        inner.mutate("bind_container", |state| {
            let (items, subscription) = container.attach(move |event| {
                if let Some(binding) = binding.upgrade() {
                    binding.apply_container(event);
                }
            });
            state.container_offset = state.projection.master().len();
            for item in items {
                let index = state.projection.master().len();
                inner.insert_locked(state, item, index);
            }
            if state.source.replace(subscription).is_some() {
                tracing::debug!(target: targets::BINDING, "replaced previous binding source");
            }
        });
    }

    // =========================================================================
    // Filter and sort
    // =========================================================================

    fn configure(&self, operation: &'static str, f: impl FnOnce(&mut Projection<T>)) {
        self.inner.mutate(operation, |state| {
            f(&mut state.projection);
            if !state.batch.is_batching() {
                state.flush_config();
            }
        });
    }

    /// Only items for which `filter` returns `true` are shown.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let filter: Predicate<T> = Arc::new(filter);
        self.configure("set_filter", |projection| projection.stage_filter(Some(filter)));
    }

    /// Show every item.
    pub fn clear_filter(&self) {
        self.configure("clear_filter", |projection| projection.stage_filter(None));
    }

    /// Sort by the key `key` extracts. Equal keys keep master order.
    pub fn set_sort_key<K, F>(&self, key: F)
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.set_sort_by(move |a, b| key(a).cmp(&key(b)));
    }

    /// Sort with `compare`, which must be a total order. Equal items keep
    /// master order.
    pub fn set_sort_by<F>(&self, compare: F)
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let comparator: Comparator<T> = Arc::new(compare);
        self.configure("set_sort", |projection| {
            projection.stage_comparator(Some(comparator))
        });
    }

    /// Return to master order.
    pub fn clear_sort(&self) {
        self.configure("clear_sort", |projection| projection.stage_comparator(None));
    }

    /// Reverse the sort order. Has no effect while no sort is set; ties keep
    /// master order either way.
    pub fn set_sort_reverse(&self, reverse: bool) {
        self.configure("set_sort_reverse", |projection| projection.stage_reverse(reverse));
    }

    pub fn sort_reverse(&self) -> bool {
        self.inner.state.lock().projection.effective_reverse()
    }

    // =========================================================================
    // Batching
    // =========================================================================

    /// Batch filter and sort changes until the returned guard drops.
    ///
    /// # Example
    ///
    /// ```
    /// use lumen::binding::DataItemsBinding;
    /// use lumen::model::DataItem;
    ///
    /// let binding = DataItemsBinding::<DataItem>::new();
    /// {
    ///     let _changes = binding.changes();
    ///     binding.set_filter(|item| item.is_live());
    ///     binding.set_sort_key(|item| item.datetime_original());
    ///     binding.set_sort_reverse(true);
    /// } // one rebuild, at most one reset event
    /// ```
    pub fn changes(&self) -> ChangesGuard<'_, T> {
        ChangesGuard::new(self)
    }

    /// Open a batch level. Prefer [`changes`](Self::changes).
    pub fn begin_changes(&self) {
        self.inner.mutate("begin_changes", |state| state.batch.enter());
    }

    /// Close a batch level, flushing staged changes when the outermost level
    /// closes.
    pub fn end_changes(&self) {
        self.inner.mutate("end_changes", |state| match state.batch.exit() {
            BatchExit::Flush => state.flush_config(),
            BatchExit::Nested => {}
            BatchExit::Unbalanced => {
                tracing::warn!(
                    target: targets::BINDING,
                    "end_changes without matching begin_changes"
                );
            }
        });
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Snapshot of the ordered items.
    pub fn items(&self) -> ItemList<T> {
        self.inner.state.lock().projection.ordered().clone()
    }

    /// Snapshot of the master items, unfiltered and in source order.
    pub fn master_items(&self) -> Vec<Arc<T>> {
        self.inner.state.lock().projection.master().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().projection.ordered().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `item` is among the ordered items.
    pub fn contains(&self, item: &Arc<T>) -> bool {
        self.index_of(item).is_some()
    }

    /// Position of `item` among the ordered items.
    pub fn index_of(&self, item: &Arc<T>) -> Option<usize> {
        self.inner.state.lock().projection.ordered_position(item)
    }

    // =========================================================================
    // Listening
    // =========================================================================

    /// Listen for changes to the ordered items.
    ///
    /// The listener runs synchronously on the thread whose call caused the
    /// event, before that call returns.
    /// Dropping the returned subscription stops delivery.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&BindingEvent<T>) + Send + Sync + 'static,
    {
        self.subscribe_with_snapshot(listener).1
    }

    /// Listen for changes and get the ordered items the first delivered
    /// event applies to.
    ///
    /// Replaying subsequent events onto the snapshot with
    /// [`BindingEvent::apply`] tracks the binding exactly, even while other
    /// threads mutate it.
    pub fn subscribe_with_snapshot<F>(&self, listener: F) -> (ItemList<T>, Subscription)
    where
        F: Fn(&BindingEvent<T>) + Send + Sync + 'static,
    {
        let state = self.inner.state.lock();
        if state.closed {
            tracing::warn!(target: targets::BINDING, "subscribing to closed binding");
            return (state.published.clone(), Subscription::new(|| {}));
        }
        let subscription = self.inner.events.subscribe(listener);
        (state.published.clone(), subscription)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Detach from the source, release item subscriptions and disconnect all
    /// listeners. Later mutations are ignored with a warning. Closing twice
    /// does nothing.
    pub fn close(&self) {
        let _delivery = self.inner.delivery.lock();
        let (item_subscriptions, source) = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.pending.clear();
            state.batch.reset();
            (
                std::mem::take(&mut state.item_subscriptions),
                state.source.take(),
            )
        };
        drop(item_subscriptions);
        drop(source);
        self.inner.events.disconnect_all();
        tracing::debug!(target: targets::BINDING, "binding closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl<T: Observable> fmt::Debug for DataItemsBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("DataItemsBinding")
            .field("master", &state.projection.master().len())
            .field("ordered", &state.projection.ordered().len())
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{aspects, ChangedAspect, DataItem, ImageData};

    fn item(title: &str) -> Arc<DataItem> {
        Arc::new(DataItem::new(ImageData::zeros((4, 4))).with_title(title))
    }

    fn titles(binding: &DataItemsBinding<DataItem>) -> Vec<String> {
        binding.items().iter().map(|i| i.title()).collect()
    }

    type Recorded = Arc<Mutex<Vec<BindingEvent<DataItem>>>>;

    fn record(binding: &DataItemsBinding<DataItem>) -> (Recorded, Subscription) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let subscription = binding.subscribe(move |event| events_clone.lock().push(event.clone()));
        (events, subscription)
    }

    #[test]
    fn test_root_binding_watches_items() {
        let binding = DataItemsBinding::new();
        binding.set_sort_key(|i: &DataItem| i.title());
        let a = item("b");
        let b = item("c");
        binding.insert(a.clone(), 0, false);
        binding.insert(b.clone(), 1, false);

        let (events, _subscription) = record(&binding);
        b.set_title("a");

        assert_eq!(titles(&binding), vec!["a", "b"]);
        let events = events.lock();
        assert!(matches!(events[0], BindingEvent::Moved { from: 1, to: 0, .. }));
        assert!(matches!(events[1], BindingEvent::ContentChanged { .. }));
    }

    #[test]
    fn test_removed_item_is_no_longer_watched() {
        let binding = DataItemsBinding::new();
        let a = item("a");
        binding.insert(a.clone(), 0, false);
        assert_eq!(a.content_changed_signal().connection_count(), 1);

        binding.remove(&a);
        assert_eq!(a.content_changed_signal().connection_count(), 0);
        assert!(binding.is_empty());
    }

    #[test]
    fn test_unknown_remove_and_duplicate_insert_are_tolerated() {
        let binding = DataItemsBinding::new();
        let a = item("a");
        binding.remove(&a);
        binding.insert(a.clone(), 0, false);
        binding.insert(a.clone(), 0, false);
        assert_eq!(binding.len(), 1);
        assert_eq!(binding.master_items().len(), 1);
    }

    #[test]
    fn test_setter_without_change_emits_nothing() {
        let binding = DataItemsBinding::new();
        binding.insert(item("a"), 0, false);
        binding.insert(item("b"), 1, false);
        let (events, _subscription) = record(&binding);

        binding.set_sort_key(|i: &DataItem| i.title());
        binding.set_filter(|_| true);
        assert!(events.lock().is_empty());

        binding.set_sort_reverse(true);
        assert_eq!(events.lock().len(), 1);
        assert!(matches!(events.lock()[0], BindingEvent::Reset { .. }));
    }

    #[test]
    fn test_batch_collapses_to_one_reset() {
        let binding = DataItemsBinding::new();
        for (i, title) in ["c", "a", "b"].into_iter().enumerate() {
            binding.insert(item(title), i, false);
        }
        let (events, _subscription) = record(&binding);

        {
            let _outer = binding.changes();
            binding.set_sort_key(|i: &DataItem| i.title());
            {
                let _inner = binding.changes();
                binding.set_sort_reverse(true);
                binding.set_filter(|i: &DataItem| i.title() != "b");
            }
            assert!(events.lock().is_empty());
            assert_eq!(titles(&binding), vec!["c", "a", "b"]);
        }

        assert_eq!(titles(&binding), vec!["c", "a"]);
        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_batch_returning_to_same_order_emits_nothing() {
        let binding = DataItemsBinding::new();
        binding.insert(item("a"), 0, false);
        binding.insert(item("b"), 1, false);
        let (events, _subscription) = record(&binding);

        {
            let _changes = binding.changes();
            binding.set_sort_reverse(true);
            binding.set_sort_key(|i: &DataItem| i.title());
            binding.set_sort_reverse(false);
        }
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_unbalanced_end_changes_is_tolerated() {
        let binding = DataItemsBinding::<DataItem>::new();
        binding.end_changes();
        binding.begin_changes();
        binding.end_changes();
    }

    #[test]
    fn test_close_releases_everything() {
        let binding = DataItemsBinding::new();
        let a = item("a");
        binding.insert(a.clone(), 0, false);
        let (events, subscription) = record(&binding);

        binding.close();
        binding.close();
        assert!(binding.is_closed());
        assert_eq!(a.content_changed_signal().connection_count(), 0);

        binding.insert(item("b"), 1, false);
        binding.set_filter(|_| false);
        a.set_title("changed");
        assert!(events.lock().is_empty());
        assert_eq!(binding.len(), 1);
        drop(subscription);
    }

    #[test]
    fn test_listener_may_reenter_binding() {
        let binding = DataItemsBinding::<DataItem>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let handle = binding.clone();
        let order_clone = order.clone();
        let _subscription = binding.subscribe(move |event| {
            if let BindingEvent::Inserted { item, index } = event {
                order_clone.lock().push(item.title());
                if item.title() == "first" {
                    // Re-entrant insert; delivered after this event.
                    handle.insert(self::item("second"), *index + 1, false);
                }
            }
        });

        binding.insert(item("first"), 0, false);
        assert_eq!(*order.lock(), vec!["first", "second"]);
        assert_eq!(titles(&binding), vec!["first", "second"]);
    }

    #[test]
    fn test_content_changed_for_hidden_item_is_silent() {
        let binding = DataItemsBinding::new();
        binding.set_filter(|i: &DataItem| i.is_live());
        let a = item("a");
        binding.insert(a.clone(), 0, false);
        let (events, _subscription) = record(&binding);

        binding.content_changed(&a, &aspects([ChangedAspect::Title]));
        binding.content_changed(&item("stranger"), &AspectSet::new());
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_bind_container_follows_mutations() {
        let container = ItemsContainer::new();
        let a = item("a");
        let b = item("b");
        container.push(a.clone());

        let binding = DataItemsBinding::new();
        binding.bind_container(&container);
        assert_eq!(titles(&binding), vec!["a"]);

        container.insert(0, b.clone());
        assert_eq!(titles(&binding), vec!["b", "a"]);

        container.move_item(&b, 1);
        assert_eq!(titles(&binding), vec!["a", "b"]);

        container.remove(&a);
        assert_eq!(titles(&binding), vec!["b"]);

        binding.close();
        assert_eq!(container.events().connection_count(), 0);
    }

    #[test]
    fn test_bind_container_keeps_existing_items_in_front() {
        let binding = DataItemsBinding::new();
        let x = item("x");
        let y = item("y");
        binding.insert(x.clone(), 0, false);
        binding.insert(y.clone(), 1, false);

        let container = ItemsContainer::new();
        container.push(item("a"));
        container.push(item("b"));
        binding.bind_container(&container);
        assert_eq!(titles(&binding), vec!["x", "y", "a", "b"]);

        container.insert(1, item("c"));
        assert_eq!(titles(&binding), vec!["x", "y", "a", "c", "b"]);

        binding.remove(&x);
        container.insert(0, item("d"));
        assert_eq!(titles(&binding), vec!["y", "d", "a", "c", "b"]);

        binding.insert(item("w"), 0, false);
        container.push(item("e"));
        assert_eq!(titles(&binding), vec!["w", "y", "d", "a", "c", "b", "e"]);
    }
}
