//! Bindings layered on other bindings.

use std::sync::Arc;

use crate::binding::{BindingEvent, BindingInner, DataItemsBinding};
use crate::logging::targets;
use crate::model::Observable;

impl<T: Observable> DataItemsBinding<T> {
    /// Create a binding whose master items are `upstream`'s ordered items.
    ///
    /// The new binding starts out with the upstream's current items, accepts
    /// everything in upstream order, and follows every upstream event from
    /// then on. Filters and sorts set on it apply on top of the upstream's.
    /// Chains may be stacked to any depth.
    pub fn filtered(upstream: &DataItemsBinding<T>) -> Self {
        let binding = Self {
            inner: Arc::new(BindingInner::new(false)),
        };
        let downstream = Arc::downgrade(&binding.inner);

        // Hold the new binding's lock while subscribing so an upstream event
        // delivered from another thread waits until the snapshot is in place.
        let mut state = binding.inner.state.lock();
        let (snapshot, subscription) = upstream.subscribe_with_snapshot(move |event| {
            if let Some(downstream) = downstream.upgrade() {
                downstream.apply_upstream(event);
            }
        });
        state.projection.replace_master(snapshot.to_vec());
        state.projection.rebuild();
        state.published = state.projection.ordered().clone();
        state.source = Some(subscription);
        tracing::debug!(target: targets::BINDING, len = snapshot.len(), "chained binding created");
        drop(state);

        binding
    }
}

impl<T: Observable> BindingInner<T> {
    /// Translate an upstream event into master item changes.
    fn apply_upstream(&self, event: &BindingEvent<T>) {
        if self.is_closed() {
            return;
        }
        self.mutate("apply_upstream", |state| match event {
            BindingEvent::Inserted { item, index } => {
                let inserted = state.projection.insert(item.clone(), *index);
                state.queue(inserted);
            }
            BindingEvent::Removed { item, .. } => state.remove(item),
            BindingEvent::Moved { item, to, .. } => {
                match state.projection.master_position(item) {
                    Some(from) => {
                        let moved = state.projection.move_master(from, *to);
                        state.queue(moved);
                    }
                    None => {
                        tracing::warn!(target: targets::BINDING, "upstream moved an unknown item");
                    }
                }
            }
            BindingEvent::Reset { items } => {
                state.projection.replace_master(items.to_vec());
                if state.projection.rebuild() {
                    let items = state.projection.ordered().clone();
                    state.queue(Some(BindingEvent::Reset { items }));
                }
            }
            BindingEvent::ContentChanged { item, aspects } => state.reevaluate(item, aspects),
        });
    }
}
