//! The item contract shared by containers and bindings.

use std::collections::BTreeSet;

use lumen_core::Signal;

/// Which part of an item changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangedAspect {
    /// Descriptive metadata, including the live state.
    Metadata,
    /// Pixel data.
    Data,
    /// The user-visible title.
    Title,
    /// Display settings such as display limits.
    Display,
}

/// A set of changed aspects carried by a content-changed notification.
pub type AspectSet = BTreeSet<ChangedAspect>;

/// Build an [`AspectSet`] from a list of aspects.
pub fn aspects<I>(aspects: I) -> AspectSet
where
    I: IntoIterator<Item = ChangedAspect>,
{
    aspects.into_iter().collect()
}

/// An identity-bearing item that announces changes to its content.
///
/// Items are compared by identity (`Arc::ptr_eq`), never by value. Root
/// bindings subscribe to [`content_changed_signal`](Self::content_changed_signal)
/// for every item they hold so that filters and sort keys are re-evaluated
/// when the item mutates.
pub trait Observable: Send + Sync + 'static {
    /// Signal emitted with the changed aspects whenever the item's content
    /// changes.
    fn content_changed_signal(&self) -> &Signal<AspectSet>;
}
