//! Data items: titled, timestamped pixel data with a display.

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use lumen_core::{Property, Signal};
use parking_lot::Mutex;

use crate::logging::targets;
use crate::model::data::ImageData;
use crate::model::display::Display;
use crate::model::item::{aspects, AspectSet, ChangedAspect, Observable};

/// A unit of pixel data in the library.
///
/// Every mutation is announced on the content-changed signal with the
/// aspect that changed: [`ChangedAspect::Title`] for the title,
/// [`ChangedAspect::Metadata`] for the live state, [`ChangedAspect::Data`]
/// for pixel data and [`ChangedAspect::Display`] for display limits.
pub struct DataItem {
    title: Property<String>,
    datetime_original: DateTime<Utc>,
    live_count: Mutex<usize>,
    display: Arc<Display>,
    content_changed: Arc<Signal<AspectSet>>,
}

impl DataItem {
    /// Create an untitled item over `data`, timestamped now.
    pub fn new(data: ImageData) -> Self {
        let display = Arc::new(Display::new(Arc::new(data)));
        let content_changed = Arc::new(Signal::new());

        let signal: Weak<Signal<AspectSet>> = Arc::downgrade(&content_changed);
        display.display_limits_changed().connect(move |_| {
            if let Some(signal) = signal.upgrade() {
                signal.emit(aspects([ChangedAspect::Display]));
            }
        });

        Self {
            title: Property::new(String::new()),
            datetime_original: Utc::now(),
            live_count: Mutex::new(0),
            display,
            content_changed,
        }
    }

    /// Replace the creation timestamp.
    pub fn with_datetime_original(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime_original = datetime;
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.title.set_silent(title.into());
        self
    }

    pub fn title(&self) -> String {
        self.title.get()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        if self.title.set(title.into()) {
            self.content_changed.emit(aspects([ChangedAspect::Title]));
        }
    }

    /// When the data was originally acquired.
    pub fn datetime_original(&self) -> DateTime<Utc> {
        self.datetime_original
    }

    /// Whether the item is receiving live data.
    pub fn is_live(&self) -> bool {
        *self.live_count.lock() > 0
    }

    /// Enter the live state. Calls nest; the item stays live until every
    /// `begin_live` has a matching [`end_live`](Self::end_live).
    pub fn begin_live(&self) {
        let became_live = {
            let mut count = self.live_count.lock();
            *count += 1;
            *count == 1
        };
        if became_live {
            tracing::debug!(target: targets::MODEL, title = %self.title(), "data item became live");
            self.content_changed.emit(aspects([ChangedAspect::Metadata]));
        }
    }

    /// Leave the live state.
    pub fn end_live(&self) {
        let became_idle = {
            let mut count = self.live_count.lock();
            if *count == 0 {
                tracing::warn!(
                    target: targets::MODEL,
                    title = %self.title(),
                    "end_live without begin_live"
                );
                return;
            }
            *count -= 1;
            *count == 0
        };
        if became_idle {
            tracing::debug!(
                target: targets::MODEL,
                title = %self.title(),
                "data item stopped being live"
            );
            self.content_changed.emit(aspects([ChangedAspect::Metadata]));
        }
    }

    /// Enter the live state until the returned guard is dropped.
    pub fn live(&self) -> LiveGuard<'_> {
        self.begin_live();
        LiveGuard { item: self }
    }

    pub fn data(&self) -> Arc<ImageData> {
        self.display.data()
    }

    /// Replace the pixel data.
    pub fn set_data(&self, data: ImageData) {
        self.display.set_data(Arc::new(data));
        self.content_changed.emit(aspects([ChangedAspect::Data]));
    }

    pub fn display(&self) -> &Arc<Display> {
        &self.display
    }
}

impl Observable for DataItem {
    fn content_changed_signal(&self) -> &Signal<AspectSet> {
        &self.content_changed
    }
}

impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, columns) = self.data().shape();
        write!(f, "{} ({rows}x{columns})", self.title())
    }
}

impl fmt::Debug for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataItem")
            .field("title", &self.title())
            .field("datetime_original", &self.datetime_original)
            .field("live", &self.is_live())
            .finish()
    }
}

/// Keeps a [`DataItem`] live while held.
#[must_use = "the item leaves the live state when the guard is dropped"]
pub struct LiveGuard<'a> {
    item: &'a DataItem,
}

impl Drop for LiveGuard<'_> {
    fn drop(&mut self) {
        self.item.end_live();
    }
}
