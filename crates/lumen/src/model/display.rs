//! Display state of a data item: display limits and derived histogram and
//! statistics.
//!
//! Derived values are computed lazily on first read and cached until the
//! data or the display limits change. Every invalidation is announced on
//! [`Display::data_updated`] with the [`Processor`] whose output changed, so
//! views can re-read just what they draw.

use std::sync::Arc;

use lumen_core::{Computed, PerfSpan, Property, Signal};
use parking_lot::RwLock;

use crate::logging::{span_names, targets};
use crate::model::data::ImageData;
use crate::model::processing::{self, Statistics, DEFAULT_BINS};

/// Display limits as (lower, upper) data values.
pub type DisplayLimits = (f64, f64);

/// Identifies one of the derived outputs of a [`Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Processor {
    /// The normalized histogram.
    Histogram,
    /// The summary statistics.
    Statistics,
}

/// How a data item's pixels are displayed.
pub struct Display {
    data: RwLock<Arc<ImageData>>,
    display_limits: Property<Option<DisplayLimits>>,
    display_limits_changed: Signal<Option<DisplayLimits>>,
    histogram_bins: Property<usize>,
    histogram: Computed<Arc<Vec<f64>>>,
    statistics: Computed<Statistics>,
    data_updated: Signal<Processor>,
}

impl Display {
    /// Create a display over `data` with no display limits.
    pub fn new(data: Arc<ImageData>) -> Self {
        Self {
            data: RwLock::new(data),
            display_limits: Property::new(None),
            display_limits_changed: Signal::new(),
            histogram_bins: Property::new(DEFAULT_BINS),
            histogram: Computed::new(),
            statistics: Computed::new(),
            data_updated: Signal::new(),
        }
    }

    /// The displayed data.
    pub fn data(&self) -> Arc<ImageData> {
        self.data.read().clone()
    }

    /// Replace the displayed data, invalidating the histogram and statistics.
    pub fn set_data(&self, data: Arc<ImageData>) {
        *self.data.write() = data;
        self.histogram.invalidate();
        self.statistics.invalidate();
        tracing::trace!(target: targets::MODEL, "display data replaced");
        self.data_updated.emit(Processor::Histogram);
        self.data_updated.emit(Processor::Statistics);
    }

    /// Explicit display limits, or `None` to follow the data range.
    pub fn display_limits(&self) -> Option<DisplayLimits> {
        self.display_limits.get()
    }

    /// Set the display limits.
    ///
    /// The histogram is binned over the display range, so a change also
    /// invalidates it.
    pub fn set_display_limits(&self, limits: Option<DisplayLimits>) {
        if self.display_limits.set(limits) {
            tracing::debug!(target: targets::MODEL, ?limits, "display limits changed");
            self.histogram.invalidate();
            self.display_limits_changed.emit(limits);
            self.data_updated.emit(Processor::Histogram);
        }
    }

    /// Signal emitted with the new limits after they change.
    pub fn display_limits_changed(&self) -> &Signal<Option<DisplayLimits>> {
        &self.display_limits_changed
    }

    /// The range mapped onto the display: the limits if set, else the
    /// data's min and max. `None` when there is no finite data.
    pub fn display_range(&self) -> Option<DisplayLimits> {
        self.display_limits().or_else(|| self.data.read().min_max())
    }

    /// Number of bins used for the histogram.
    pub fn histogram_bins(&self) -> usize {
        self.histogram_bins.get()
    }

    pub fn set_histogram_bins(&self, bins: usize) {
        if self.histogram_bins.set(bins.max(1)) {
            self.histogram.invalidate();
            self.data_updated.emit(Processor::Histogram);
        }
    }

    /// Histogram of the data over the display range, normalized to [0, 1].
    pub fn histogram(&self) -> Arc<Vec<f64>> {
        self.histogram
            .get_or_compute(|| Arc::new(self.compute_histogram(self.histogram_bins())))
    }

    /// Histogram with `bins` bins, for views binning differently from the
    /// display. Only the display's own bin count is cached.
    pub fn histogram_with_bins(&self, bins: usize) -> Arc<Vec<f64>> {
        if bins == self.histogram_bins() {
            self.histogram()
        } else {
            Arc::new(self.compute_histogram(bins))
        }
    }

    fn compute_histogram(&self, bins: usize) -> Vec<f64> {
        let _span = PerfSpan::new(span_names::DISPLAY_PROCESS);
        let data = self.data();
        match self.display_range() {
            Some(range) => processing::compute_histogram(data.values(), bins, range),
            None => Vec::new(),
        }
    }

    /// Summary statistics of the data.
    pub fn statistics(&self) -> Statistics {
        self.statistics.get_or_compute(|| {
            let _span = PerfSpan::new(span_names::DISPLAY_PROCESS);
            processing::compute_statistics(self.data().values())
        })
    }

    /// Signal emitted after a derived output has been invalidated.
    pub fn data_updated(&self) -> &Signal<Processor> {
        &self.data_updated
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Display")
            .field("shape", &self.data.read().shape())
            .field("display_limits", &self.display_limits())
            .field("histogram_bins", &self.histogram_bins())
            .finish()
    }
}
