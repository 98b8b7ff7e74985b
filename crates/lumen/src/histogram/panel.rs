//! The histogram panel controller.
//!
//! The panel follows a [`SelectedDataItem`]. For the selected item it shows
//! the display's histogram on a [`HistogramCanvas`] and keeps the display's
//! statistics, refreshing both whenever the display reports new data.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use lumen_core::{Signal, Subscription};
use parking_lot::Mutex;

use crate::histogram::canvas::HistogramCanvas;
use crate::logging::targets;
use crate::model::{DataItem, Display, Processor, SelectedDataItem, Statistics};
use crate::settings::HistogramSettings;

struct PanelState {
    data_item: Option<Arc<DataItem>>,
    display: Option<Arc<Display>>,
    display_subscription: Option<Subscription>,
    statistics: Statistics,
}

struct PanelInner {
    canvas: HistogramCanvas,
    /// Guards display switching, which selection changes may drive from
    /// several threads.
    state: Mutex<PanelState>,
    statistics_changed: Signal<Statistics>,
}

/// Presents the histogram and statistics of the selected data item.
pub struct HistogramPanel {
    inner: Arc<PanelInner>,
    selection_subscription: Mutex<Option<Subscription>>,
}

impl HistogramPanel {
    /// Create a panel following `selection`.
    pub fn new(selection: &SelectedDataItem, settings: &HistogramSettings) -> Self {
        let canvas = HistogramCanvas::new(settings.canvas_width, f64::from(settings.canvas_height));
        canvas.set_histogram_bins(settings.bins);
        let inner = Arc::new(PanelInner {
            canvas,
            state: Mutex::new(PanelState {
                data_item: None,
                display: None,
                display_subscription: None,
                statistics: Statistics::default(),
            }),
            statistics_changed: Signal::new(),
        });

        let panel: Weak<PanelInner> = Arc::downgrade(&inner);
        let subscription = selection.changed().subscribe(move |data_item| {
            if let Some(panel) = panel.upgrade() {
                panel.data_item_changed(data_item.clone());
            }
        });
        inner.data_item_changed(selection.get());

        Self {
            inner,
            selection_subscription: Mutex::new(Some(subscription)),
        }
    }

    /// The histogram canvas.
    pub fn canvas(&self) -> &HistogramCanvas {
        &self.inner.canvas
    }

    /// The data item being presented.
    pub fn data_item(&self) -> Option<Arc<DataItem>> {
        self.inner.state.lock().data_item.clone()
    }

    pub fn display(&self) -> Option<Arc<Display>> {
        self.inner.state.lock().display.clone()
    }

    /// The histogram drawn on the canvas.
    pub fn histogram_data(&self) -> Option<Arc<Vec<f64>>> {
        self.inner.canvas.histogram_data()
    }

    /// Latest statistics; all `None` without a display.
    pub fn statistics(&self) -> Statistics {
        self.inner.state.lock().statistics
    }

    /// Latest statistics keyed by name.
    pub fn named_statistics(&self) -> BTreeMap<&'static str, Option<f64>> {
        self.statistics().named()
    }

    /// Signal emitted with new statistics.
    pub fn statistics_changed(&self) -> &Signal<Statistics> {
        &self.inner.statistics_changed
    }

    /// Stop following the selection and release the display.
    pub fn close(&self) {
        let subscription = self.selection_subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.close();
            self.inner.data_item_changed(None);
            tracing::debug!(target: targets::HISTOGRAM, "histogram panel closed");
        }
    }
}

impl PanelInner {
    fn data_item_changed(self: &Arc<Self>, data_item: Option<Arc<DataItem>>) {
        let display = data_item.as_ref().map(|item| item.display().clone());
        self.set_display(data_item, display.clone());
        self.canvas.set_display(display.clone());
        let statistics = display.map(|display| display.statistics()).unwrap_or_default();
        self.update_statistics(statistics);
    }

    fn set_display(
        self: &Arc<Self>,
        data_item: Option<Arc<DataItem>>,
        display: Option<Arc<Display>>,
    ) {
        let previous = {
            let mut state = self.state.lock();
            let previous = state.display_subscription.take();
            state.display_subscription = display.as_ref().map(|display| {
                let panel = Arc::downgrade(self);
                display.data_updated().subscribe(move |processor| {
                    if let Some(panel) = panel.upgrade() {
                        panel.display_data_updated(*processor);
                    }
                })
            });
            state.data_item = data_item;
            state.display = display;
            previous
        };
        drop(previous);
        tracing::trace!(target: targets::HISTOGRAM, "histogram panel display switched");
    }

    fn display_data_updated(&self, processor: Processor) {
        let Some(display) = self.state.lock().display.clone() else {
            return;
        };
        match processor {
            Processor::Histogram => {
                let bins = self.canvas.histogram_bins();
                self.canvas
                    .set_histogram_data(Some(display.histogram_with_bins(bins)));
            }
            Processor::Statistics => self.update_statistics(display.statistics()),
        }
    }

    fn update_statistics(&self, statistics: Statistics) {
        self.state.lock().statistics = statistics;
        self.statistics_changed.emit(statistics);
    }
}

impl Drop for HistogramPanel {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for HistogramPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistogramPanel")
            .field("canvas", &self.inner.canvas)
            .field("statistics", &self.statistics())
            .finish()
    }
}
