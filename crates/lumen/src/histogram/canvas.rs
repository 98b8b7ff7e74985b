//! Mouse interaction model of the histogram canvas.
//!
//! The canvas shows a display's histogram with adornments marking the
//! display limits as fractions of the canvas width. Dragging across the
//! canvas selects new limits; double-clicking clears them.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logging::targets;
use crate::model::processing::DEFAULT_BINS;
use crate::model::Display;

/// Adornment positions as fractions of the canvas width.
pub type FractionLimits = (f64, f64);

const FULL_RANGE: FractionLimits = (0.0, 1.0);

struct CanvasState {
    width: f64,
    height: f64,
    histogram_bins: usize,
    display: Option<Arc<Display>>,
    histogram_data: Option<Arc<Vec<f64>>>,
    adornment_limits: FractionLimits,
    /// Fraction at which the current drag started.
    drag_start: Option<f64>,
}

/// Interaction state of a histogram canvas.
///
/// Methods take `&self` and may be called from any thread. The display is
/// updated after the canvas lock is released, so display listeners may call
/// back into the canvas.
pub struct HistogramCanvas {
    state: Mutex<CanvasState>,
}

impl HistogramCanvas {
    /// Create a canvas of the given size with no display.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Mutex::new(CanvasState {
                width,
                height,
                histogram_bins: DEFAULT_BINS,
                display: None,
                histogram_data: None,
                adornment_limits: FULL_RANGE,
                drag_start: None,
            }),
        }
    }

    /// Resize the canvas.
    pub fn update_layout(&self, width: f64, height: f64) {
        let mut state = self.state.lock();
        state.width = width;
        state.height = height;
    }

    /// (width, height).
    pub fn size(&self) -> (f64, f64) {
        let state = self.state.lock();
        (state.width, state.height)
    }

    /// Number of bins the canvas draws. The display's own bin count is left
    /// alone.
    pub fn histogram_bins(&self) -> usize {
        self.state.lock().histogram_bins
    }

    /// Draw with `bins` bins, rebinning the current display's histogram.
    pub fn set_histogram_bins(&self, bins: usize) {
        let bins = bins.max(1);
        let display = {
            let mut state = self.state.lock();
            state.histogram_bins = bins;
            state.display.clone()
        };
        if let Some(display) = display {
            self.set_histogram_data(Some(display.histogram_with_bins(bins)));
        }
    }

    /// Show `display`, or nothing.
    ///
    /// Adornments reset to the full range unless a drag is in progress, in
    /// which case the user keeps control of them while the new data is
    /// shown.
    pub fn set_display(&self, display: Option<Arc<Display>>) {
        let bins = self.histogram_bins();
        let histogram_data = display
            .as_ref()
            .map(|display| display.histogram_with_bins(bins));
        let mut state = self.state.lock();
        if state.drag_start.is_none() {
            state.adornment_limits = FULL_RANGE;
        }
        state.display = display;
        state.histogram_data = histogram_data;
    }

    pub fn display(&self) -> Option<Arc<Display>> {
        self.state.lock().display.clone()
    }

    /// The histogram being drawn.
    pub fn histogram_data(&self) -> Option<Arc<Vec<f64>>> {
        self.state.lock().histogram_data.clone()
    }

    pub fn set_histogram_data(&self, histogram_data: Option<Arc<Vec<f64>>>) {
        self.state.lock().histogram_data = histogram_data;
    }

    /// Current adornment positions.
    pub fn adornment_limits(&self) -> FractionLimits {
        self.state.lock().adornment_limits
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state.lock().drag_start.is_some()
    }

    fn fraction(state: &CanvasState, x: f64) -> Option<f64> {
        (state.width > 0.0).then(|| x / state.width)
    }

    /// Start a drag at `x`. Returns `true` if the event was handled.
    pub fn mouse_pressed(&self, x: f64, _y: f64) -> bool {
        let mut state = self.state.lock();
        let Some(start) = Self::fraction(&state, x) else {
            return false;
        };
        state.drag_start = Some(start);
        state.adornment_limits = (start, start);
        true
    }

    /// Extend the drag to `x`.
    pub fn mouse_position_changed(&self, x: f64, _y: f64) -> bool {
        let mut state = self.state.lock();
        let (Some(start), Some(current)) = (state.drag_start, Self::fraction(&state, x)) else {
            return false;
        };
        state.adornment_limits = (start.min(current), start.max(current));
        true
    }

    /// Finish the drag, committing the selected span as display limits.
    ///
    /// The span maps onto the display range as
    /// `data_min + fraction * (data_max - data_min)`. Empty spans and the
    /// full range commit nothing.
    pub fn mouse_released(&self, _x: f64, _y: f64) -> bool {
        let (display, (lower, upper)) = {
            let mut state = self.state.lock();
            state.drag_start = None;
            (state.display.clone(), state.adornment_limits)
        };

        let span = upper - lower;
        let Some(display) = display.filter(|_| span > 0.0 && span < 1.0) else {
            return true;
        };
        if let Some((data_min, data_max)) = display.display_range() {
            let limits = (
                data_min + lower * (data_max - data_min),
                data_min + upper * (data_max - data_min),
            );
            tracing::debug!(
                target: targets::HISTOGRAM,
                ?limits,
                "committing dragged display limits"
            );
            display.set_display_limits(Some(limits));
        }
        true
    }

    /// Reset the adornments and clear the display limits.
    pub fn mouse_double_clicked(&self, _x: f64, _y: f64) -> bool {
        let display = {
            let mut state = self.state.lock();
            state.adornment_limits = FULL_RANGE;
            state.display.clone()
        };
        if let Some(display) = display {
            tracing::debug!(target: targets::HISTOGRAM, "clearing display limits");
            display.set_display_limits(None);
        }
        true
    }
}

impl Default for HistogramCanvas {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Debug for HistogramCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HistogramCanvas")
            .field("width", &state.width)
            .field("height", &state.height)
            .field("adornment_limits", &state.adornment_limits)
            .field("dragging", &state.drag_start.is_some())
            .finish()
    }
}
