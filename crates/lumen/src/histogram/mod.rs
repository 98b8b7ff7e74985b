//! Histogram presentation: the canvas interaction model and the panel
//! controller that feeds it.

mod canvas;
mod panel;

pub use canvas::{FractionLimits, HistogramCanvas};
pub use panel::HistogramPanel;
