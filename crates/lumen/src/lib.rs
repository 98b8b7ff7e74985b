//! Lumen: live data-item bindings and a histogram panel model for
//! scientific image viewers.
//!
//! # Modules
//!
//! - [`binding`]: Filtered, sorted, incrementally updated views over a
//!   changing collection, composable into chains and batchable
//! - [`model`]: Data items, their displays, histograms and statistics,
//!   source containers and the selection
//! - [`histogram`]: The histogram canvas interaction model and panel
//! - [`settings`]: TOML configuration
//!
//! # Logging
//!
//! Lumen logs through `tracing`. Install a subscriber and filter by target,
//! e.g. `RUST_LOG=lumen::binding=debug`. See [`logging::targets`].

pub mod binding;
pub mod error;
pub mod histogram;
pub mod model;
pub mod settings;

pub use lumen_core::logging;
pub use lumen_core::{Signal, Subscription};

pub use binding::{BindingEvent, DataItemsBinding, ItemList};
pub use error::{Error, Result};
pub use histogram::{HistogramCanvas, HistogramPanel};
pub use model::{DataItem, Display, ImageData, SelectedDataItem};
pub use settings::{HistogramSettings, Settings};
