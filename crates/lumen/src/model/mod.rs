//! The data model: items, containers, displays and selection.
//!
//! # Core Types
//!
//! - `Observable`: Contract for items that announce content changes
//! - `DataItem`: Titled, timestamped pixel data with a `Display`
//! - `Display`: Display limits plus cached histogram and statistics
//! - `ItemsContainer`: Ordered source collection feeding bindings
//! - `SelectedDataItem`: The current selection, consumed by panels
//!
//! # Architecture Overview
//!
//! ```text
//! ┌────────────────┐  inserted/removed  ┌──────────────────┐
//! │ ItemsContainer │───────────────────>│ DataItemsBinding │
//! └────────────────┘                    └──────────────────┘
//!         │                                      ^
//!         │ holds                content_changed │
//!         v                                      │
//! ┌────────────────┐                             │
//! │    DataItem    │─────────────────────────────┘
//! │   └─ Display   │──> data_updated ──> HistogramPanel
//! └────────────────┘
//! ```

mod container;
mod data;
mod data_item;
mod display;
mod item;
pub mod processing;
mod selection;

pub use container::{ContainerEvent, ItemsContainer};
pub use data::ImageData;
pub use data_item::{DataItem, LiveGuard};
pub use display::{Display, DisplayLimits, Processor};
pub use item::{aspects, AspectSet, ChangedAspect, Observable};
pub use processing::Statistics;
pub use selection::SelectedDataItem;
