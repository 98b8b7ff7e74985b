//! Core systems for Lumen.
//!
//! This crate provides the foundational components the Lumen data model and
//! panels are built on:
//!
//! - **Signal/Slot System**: Type-safe, thread-safe change notification
//! - **Subscriptions**: Disposable handles that release a connection on drop
//! - **Property System**: Reactive properties and cached computed values
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use lumen_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Subscribe; the connection lives as long as the handle
//! let subscription = value_changed.subscribe(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//!
//! // Release when done
//! subscription.close();
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::PerfSpan;
pub use property::{Computed, Property};
pub use signal::{ConnectionId, Signal, Slot, Subscription};
