//! Property system for Lumen.
//!
//! This module provides reactive properties with change detection and
//! cached computed values. Properties are the data backbone of the
//! signal/slot system - when a property changes, its owner emits a signal
//! to notify interested parties.
//!
//! # Property Types
//!
//! - **Property<T>**: A value cell that reports whether a write changed it
//! - **Computed<T>**: A lazily computed, invalidatable cache
//!
//! # Example
//!
//! ```
//! use lumen_core::{Property, Signal};
//!
//! struct Exposure {
//!     seconds: Property<f64>,
//!     seconds_changed: Signal<f64>,
//! }
//!
//! impl Exposure {
//!     fn set_seconds(&self, seconds: f64) {
//!         if self.seconds.set(seconds) {
//!             self.seconds_changed.emit(seconds);
//!         }
//!     }
//! }
//!
//! let exposure = Exposure { seconds: Property::new(0.5), seconds_changed: Signal::new() };
//! exposure.set_seconds(1.0);
//! assert_eq!(exposure.seconds.get(), 1.0);
//! ```

use std::fmt;

use parking_lot::{Mutex, RwLock};

use crate::logging::targets;

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. When `set()` is
/// called, it compares the new value with the current one and returns whether
/// the value actually changed.
///
/// # Thread Safety
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()` instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A lazily computed value cache.
///
/// `Computed<T>` stores the result of an expensive derivation until it is
/// invalidated. The derivation is supplied at read time, so the owner can
/// compute from its own state without the cache capturing it.
///
/// # Example
///
/// ```
/// use lumen_core::Computed;
///
/// let mean = Computed::new();
/// let samples = vec![1.0, 2.0, 3.0];
/// let value = mean.get_or_compute(|| samples.iter().sum::<f64>() / samples.len() as f64);
/// assert_eq!(value, 2.0);
///
/// mean.invalidate();
/// assert!(mean.is_dirty());
/// ```
pub struct Computed<T> {
    cached: Mutex<Option<T>>,
}

impl<T: Clone> Computed<T> {
    /// Create an empty (dirty) cache.
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }

    /// Return the cached value, computing it first if the cache is dirty.
    ///
    /// The cache lock is held while `compute` runs, so concurrent readers
    /// wait for a single computation instead of repeating it.
    pub fn get_or_compute<F>(&self, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut cached = self.cached.lock();
        if let Some(value) = cached.as_ref() {
            return value.clone();
        }
        tracing::trace!(target: targets::PROPERTY, "recomputing cached value");
        let value = compute();
        *cached = Some(value.clone());
        value
    }

    /// Return the cached value without computing.
    pub fn peek(&self) -> Option<T> {
        self.cached.lock().clone()
    }

    /// Drop the cached value so the next read recomputes it.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }

    /// Check if the cache needs recalculation.
    pub fn is_dirty(&self) -> bool {
        self.cached.lock().is_none()
    }
}

impl<T: Clone> Default for Computed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("cached", &*self.cached.lock())
            .finish()
    }
}
