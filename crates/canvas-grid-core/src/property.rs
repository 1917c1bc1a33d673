//! Property system for Canvas Grid.
//!
//! A [`Property<T>`] holds one piece of mutable policy (a background style, a
//! border style, a text color) and reports whether an assignment actually
//! changed it. Renderers pair each property with their `changed` signal so that
//! assigning an equal value is silent and assigning a different value notifies
//! exactly once.
//!
//! # Example
//!
//! ```
//! use canvas_grid_core::{Property, Signal};
//!
//! let background = Property::new(Some(0xFF9900u32));
//! let changed = Signal::<()>::new();
//!
//! assert!(!background.set_and_notify(Some(0xFF9900), &changed));
//! assert!(background.set_and_notify(None, &changed));
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::Signal;

/// A value with change detection.
///
/// `set()` compares the new value with the current one and only stores it when
/// they differ. The write lock is never held while a notification runs, so a
/// slot reacting to the change can read the property freely.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
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

impl<T: Clone> Property<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current == value {
            return None;
        }
        let old = std::mem::replace(&mut *current, value);
        tracing::trace!(target: targets::PROPERTY, "property changed");
        Some(old)
    }

    /// Set the value and emit `signal` once if it changed.
    ///
    /// The lock is released before the signal is emitted.
    pub fn set_and_notify(&self, value: T, signal: &Signal<()>) -> bool {
        let changed = self.set(value);
        if changed {
            signal.emit(());
        }
        changed
    }

    /// Mutate the value in place through a closure.
    ///
    /// Returns `true` if the value compares unequal afterwards.
    pub fn update<F>(&self, f: F) -> bool
    where
        T: Clone,
        F: FnOnce(&mut T),
    {
        let mut current = self.value.write();
        let before = current.clone();
        f(&mut current);
        *current != before
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(Property<String>: Send, Sync);
