//! Core systems for Canvas Grid.
//!
//! This crate provides the small reactive foundation the grid is built on:
//!
//! - **Signal/Slot System**: Typed, synchronous, re-entrant-safe notification channels
//! - **Property System**: Values with change detection, used for renderer policy
//! - **Logging**: `tracing` target names and performance spans shared by all crates
//!
//! Everything here runs on one logical thread. Signals are `Send + Sync` so they can
//! live inside shared models and renderers, but emission never defers or queues: a slot
//! runs on the emitting call stack, and nested emissions follow ordinary call order.
//!
//! # Signal/Slot Example
//!
//! ```
//! use canvas_grid_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use canvas_grid_core::{Property, Signal};
//!
//! struct Counter {
//!     value: Property<i32>,
//!     changed: Signal<()>,
//! }
//!
//! impl Counter {
//!     fn set(&self, value: i32) {
//!         if self.value.set(value) {
//!             self.changed.emit(());
//!         }
//!     }
//! }
//!
//! let counter = Counter { value: Property::new(0), changed: Signal::new() };
//! counter.set(0); // unchanged, nothing emitted
//! counter.set(1);
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
