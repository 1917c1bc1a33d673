//! Signal/slot system for Canvas Grid.
//!
//! This module provides the typed publish/subscribe channel used by data models
//! (structural and content change notifications) and cell renderers ("changed"
//! notifications). Each model or renderer instance owns its own signals; there is
//! no global dispatcher.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Emission Semantics
//!
//! - Slots are invoked synchronously, on the emitting call stack, in the order
//!   they were connected.
//! - The connection table is snapshotted before the first slot runs and no lock is
//!   held while slots run. A slot may therefore emit (the nested emission completes
//!   before the outer one continues), connect (the new slot is not called for the
//!   in-flight emission) or disconnect (a slot removed before its turn is skipped).
//!
//! # Example
//!
//! ```
//! use canvas_grid_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// Keys are versioned, so an ID never aliases a later connection that reuses
    /// the same slot.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Slot<Args>,
    /// Monotonic subscription sequence; slot map iteration order is not insertion order.
    seq: u64,
}

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no payload, or a struct/tuple for richer payloads.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    blocked: AtomicBool,
    next_seq: AtomicU64,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.connections.lock().insert(Connection {
            slot: Arc::new(slot),
            seq,
        })
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Returns `true` if the given connection is still attached.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.lock().contains_key(id)
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in subscription order.
    #[tracing::instrument(skip_all, target = "canvas_grid::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let snapshot = self.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = snapshot.len(), "emitting signal");

        for (id, slot) in snapshot {
            if !self.is_connected(id) {
                continue;
            }
            slot(&args);
        }
    }

    fn snapshot(&self) -> Vec<(ConnectionId, Slot<Args>)> {
        let connections = self.connections.lock();
        let mut entries: Vec<_> = connections
            .iter()
            .map(|(id, conn)| (conn.seq, id, conn.slot.clone()))
            .collect();
        drop(connections);

        entries.sort_unstable_by_key(|(seq, _, _)| *seq);
        entries.into_iter().map(|(_, id, slot)| (id, slot)).collect()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.lock(), vec![1, 3]);
    }

    #[test]
    fn test_subscription_order_survives_slot_reuse() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let ids: Vec<_> = (0..3)
            .map(|n| {
                let order = order.clone();
                signal.connect(move |_| order.lock().push(n))
            })
            .collect();

        // Freeing the first slot lets the slot map hand it to the next connection.
        signal.disconnect(ids[0]);
        let order_clone = order.clone();
        signal.connect(move |_| order_clone.lock().push(3));

        signal.emit(());
        assert_eq!(*order.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn test_nested_emit_runs_inline() {
        let outer = Arc::new(Signal::<u32>::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_a = log.clone();
        let outer_clone = outer.clone();
        outer.connect(move |&depth| {
            log_a.lock().push(("a", depth));
            if depth == 0 {
                outer_clone.emit(1);
            }
        });
        let log_b = log.clone();
        outer.connect(move |&depth| log_b.lock().push(("b", depth)));

        outer.emit(0);
        assert_eq!(
            *log.lock(),
            vec![("a", 0), ("a", 1), ("b", 1), ("b", 0)]
        );
    }

    #[test]
    fn test_connect_during_emit_not_called_for_in_flight_emission() {
        let signal = Arc::new(Signal::<()>::new());
        let late_calls = Arc::new(AtomicUsize::new(0));

        let signal_clone = signal.clone();
        let late_clone = late_calls.clone();
        signal.connect(move |_| {
            let late = late_clone.clone();
            signal_clone.connect(move |_| {
                late.fetch_add(1, Ordering::SeqCst);
            });
        });

        signal.emit(());
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        assert_eq!(signal.connection_count(), 2);

        signal.emit(());
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnect_during_emit_skips_pending_slot() {
        let signal = Arc::new(Signal::<()>::new());
        let second_calls = Arc::new(AtomicUsize::new(0));
        let second_id = Arc::new(Mutex::new(None));

        let signal_clone = signal.clone();
        let id_slot = second_id.clone();
        signal.connect(move |_| {
            if let Some(id) = *id_slot.lock() {
                signal_clone.disconnect(id);
            }
        });

        let calls = second_calls.clone();
        *second_id.lock() = Some(signal.connect(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        }));

        signal.emit(());
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(signal.connection_count(), 1);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();

        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_signal_with_struct_payload() {
        #[derive(Debug, Clone, PartialEq)]
        struct Range {
            start: usize,
            end: usize,
        }

        let signal = Signal::<Range>::new();
        let received = Arc::new(Mutex::new(None));

        let received_clone = received.clone();
        signal.connect(move |range| {
            *received_clone.lock() = Some(range.clone());
        });

        signal.emit(Range { start: 5, end: 8 });
        assert_eq!(*received.lock(), Some(Range { start: 5, end: 8 }));
    }
}
