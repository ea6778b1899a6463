//! Signal/slot system for Lattice Binding.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism used by
//! every observable collection in the workspace. Signals are emitted by a list
//! when its state changes, and connected slots (callbacks) are invoked in
//! response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Dispatch Model
//!
//! Emission is synchronous. Every slot runs on the emitting thread, inside the
//! call to [`Signal::emit`], in the order the slots were connected. The
//! connection table is not locked while slots run, so a slot may connect or
//! disconnect other slots; slots connected during an emission are first called
//! by the next emission.
//!
//! A slot that mutates the object which emitted the signal re-enters that
//! object while it is still inside its own mutator. Nothing here prevents that;
//! callers own the consequences.
//!
//! # Example
//!
//! ```
//! use lattice_binding_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let text_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! // Emit the signal
//! text_changed.emit("Hello, World!".to_string());
//!
//! // Disconnect when done
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke.
    slot: Slot<Args>,
    /// Registration sequence number; slot keys are reused, this is not.
    seq: u64,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with a reference
/// to the provided arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
    /// Source of registration sequence numbers.
    next_seq: AtomicU64,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
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
    ///
    /// # Example
    ///
    /// ```
    /// use lattice_binding_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.connections.lock().insert(connection)
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

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` will do nothing. This is useful
    /// during batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in registration order.
    ///
    /// If the signal is blocked, this does nothing.
    #[tracing::instrument(skip_all, target = "lattice_binding_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots = self.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }

    /// Copies out the current slots so none of them runs under the lock.
    fn snapshot(&self) -> Vec<Slot<Args>> {
        let connections = self.connections.lock();
        let mut ordered: Vec<_> = connections
            .values()
            .map(|conn| (conn.seq, conn.slot.clone()))
            .collect();
        drop(connections);

        ordered.sort_unstable_by_key(|(seq, _)| *seq);
        ordered.into_iter().map(|(_, slot)| slot).collect()
    }

    /// Connect a slot that is disconnected when the returned guard drops.
    ///
    /// The guard only holds a weak reference, so it never keeps the signal
    /// alive; dropping the guard after the signal is gone is a no-op.
    ///
    /// # Example
    ///
    /// ```
    /// use lattice_binding_core::Signal;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let signal = Arc::new(Signal::<i32>::new());
    /// let counter = Arc::new(AtomicI32::new(0));
    /// {
    ///     let counter_clone = counter.clone();
    ///     let _guard = signal.connect_scoped(move |&n| {
    ///         counter_clone.fetch_add(n, Ordering::SeqCst);
    ///     });
    ///     signal.emit(42);  // counter = 42
    /// }
    /// signal.emit(43);  // Nothing happens - connection was dropped
    /// assert_eq!(counter.load(Ordering::SeqCst), 42);
    /// ```
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        let weak: Weak<Self> = Arc::downgrade(self);
        ConnectionGuard::new(move || {
            if let Some(signal) = weak.upgrade() {
                signal.disconnect(id);
            }
        })
    }
}

/// A connection guard that runs a disconnect action when dropped.
///
/// Created via [`Signal::connect_scoped`], or with [`ConnectionGuard::new`]
/// when the signal lives inside a larger shared object and the caller knows
/// how to reach it again.
#[must_use = "dropping the guard disconnects the slot immediately"]
pub struct ConnectionGuard {
    disconnect: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ConnectionGuard {
    /// Creates a guard that calls `disconnect` exactly once, on drop or on
    /// [`ConnectionGuard::disconnect`].
    pub fn new<F>(disconnect: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            disconnect: Some(Box::new(disconnect)),
        }
    }

    /// Disconnects now instead of waiting for drop.
    pub fn disconnect(mut self) {
        self.run();
    }

    /// Keeps the connection alive forever.
    pub fn forget(mut self) {
        self.disconnect = None;
    }

    fn run(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for ConnectionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("armed", &self.disconnect.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

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

        let values = received.lock();
        assert_eq!(*values, vec![42, 100]);
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

        let values = received.lock();
        assert_eq!(*values, vec![1]);
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

        let values = received.lock();
        assert_eq!(*values, vec![1, 3]);
    }

    #[test]
    fn test_slots_run_in_registration_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let ids: Vec<_> = (0..4)
            .map(|n| {
                let order = order.clone();
                signal.connect(move |_| order.lock().push(n))
            })
            .collect();

        // Free a slot key so the next connection reuses it.
        signal.disconnect(ids[1]);
        let late = order.clone();
        signal.connect(move |_| late.lock().push(9));

        signal.emit(());
        assert_eq!(*order.lock(), vec![0, 2, 3, 9]);
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let hits = Arc::new(AtomicI32::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let sig = Arc::downgrade(&signal);
        let hits_clone = hits.clone();
        let own_id_clone = own_id.clone();
        let id = signal.connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            if let (Some(sig), Some(id)) = (sig.upgrade(), *own_id_clone.lock()) {
                sig.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
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
    fn test_connection_guard() {
        let signal = Arc::new(Signal::<i32>::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let received_clone = received.clone();
            let _guard = signal.connect_scoped(move |&value| {
                received_clone.lock().push(value);
            });
            signal.emit(1);
        }

        signal.emit(2);

        let values = received.lock();
        assert_eq!(*values, vec![1]);
    }

    #[test]
    fn test_guard_outliving_signal() {
        let signal = Arc::new(Signal::<i32>::new());
        let guard = signal.connect_scoped(|_| {});
        drop(signal);
        drop(guard);
    }

    #[test]
    fn test_guard_forget_keeps_connection() {
        let signal = Arc::new(Signal::<i32>::new());
        signal.connect_scoped(|_| {}).forget();
        assert_eq!(signal.connection_count(), 1);
    }
}
