//! Signal/slot system for the site layer.
//!
//! A [`Signal`] is emitted by a component when something observable happens
//! (a card gained focus, the lightbox opened, a form was submitted), and every
//! connected slot is invoked with the emitted value.
//!
//! The page runs on a single thread, so signals are deliberately `!Send`:
//! slots may capture `Rc` handles and browser objects. Slots are invoked
//! directly, in connection order.
//!
//! # Re-entrancy
//!
//! The slot list is snapshotted before invocation, so a slot may connect or
//! disconnect slots (including itself) or emit other signals while running.
//! Changes take effect from the next emission.
//!
//! # Example
//!
//! ```
//! use enray_site_core::Signal;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let focus_changed = Signal::<usize>::new();
//! let last = Rc::new(Cell::new(None));
//!
//! let sink = last.clone();
//! let conn_id = focus_changed.connect(move |index| sink.set(Some(*index)));
//!
//! focus_changed.emit(3);
//! assert_eq!(last.get(), Some(3));
//!
//! focus_changed.disconnect(conn_id);
//! focus_changed.emit(4);
//! assert_eq!(last.get(), Some(3));
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Rc<dyn Fn(&Args)>;

/// A type-safe notification channel with any number of connected slots.
pub struct Signal<Args> {
    connections: RefCell<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: Cell<bool>,
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
            connections: RefCell::new(SlotMap::with_key()),
            blocked: Cell::new(false),
        }
    }

    /// Connect a slot to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + 'static,
    {
        self.connections.borrow_mut().insert(Rc::new(slot))
    }

    /// Disconnect a slot by its connection ID.
    ///
    /// Returns `true` if the connection existed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.borrow_mut().remove(id).is_some()
    }

    /// Disconnect all slots.
    pub fn disconnect_all(&self) {
        self.connections.borrow_mut().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.borrow().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.borrow().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    pub fn connect_scoped<F>(self: &Rc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: Rc::downgrade(self),
            id,
        }
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.borrow().len())
            .field("blocked", &self.blocked.get())
            .finish()
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`]. The guard holds a weak reference,
/// so it never keeps the signal alive.
pub struct ConnectionGuard<Args: 'static> {
    signal: std::rc::Weak<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.disconnect(self.id);
        }
    }
}

static_assertions::assert_not_impl_any!(Signal<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_slots_in_order() {
        let signal = Signal::<i32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let a = log.clone();
        signal.connect(move |v| a.borrow_mut().push(("a", *v)));
        let b = log.clone();
        signal.connect(move |v| b.borrow_mut().push(("b", *v)));

        signal.emit(7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
        assert_eq!(signal.connection_count(), 2);
    }

    #[test]
    fn test_blocked_signal_is_silent() {
        let signal = Signal::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        signal.connect(move |_| h.set(h.get() + 1));

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(hits.get(), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_slot_may_disconnect_itself() {
        let signal = Rc::new(Signal::<()>::new());
        let hits = Rc::new(Cell::new(0));
        let id_cell: Rc<Cell<Option<ConnectionId>>> = Rc::new(Cell::new(None));

        let sig = Rc::downgrade(&signal);
        let h = hits.clone();
        let ids = id_cell.clone();
        let id = signal.connect(move |_| {
            h.set(h.get() + 1);
            if let (Some(sig), Some(id)) = (sig.upgrade(), ids.get()) {
                sig.disconnect(id);
            }
        });
        id_cell.set(Some(id));

        signal.emit(());
        signal.emit(());
        assert_eq!(hits.get(), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_scoped_connection() {
        let signal = Rc::new(Signal::<u8>::new());
        let total = Rc::new(Cell::new(0u32));
        {
            let t = total.clone();
            let _guard = signal.connect_scoped(move |v| t.set(t.get() + u32::from(*v)));
            signal.emit(4);
        }
        signal.emit(5);
        assert_eq!(total.get(), 4);
    }
}
