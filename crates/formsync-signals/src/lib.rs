//! # formsync-signals
//!
//! Signal dispatcher for formsync. A [`Signal`] lets the form aggregate
//! notify any number of observers (typically the rendering layer) that state
//! changed, without knowing who they are.
//!
//! Receivers are invoked synchronously, in connection order, on the thread
//! that calls [`Signal::send`]. The receiver list is snapshotted before
//! dispatch, so a receiver may connect or disconnect receivers (including
//! itself) without deadlocking; such changes take effect on the next send.
//!
//! ## Usage
//!
//! ```
//! use formsync_signals::Signal;
//! use std::sync::Arc;
//!
//! let signal: Signal<String> = Signal::new();
//!
//! signal.connect("logger", Arc::new(|name: &String| {
//!     println!("{name} changed");
//! }));
//!
//! assert_eq!(signal.send(&"email".to_string()), 1);
//! ```

use std::fmt;
use std::sync::{Arc, RwLock};

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that a signal can live inside
/// shareable state.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A signal that can be connected to and dispatched.
///
/// Each signal carries a payload type `T`. Receivers are called in the order
/// they were connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_ids())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// The `receiver_id` is used to identify the receiver for later disconnection.
    /// If a receiver with the same ID is already connected, it is replaced in place
    /// and keeps its position in the dispatch order.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().expect("signal lock poisoned");

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given ID.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().expect("signal lock poisoned");
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers.
    ///
    /// Returns the number of receivers that were called.
    pub fn send(&self, payload: &T) -> usize {
        let snapshot: Vec<SignalReceiver<T>> = {
            let receivers = self.receivers.read().expect("signal lock poisoned");
            receivers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        tracing::trace!(receivers = snapshot.len(), "dispatching signal");
        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().expect("signal lock poisoned").len()
    }

    /// Returns the IDs of the connected receivers in dispatch order.
    pub fn receiver_ids(&self) -> Vec<String> {
        self.receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}
