//! Process-wide field-update channel.
//!
//! Editors embedded in the canvas are rendered inside the collaborator's own
//! element tree and cannot reach the store; they publish a
//! [`FieldUpdateMessage`] here instead. The application root owns the bus and
//! registers the store's dispatcher once at startup.
//!
//! Delivery is synchronous and ordered. A message published while another is
//! being delivered is queued and delivered after it, so every message is
//! fully applied before the next one starts. Single-threaded: the bus is not
//! `Send`.

use argmap_core::{FieldUpdateMessage, WireEvent};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::{Rc, Weak};
use tracing::debug;

type Handler = Box<dyn FnMut(&FieldUpdateMessage)>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
    pending: VecDeque<FieldUpdateMessage>,
    dispatching: bool,
    /// Handlers dropped while their list was checked out for delivery.
    cancelled: HashSet<u64>,
}

/// Cloneable handle to the shared channel.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("subscribers", &inner.handlers.len())
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It stays registered until the returned guard drops.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(&self, handler: impl FnMut(&FieldUpdateMessage) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, Box::new(handler)));
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.handlers.len()
    }

    /// Fire and forget. With no subscribers the message is dropped.
    pub fn publish(&self, message: FieldUpdateMessage) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.pending.push_back(message);
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
        }

        loop {
            let (message, mut handlers) = {
                let mut inner = self.inner.borrow_mut();
                match inner.pending.pop_front() {
                    Some(message) => (message, std::mem::take(&mut inner.handlers)),
                    None => {
                        inner.dispatching = false;
                        break;
                    }
                }
            };

            for (_, handler) in handlers.iter_mut() {
                handler(&message);
            }

            let mut inner = self.inner.borrow_mut();
            let added = std::mem::take(&mut inner.handlers);
            let cancelled = std::mem::take(&mut inner.cancelled);
            handlers.retain(|(id, _)| !cancelled.contains(id));
            handlers.extend(added);
            inner.handlers = handlers;
        }
    }

    /// Decode a wire event and publish it. Unknown events, unknown fields and
    /// malformed values are logged and dropped. Returns whether it was published.
    pub fn publish_wire(&self, wire: &WireEvent) -> bool {
        match FieldUpdateMessage::from_wire(wire) {
            Ok(message) => {
                self.publish(message);
                true
            }
            Err(e) => {
                debug!(event = %wire.event, id = %wire.detail.id, "ignoring bus event: {}", e);
                false
            }
        }
    }
}

/// RAII registration on an [`EventBus`].
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.bus.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        let id = self.id;
        inner.handlers.retain(|(hid, _)| *hid != id);
        if inner.dispatching {
            inner.cancelled.insert(id);
        }
    }
}
