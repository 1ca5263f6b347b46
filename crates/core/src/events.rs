//! Grid notifications
//!
//! The grid reports every mutation to an [`EventBus`]. Any number of handlers
//! can subscribe, either to a single [`GridEventKind`] or to all of them, and
//! are invoked synchronously, in subscription order, at the point of mutation.
//!
//! [`EventRecorder`] is a ready-made subscriber that buffers events so a host
//! can drain them once per frame instead of reacting inside the callback.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::types::{GridEvent, GridEventKind};

type Handler = Box<dyn FnMut(GridEvent)>;

/// Token returned by a subscription, used to unsubscribe again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

struct Subscriber {
    id: SubscriptionId,
    filter: Option<GridEventKind>,
    handler: Handler,
}

/// Observer list for grid events.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event kind.
    pub fn subscribe(&mut self, handler: impl FnMut(GridEvent) + 'static) -> SubscriptionId {
        self.push(None, Box::new(handler))
    }

    /// Subscribe to a single event kind.
    pub fn subscribe_kind(
        &mut self,
        kind: GridEventKind,
        handler: impl FnMut(GridEvent) + 'static,
    ) -> SubscriptionId {
        self.push(Some(kind), Box::new(handler))
    }

    /// Remove a subscription. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver an event to every matching subscriber.
    pub fn emit(&mut self, event: GridEvent) {
        let kind = event.kind();
        for sub in &mut self.subscribers {
            if sub.filter.map_or(true, |f| f == kind) {
                (sub.handler)(event);
            }
        }
    }

    fn push(&mut self, filter: Option<GridEventKind>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push(Subscriber {
            id,
            filter,
            handler,
        });
        id
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Buffering subscriber.
///
/// Clones share the same buffer, so one clone can be moved into the bus
/// while the host keeps another to drain from.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<GridEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler to pass to [`EventBus::subscribe`].
    pub fn sink(&self) -> impl FnMut(GridEvent) + 'static {
        let events = Rc::clone(&self.events);
        move |event| events.borrow_mut().push(event)
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Number of buffered events of one kind.
    pub fn count(&self, kind: GridEventKind) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }
}
