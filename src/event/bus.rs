use std::cell::RefCell;
use std::rc::Rc;

use uuid::Uuid;

use crate::event::EventHandler;

/// Handle returned by [`EventBus::subscribe`], used to cancel a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A single notification channel broadcasting `E` to registered handlers
pub struct EventBus<E> {
    handlers: RefCell<Vec<(SubscriptionId, Rc<dyn EventHandler<E>>)>>,
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: impl EventHandler<E> + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if the id was not subscribed here.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Emit an event to all registered handlers, in subscription order.
    ///
    /// The handler list is copied before dispatch so handlers may subscribe
    /// or unsubscribe (on this bus or any other) while being notified.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Rc<dyn EventHandler<E>>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            handler.handle_event(event);
        }
    }
}
