mod bus;
mod events;

pub use bus::{EventBus, SubscriptionId};
pub use events::*;

pub trait EventHandler<E> {
    fn handle_event(&self, event: &E);
}

impl<E, F> EventHandler<E> for F
where
    F: Fn(&E),
{
    fn handle_event(&self, event: &E) {
        self(event)
    }
}
