mod bus;
mod events;

pub use bus::EventBus;
pub use events::AppEvent;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &AppEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&AppEvent) + Send,
{
    fn handle_event(&mut self, event: &AppEvent) {
        self(event)
    }
}
