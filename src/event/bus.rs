use crate::event::{CanvasEvent, EventHandler};

/// Collects canvas events for the host
///
/// Subscribed handlers see each event as it is emitted. Until the first
/// handler subscribes, events are queued instead for hosts that poll with
/// [`EventBus::drain`].
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Box<dyn EventHandler>>,
    pending: Vec<CanvasEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .field("pending", &self.pending)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&mut self, handler: Box<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&mut self, event: CanvasEvent) {
        log::debug!("Canvas event: {event:?}");
        if self.handlers.is_empty() {
            self.pending.push(event);
            return;
        }
        for handler in &mut self.handlers {
            handler.handle_event(&event);
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<CanvasEvent>>>);

    impl EventHandler for Recorder {
        fn handle_event(&mut self, event: &CanvasEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn unsubscribed_bus_queues_until_drained() {
        let mut bus = EventBus::new();
        bus.emit(CanvasEvent::PrimaryColorChanged("#123456".into()));

        assert_eq!(bus.drain(), vec![CanvasEvent::PrimaryColorChanged("#123456".into())]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn subscribed_handlers_take_events_without_queueing() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Recorder(seen.clone())));

        for _ in 0..3 {
            bus.emit(CanvasEvent::SecondaryColorChanged("#654321".into()));
        }

        assert_eq!(seen.lock().unwrap().len(), 3);
        assert!(bus.drain().is_empty());
    }
}
