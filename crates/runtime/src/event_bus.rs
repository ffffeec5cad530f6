use tokio::sync::mpsc::UnboundedSender;

/// Outbound side of the event bridge.
///
/// Implementors carry events from the owning task to whoever listens on the
/// declarative side. Delivery is fire-and-forget.
pub trait EventSink<E> {
    fn send(&mut self, event: E);
}

/// In-order queue of outbound events, drained by the host.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[E] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

impl<E> EventSink<E> for EventBus<E> {
    fn send(&mut self, event: E) {
        self.emit(event);
    }
}

impl<E: std::fmt::Debug> EventSink<E> for UnboundedSender<E> {
    fn send(&mut self, event: E) {
        // A closed channel means the declarative side went away; nothing to notify.
        if let Err(err) = UnboundedSender::<E>::send(&*self, event) {
            tracing::debug!("dropping event for closed channel: {:?}", err.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventSink};

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.send("a");
        bus.send("b");
        assert_eq!(bus.events(), &["a", "b"]);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(1u32);
        let drained = bus.drain();
        assert_eq!(drained, vec![1]);
        assert!(bus.is_empty());
    }

    #[test]
    fn channel_sink_forwards_and_tolerates_closed_receiver() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        EventSink::send(&mut tx, 7u32);
        assert_eq!(rx.try_recv().ok(), Some(7));

        drop(rx);
        EventSink::send(&mut tx, 8u32);
    }
}
