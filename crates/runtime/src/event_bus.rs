use crate::frame::Frame;

/// An event stamped with the frame it was emitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub frame_index: u64,
    pub event: E,
}

/// Outbound event queue. Events are delivered in emission order when drained.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Stamped<E>>,
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

    pub fn emit(&mut self, frame: Frame, event: E) {
        self.events.push(Stamped {
            frame_index: frame.index,
            event,
        });
    }

    pub fn events(&self) -> &[Stamped<E>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use crate::frame::FrameClock;
    use foundation::time::Time;

    #[derive(Debug, Clone, PartialEq)]
    enum Ev {
        A,
        B(u32),
    }

    #[test]
    fn records_events_with_frame_index() {
        let mut clock = FrameClock::new();
        clock.advance(Time(0.0));
        let f = clock.advance(Time(0.1));
        let mut bus = EventBus::new();
        bus.emit(f, Ev::A);
        assert_eq!(bus.len(), 1);
        assert_eq!(bus.events()[0].frame_index, 1);
    }

    #[test]
    fn drain_preserves_order_and_clears() {
        let mut clock = FrameClock::new();
        let f = clock.advance(Time(0.0));
        let mut bus = EventBus::new();
        bus.emit(f, Ev::B(1));
        bus.emit(f, Ev::A);
        let drained: Vec<Ev> = bus.drain().into_iter().map(|s| s.event).collect();
        assert_eq!(drained, vec![Ev::B(1), Ev::A]);
        assert!(bus.is_empty());
    }
}
