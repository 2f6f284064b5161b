//! Event bus for broadcasting show events

use crate::event::ShowEvent;

/// Events held before the oldest start being dropped
pub const DEFAULT_EVENT_LIMIT: usize = 4096;

/// A bounded event queue that systems push to and the host drains.
///
/// Hosts should drain once per frame. A bus that is never drained keeps
/// only the newest `limit` events.
pub struct EventBus {
    events: Vec<ShowEvent>,
    limit: usize,
    dropped: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_EVENT_LIMIT)
    }

    /// A limit of zero is raised to one
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: Vec::new(),
            limit: limit.max(1),
            dropped: 0,
        }
    }

    /// Push an event onto the bus, dropping the oldest one when full
    pub fn push(&mut self, event: ShowEvent) {
        if self.events.len() >= self.limit {
            if self.dropped == 0 {
                log::warn!(
                    "event bus full ({} events); dropping oldest until drained",
                    self.limit
                );
            }
            self.events.remove(0);
            self.dropped += 1;
        }
        self.events.push(event);
    }

    /// Events discarded because the bus was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<ShowEvent> {
        self.dropped = 0;
        std::mem::take(&mut self.events)
    }

    /// Pending events, oldest first
    pub fn pending(&self) -> &[ShowEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyro_core::{EmitterId, FireworkType, Vec3};

    #[test]
    fn test_push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(ShowEvent::Launched {
            id: EmitterId(1),
            firework_type: FireworkType::Peony,
            origin: Vec3::ZERO,
        });
        bus.push(ShowEvent::Destroyed {
            id: EmitterId(1),
            elapsed: 3.1,
        });

        assert_eq!(bus.len(), 2);
        assert_eq!(bus.pending()[0].emitter(), Some(EmitterId(1)));

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_undrained_bus_keeps_newest() {
        let mut bus = EventBus::with_limit(3);
        for i in 0..5 {
            bus.push(ShowEvent::Destroyed {
                id: EmitterId(i),
                elapsed: 1.0,
            });
        }
        assert_eq!(bus.len(), 3);
        assert_eq!(bus.dropped(), 2);
        assert_eq!(bus.pending()[0].emitter(), Some(EmitterId(2)));

        bus.drain();
        assert_eq!(bus.dropped(), 0);
    }

    #[test]
    fn test_drain_clears() {
        let mut bus = EventBus::new();
        bus.push(ShowEvent::Rejected {
            reason: "duration".into(),
        });

        let _ = bus.drain();
        assert!(bus.drain().is_empty());
    }
}
