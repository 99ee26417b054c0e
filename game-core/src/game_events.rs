use crate::RoundId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    RoundStarted {
        round: RoundId,
    },
    GuessRejected {
        round: RoundId,
    },
    GuessSubmitted {
        round: RoundId,
        guess: String,
        guess_count: u32,
    },
    RoundSolved {
        round: RoundId,
        guess_count: u32,
    },
    RoundAbandoned {
        round: RoundId,
        guess_count: u32,
    },
    ImageLoaded {
        round: RoundId,
        url: String,
    },
    ImageFailed {
        round: RoundId,
        reason: String,
    },
    StaleImageDiscarded {
        round: RoundId,
        current: RoundId,
    },
    IntentIgnored {
        round: RoundId,
        intent: &'static str,
    },
}

impl RoundEvent {
    /// The round the event refers to. For a discarded image this is the
    /// superseded round, not the active one.
    pub fn round(&self) -> RoundId {
        match self {
            RoundEvent::RoundStarted { round } => *round,
            RoundEvent::GuessRejected { round } => *round,
            RoundEvent::GuessSubmitted { round, .. } => *round,
            RoundEvent::RoundSolved { round, .. } => *round,
            RoundEvent::RoundAbandoned { round, .. } => *round,
            RoundEvent::ImageLoaded { round, .. } => *round,
            RoundEvent::ImageFailed { round, .. } => *round,
            RoundEvent::StaleImageDiscarded { round, .. } => *round,
            RoundEvent::IntentIgnored { round, .. } => *round,
        }
    }
}

/// Event handler trait for processing round events
pub trait RoundEventHandler: Send + Sync {
    fn handle_event(&self, event: &RoundEvent);
}

/// Simple event bus for distributing round events
pub struct RoundEventBus {
    handlers: Vec<Box<dyn RoundEventHandler>>,
}

impl RoundEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn RoundEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&self, event: &RoundEvent) {
        for handler in &self.handlers {
            handler.handle_event(event);
        }
    }

    pub fn publish_all(&self, events: &[RoundEvent]) {
        for event in events {
            self.publish(event);
        }
    }
}

impl Default for RoundEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct TestHandler {
        events: Arc<Mutex<Vec<RoundEvent>>>,
    }

    impl RoundEventHandler for TestHandler {
        fn handle_event(&self, event: &RoundEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_event_bus() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut bus = RoundEventBus::new();
        bus.add_handler(Box::new(TestHandler {
            events: events.clone(),
        }));
        bus.add_handler(Box::new(TestHandler {
            events: events.clone(),
        }));

        bus.publish(&RoundEvent::RoundStarted { round: RoundId(7) });

        let seen = events.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].round(), RoundId(7));
    }

    #[test]
    fn test_stale_event_reports_superseded_round() {
        let event = RoundEvent::StaleImageDiscarded {
            round: RoundId(1),
            current: RoundId(3),
        };
        assert_eq!(event.round(), RoundId(1));
    }
}
