#![allow(dead_code)]

use game_core::{Intent, RoundEvent, RoundEventHandler, RoundId, RoundState, Transition};
use std::sync::{Arc, Mutex};

pub const AFGHAN_HOUND_URL: &str =
    "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg";
pub const CORGI_URL: &str = "https://images.dog.ceo/breeds/corgi/x.jpg";

/// Starts the first round of a session
pub fn start_round() -> RoundState {
    RoundState::begin(RoundId::FIRST).state
}

/// Delivers the image for the state's current round
pub fn load_image(state: &RoundState, url: &str) -> RoundState {
    state
        .transition(Intent::ImageLoaded {
            round: state.round_id(),
            url: url.to_string(),
        })
        .state
}

/// Creates a round whose answer is already known
pub fn round_with_image(url: &str) -> RoundState {
    load_image(&start_round(), url)
}

/// Types a guess into the input and submits it, as the guess form does
pub fn type_and_submit(state: &RoundState, text: &str) -> Transition {
    let typed = state
        .transition(Intent::EditGuessInput(text.to_string()))
        .state;
    let current = typed.current_guess_text().to_string();
    typed.transition(Intent::SubmitGuess(current))
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<RoundEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<RoundEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&RoundEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl RoundEventHandler for EventCollector {
    fn handle_event(&self, event: &RoundEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
