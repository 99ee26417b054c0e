use std::fmt;

use game_types::{EndReason, GameError, ImageStatus, RoundOutcome, RoundPhase, RoundView};
use tracing::debug;

use crate::breed::{derive_breed_name, is_correct_guess, reveal_answer};
use crate::RoundEvent;

/// Monotonic round identifier, used to tag image requests so that a result
/// arriving after a restart can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundId(pub u64);

impl RoundId {
    pub const FIRST: RoundId = RoundId(1);

    pub fn next(self) -> Self {
        RoundId(self.0 + 1)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything that can happen to a round: user intents forwarded by the
/// render surface plus the completion of the round's image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    EditGuessInput(String),
    SubmitGuess(String),
    GiveUp,
    Restart,
    ImageLoaded { round: RoundId, url: String },
    ImageFailed { round: RoundId, reason: String },
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Intent::EditGuessInput(_) => "EditGuessInput",
            Intent::SubmitGuess(_) => "SubmitGuess",
            Intent::GiveUp => "GiveUp",
            Intent::Restart => "Restart",
            Intent::ImageLoaded { .. } => "ImageLoaded",
            Intent::ImageFailed { .. } => "ImageFailed",
        }
    }
}

/// Side effect the host must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RequestImage(RoundId),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: RoundState,
    pub effect: Option<Effect>,
    pub events: Vec<RoundEvent>,
}

impl Transition {
    fn unchanged(state: RoundState) -> Self {
        Self {
            state,
            effect: None,
            events: Vec::new(),
        }
    }

    fn with_event(state: RoundState, event: RoundEvent) -> Self {
        Self {
            state,
            effect: None,
            events: vec![event],
        }
    }
}

/// State of a single round. Never mutated in place: every intent produces a
/// new record through [`RoundState::transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    round_id: RoundId,
    current_guess_text: String,
    answer_breed: String,
    guess_history: Vec<String>,
    image_url: String,
    image_status: ImageStatus,
    error: Option<GameError>,
    phase: RoundPhase,
    end_reason: Option<EndReason>,
}

impl RoundState {
    fn fresh(round_id: RoundId) -> Self {
        Self {
            round_id,
            current_guess_text: String::new(),
            answer_breed: String::new(),
            guess_history: Vec::new(),
            image_url: String::new(),
            image_status: ImageStatus::Pending,
            error: None,
            phase: RoundPhase::AwaitingGuess,
            end_reason: None,
        }
    }

    /// Start a round and ask the host for its image.
    pub fn begin(round_id: RoundId) -> Transition {
        Transition {
            state: Self::fresh(round_id),
            effect: Some(Effect::RequestImage(round_id)),
            events: vec![RoundEvent::RoundStarted { round: round_id }],
        }
    }

    pub fn transition(&self, intent: Intent) -> Transition {
        let name = intent.name();
        let transition = match intent {
            Intent::EditGuessInput(text) => self.edit_guess_input(text),
            Intent::SubmitGuess(text) => self.submit_guess(text),
            Intent::GiveUp => self.give_up(),
            Intent::Restart => RoundState::begin(self.round_id.next()),
            Intent::ImageLoaded { round, url } => self.image_loaded(round, url),
            Intent::ImageFailed { round, reason } => self.image_failed(round, reason),
        };
        debug!(
            round = %self.round_id,
            intent = name,
            phase = ?transition.state.phase,
            "Applied round intent"
        );
        transition
    }

    fn edit_guess_input(&self, text: String) -> Transition {
        let mut next = self.clone();
        next.current_guess_text = text;
        next.error = None;
        Transition::unchanged(next)
    }

    fn submit_guess(&self, text: String) -> Transition {
        if self.is_ended() {
            return self.ignore("SubmitGuess");
        }

        if text.trim().is_empty() {
            let mut next = self.clone();
            next.error = Some(GameError::Validation);
            return Transition::with_event(next, RoundEvent::GuessRejected {
                round: self.round_id,
            });
        }

        let mut next = self.clone();
        let solved = is_correct_guess(&text, &self.answer_breed);
        next.guess_history.push(text.clone());
        next.current_guess_text.clear();

        let guess_count = next.guess_count();
        let mut events = vec![RoundEvent::GuessSubmitted {
            round: self.round_id,
            guess: text,
            guess_count,
        }];

        if solved {
            next.phase = RoundPhase::Ended;
            next.end_reason = Some(EndReason::Solved);
            events.push(RoundEvent::RoundSolved {
                round: self.round_id,
                guess_count,
            });
        }

        Transition {
            state: next,
            effect: None,
            events,
        }
    }

    fn give_up(&self) -> Transition {
        if self.is_ended() {
            return self.ignore("GiveUp");
        }

        let mut next = self.clone();
        next.phase = RoundPhase::Ended;
        next.end_reason = Some(EndReason::GaveUp);
        Transition::with_event(next, RoundEvent::RoundAbandoned {
            round: self.round_id,
            guess_count: self.guess_count(),
        })
    }

    fn image_loaded(&self, round: RoundId, url: String) -> Transition {
        if round != self.round_id {
            return self.discard_stale(round);
        }
        // The answer is fixed for the round once known
        if self.image_status == ImageStatus::Loaded {
            return self.ignore("ImageLoaded");
        }

        match derive_breed_name(&url) {
            Ok(breed) => {
                let mut next = self.clone();
                next.image_url = url.clone();
                next.answer_breed = breed;
                next.image_status = ImageStatus::Loaded;
                next.error = None;
                Transition::with_event(next, RoundEvent::ImageLoaded { round, url })
            }
            Err(e) => self.image_failed(round, e.to_string()),
        }
    }

    fn image_failed(&self, round: RoundId, reason: String) -> Transition {
        if round != self.round_id {
            return self.discard_stale(round);
        }
        if self.image_status == ImageStatus::Loaded {
            return self.ignore("ImageFailed");
        }

        let mut next = self.clone();
        next.image_url.clear();
        next.answer_breed.clear();
        next.image_status = ImageStatus::Failed;
        next.error = Some(GameError::Fetch);
        Transition::with_event(next, RoundEvent::ImageFailed { round, reason })
    }

    fn discard_stale(&self, round: RoundId) -> Transition {
        Transition::with_event(self.clone(), RoundEvent::StaleImageDiscarded {
            round,
            current: self.round_id,
        })
    }

    fn ignore(&self, intent: &'static str) -> Transition {
        Transition::with_event(self.clone(), RoundEvent::IntentIgnored {
            round: self.round_id,
            intent,
        })
    }

    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    pub fn current_guess_text(&self) -> &str {
        &self.current_guess_text
    }

    pub fn answer_breed(&self) -> &str {
        &self.answer_breed
    }

    pub fn guess_history(&self) -> &[String] {
        &self.guess_history
    }

    pub fn guess_count(&self) -> u32 {
        self.guess_history.len() as u32
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn image_status(&self) -> ImageStatus {
        self.image_status
    }

    pub fn error(&self) -> Option<&GameError> {
        self.error.as_ref()
    }

    /// Inline error text, empty when there is nothing to show.
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(|e| e.to_string()).unwrap_or_default()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == RoundPhase::Ended
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        let reason = self.end_reason?;
        let answer = reveal_answer(&self.answer_breed);
        Some(RoundOutcome {
            reason,
            answer_message: format!("The correct breed was {}.", answer),
            guess_count_message: format!("You guessed {} times.", self.guess_count()),
            answer,
        })
    }

    /// Project the round into what the render surface is allowed to see.
    pub fn view(&self) -> RoundView {
        RoundView {
            round_id: self.round_id.0,
            phase: self.phase,
            image_status: self.image_status,
            image_url: (!self.image_url.is_empty()).then(|| self.image_url.clone()),
            current_guess: self.current_guess_text.clone(),
            error_message: self.error.as_ref().map(|e| e.to_string()),
            guess_history: self.guess_history.clone(),
            guess_count: self.guess_count(),
            outcome: self.outcome(),
        }
    }
}
