use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundPhase {
    AwaitingGuess,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EndReason {
    Solved,
    GaveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ImageStatus {
    Pending, // Request in flight, nothing to show yet
    Loaded,
    Failed,
}

/// What the render surface shows once a round has ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundOutcome {
    pub reason: EndReason,
    pub answer: String, // Upper-cased for display
    pub answer_message: String,
    pub guess_count_message: String,
}

/// Snapshot of a round as seen by the browser.
///
/// The derived answer is never part of this view while the round is still
/// being played; it only appears inside `outcome` after a correct guess or a
/// give-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundView {
    #[ts(type = "number")]
    pub round_id: u64,
    pub phase: RoundPhase,
    pub image_status: ImageStatus,
    pub image_url: Option<String>,
    pub current_guess: String,
    pub error_message: Option<String>,
    pub guess_history: Vec<String>,
    pub guess_count: u32,
    pub outcome: Option<RoundOutcome>,
}

impl RoundView {
    pub fn is_ended(&self) -> bool {
        self.phase == RoundPhase::Ended
    }

    /// The guess form (submit and give-up) is only offered while guessing.
    pub fn accepts_guesses(&self) -> bool {
        self.phase == RoundPhase::AwaitingGuess
    }
}
