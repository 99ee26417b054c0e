use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

pub const EMPTY_GUESS_MESSAGE: &str = "Please enter a guess.";
pub const FETCH_FAILURE_MESSAGE: &str =
    "Failed to fetch image. Please try reloading the page again.";

/// Player-facing errors shown inline next to the guess form.
///
/// Neither kind is fatal: the round stays interactive and the message is
/// cleared as soon as the player edits the guess input or restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
pub enum GameError {
    /// The submitted guess was empty or whitespace only.
    #[error("Please enter a guess.")]
    Validation,
    /// The image provider could not be reached or returned something unusable.
    #[error("Failed to fetch image. Please try reloading the page again.")]
    Fetch,
}
