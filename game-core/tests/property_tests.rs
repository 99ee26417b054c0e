//! Property-based tests for the round state machine.

mod common;

use common::*;
use game_core::{Effect, Intent, RoundState};
use game_types::{RoundPhase, EMPTY_GUESS_MESSAGE};
use proptest::prelude::*;

prop_compose! {
    fn arbitrary_intent()(variant in 0..4u8, text in "[ a-zA-Z]{0,12}") -> Intent {
        match variant {
            0 => Intent::EditGuessInput(text),
            1 => Intent::SubmitGuess(text),
            2 => Intent::GiveUp,
            _ => Intent::Restart,
        }
    }
}

fn arbitrary_round() -> impl Strategy<Value = RoundState> {
    prop::collection::vec(arbitrary_intent(), 0..12).prop_map(|intents| {
        intents
            .into_iter()
            .fold(round_with_image(AFGHAN_HOUND_URL), |state, intent| {
                let next = state.transition(intent).state;
                if next.round_id() != state.round_id() {
                    load_image(&next, CORGI_URL)
                } else {
                    next
                }
            })
    })
}

proptest! {
    #[test]
    fn non_empty_guess_is_appended(state in arbitrary_round(), guess in "[a-zA-Z][ a-zA-Z]{0,10}") {
        prop_assume!(state.phase() == RoundPhase::AwaitingGuess);

        let next = state.transition(Intent::SubmitGuess(guess.clone())).state;
        prop_assert_eq!(next.guess_count(), state.guess_count() + 1);
        prop_assert_eq!(next.guess_history().last(), Some(&guess));
        prop_assert_eq!(next.current_guess_text(), "");
    }

    #[test]
    fn blank_guess_never_mutates_history(state in arbitrary_round(), blank in "[ \t]{0,6}") {
        let next = state.transition(Intent::SubmitGuess(blank)).state;
        prop_assert_eq!(next.guess_history(), state.guess_history());
        prop_assert_eq!(next.guess_count(), state.guess_count());
        if state.phase() == RoundPhase::AwaitingGuess {
            prop_assert_eq!(next.error_message(), EMPTY_GUESS_MESSAGE);
        }
    }

    #[test]
    fn matching_guess_ends_round_in_any_case(upper in prop::collection::vec(any::<bool>(), 12)) {
        let guess: String = "afghan hound"
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();

        let state = round_with_image(AFGHAN_HOUND_URL);
        let next = state.transition(Intent::SubmitGuess(guess)).state;
        prop_assert!(next.is_ended());
    }

    #[test]
    fn give_up_always_ends_without_mutation(state in arbitrary_round()) {
        let next = state.transition(Intent::GiveUp).state;
        prop_assert!(next.is_ended());
        prop_assert_eq!(next.guess_history(), state.guess_history());
        prop_assert_eq!(next.guess_count(), state.guess_count());
    }

    #[test]
    fn restart_always_resets(state in arbitrary_round()) {
        let t = state.transition(Intent::Restart);
        prop_assert!(t.state.guess_history().is_empty());
        prop_assert_eq!(t.state.guess_count(), 0);
        prop_assert_eq!(t.state.current_guess_text(), "");
        prop_assert_eq!(t.state.error_message(), "");
        prop_assert!(!t.state.is_ended());
        prop_assert!(t.state.round_id() > state.round_id());
        prop_assert_eq!(t.effect, Some(Effect::RequestImage(t.state.round_id())));
    }

    #[test]
    fn guess_count_matches_history(state in arbitrary_round()) {
        prop_assert_eq!(state.guess_count() as usize, state.guess_history().len());
    }

    #[test]
    fn stale_results_never_change_state(state in arbitrary_round(), url in "https://x/breeds/[a-z]{1,8}/a\\.jpg") {
        let next = state.transition(Intent::Restart).state;
        let stale = next.transition(Intent::ImageLoaded { round: state.round_id(), url }).state;
        prop_assert_eq!(stale, next);
    }
}
