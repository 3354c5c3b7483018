//! Pure reaction state machine
//!
//! All reaction/feedback business logic lives here as a pure,
//! synchronous function: `transition(current, input) -> (next, effects)`.
//! No IO, no async — the caller executes the returned effects.
//!
//! Toggle semantics: re-applying the current reaction clears it and is
//! local-only (no submission). Applying the other reaction replaces it.
//! A thumbs-down opens the detail-capture step before anything is sent;
//! dismissing that step still submits a bare negative signal so the
//! thumbs-down itself is recorded.

use ssassist_protocol::Reaction;

/// User input to the per-turn reaction state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionInput {
    ThumbsUp,
    ThumbsDown,
    /// Detail-capture step completed with content
    DetailSubmitted {
        issues: Vec<String>,
        comment: String,
    },
    /// Detail-capture step dismissed without content
    DetailDismissed,
}

/// Side effects the caller must carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionEffect {
    /// Send one feedback submission for this turn
    Submit {
        reaction: Reaction,
        issues: Option<Vec<String>>,
        comment: Option<String>,
    },
    /// Open the detail-capture step (issue tags + free text)
    OpenDetailCapture,
}

/// Apply one input to the current reaction state.
pub fn transition(
    current: Option<Reaction>,
    input: ReactionInput,
) -> (Option<Reaction>, Vec<ReactionEffect>) {
    match input {
        ReactionInput::ThumbsUp => {
            if current == Some(Reaction::Positive) {
                // Toggle-off: local only, nothing is re-sent
                (None, vec![])
            } else {
                (
                    Some(Reaction::Positive),
                    vec![ReactionEffect::Submit {
                        reaction: Reaction::Positive,
                        issues: None,
                        comment: None,
                    }],
                )
            }
        }
        ReactionInput::ThumbsDown => {
            if current == Some(Reaction::Negative) {
                (None, vec![])
            } else {
                // Nothing is submitted until the detail step resolves
                (
                    Some(Reaction::Negative),
                    vec![ReactionEffect::OpenDetailCapture],
                )
            }
        }
        ReactionInput::DetailSubmitted { issues, comment } => (
            Some(Reaction::Negative),
            vec![ReactionEffect::Submit {
                reaction: Reaction::Negative,
                issues: Some(issues),
                comment: Some(comment),
            }],
        ),
        ReactionInput::DetailDismissed => (
            Some(Reaction::Negative),
            vec![ReactionEffect::Submit {
                reaction: Reaction::Negative,
                issues: None,
                comment: None,
            }],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thumbs_up_from_none_submits_once() {
        let (state, effects) = transition(None, ReactionInput::ThumbsUp);
        assert_eq!(state, Some(Reaction::Positive));
        assert_eq!(
            effects,
            vec![ReactionEffect::Submit {
                reaction: Reaction::Positive,
                issues: None,
                comment: None,
            }]
        );
    }

    #[test]
    fn thumbs_up_twice_returns_to_none_with_one_submission() {
        let (state, first) = transition(None, ReactionInput::ThumbsUp);
        let (state, second) = transition(state, ReactionInput::ThumbsUp);

        assert_eq!(state, None);
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn thumbs_down_opens_detail_capture_without_submitting() {
        let (state, effects) = transition(None, ReactionInput::ThumbsDown);
        assert_eq!(state, Some(Reaction::Negative));
        assert_eq!(effects, vec![ReactionEffect::OpenDetailCapture]);
    }

    #[test]
    fn thumbs_down_twice_is_a_silent_toggle_off() {
        let (state, _) = transition(None, ReactionInput::ThumbsDown);
        let (state, effects) = transition(state, ReactionInput::ThumbsDown);
        assert_eq!(state, None);
        assert!(effects.is_empty());
    }

    #[test]
    fn switching_reactions_replaces_instead_of_clearing() {
        let (state, _) = transition(None, ReactionInput::ThumbsUp);
        let (state, effects) = transition(state, ReactionInput::ThumbsDown);

        assert_eq!(state, Some(Reaction::Negative));
        assert_eq!(effects, vec![ReactionEffect::OpenDetailCapture]);
    }

    #[test]
    fn detail_submit_carries_issues_and_comment() {
        let (state, effects) = transition(
            Some(Reaction::Negative),
            ReactionInput::DetailSubmitted {
                issues: vec!["unclear".to_string()],
                comment: "Too vague".to_string(),
            },
        );

        assert_eq!(state, Some(Reaction::Negative));
        assert_eq!(
            effects,
            vec![ReactionEffect::Submit {
                reaction: Reaction::Negative,
                issues: Some(vec!["unclear".to_string()]),
                comment: Some("Too vague".to_string()),
            }]
        );
    }

    #[test]
    fn detail_dismissed_still_records_the_negative_signal() {
        let (state, effects) = transition(Some(Reaction::Negative), ReactionInput::DetailDismissed);

        assert_eq!(state, Some(Reaction::Negative));
        assert_eq!(
            effects,
            vec![ReactionEffect::Submit {
                reaction: Reaction::Negative,
                issues: None,
                comment: None,
            }]
        );
    }

    fn arb_state() -> impl Strategy<Value = Option<Reaction>> {
        prop_oneof![
            Just(None),
            Just(Some(Reaction::Positive)),
            Just(Some(Reaction::Negative)),
        ]
    }

    fn arb_input() -> impl Strategy<Value = ReactionInput> {
        prop_oneof![
            Just(ReactionInput::ThumbsUp),
            Just(ReactionInput::ThumbsDown),
            Just(ReactionInput::DetailDismissed),
            (prop::collection::vec("[a-z]{3,10}", 0..3), ".{0,20}").prop_map(
                |(issues, comment)| ReactionInput::DetailSubmitted { issues, comment }
            ),
        ]
    }

    proptest! {
        /// A toggle-off never emits anything: whenever a transition
        /// clears the reaction, its effect list is empty.
        #[test]
        fn clearing_transitions_are_silent(state in arb_state(), input in arb_input()) {
            let (next, effects) = transition(state, input);
            if next.is_none() {
                prop_assert!(effects.is_empty());
            }
        }

        /// No transition ever emits more than one effect, and a
        /// submission never accompanies the detail-capture prompt.
        #[test]
        fn at_most_one_effect_per_transition(state in arb_state(), input in arb_input()) {
            let (_, effects) = transition(state, input);
            prop_assert!(effects.len() <= 1);
        }

        /// Detail fields only ever come from an explicit detail
        /// submission — thumb presses submit bare signals.
        #[test]
        fn only_detail_submissions_carry_detail(state in arb_state(), input in arb_input()) {
            let is_detail_submit = matches!(input, ReactionInput::DetailSubmitted { .. });
            let (_, effects) = transition(state, input);
            for effect in effects {
                if let ReactionEffect::Submit { issues, comment, .. } = effect {
                    prop_assert_eq!(issues.is_some(), is_detail_submit);
                    prop_assert_eq!(comment.is_some(), is_detail_submit);
                }
            }
        }
    }
}
