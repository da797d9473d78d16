//! Property-based tests for the dialogue state machine
//!
//! These verify the invariants that must hold across all possible inputs.

use super::state::{Step, UserRecord};
use super::transition::transition;
use super::{Effect, Event, SelectionData};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::None),
        Just(Step::AwaitingRating),
        Just(Step::AwaitingCount),
        Just(Step::AwaitingTag),
        Just(Step::AwaitingTagCount),
    ]
}

fn arb_record() -> impl Strategy<Value = UserRecord> {
    (
        arb_step(),
        proptest::option::of(800i64..3600),
        proptest::option::of(1i64..=10),
        proptest::option::of("[a-z]{2,10}"),
    )
        .prop_map(|(step, rating, count, tag)| UserRecord {
            chat_id: 7,
            step,
            rating,
            count,
            tag,
        })
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    /// `/start` reaches the idle shape from any state.
    #[test]
    fn start_always_resets(record in arb_record()) {
        let result = transition(&record, &Event::message("/start"));
        prop_assert_eq!(result.record.step, Step::None);
        prop_assert_eq!(result.record.rating, None);
        prop_assert!(result.record.tag.is_none());
    }

    /// Every requested count ends up in [1, 10] after clamping.
    #[test]
    fn requested_count_is_clamped(requested in any::<i64>()) {
        let mut record = UserRecord::new(1);
        record.step = Step::AwaitingCount;
        record.rating = Some(1200);

        let result = transition(&record, &Event::message(requested.to_string()));
        let count = result.effects.iter().find_map(|e| match e {
            Effect::DeliverByRating { count, .. } => Some(*count),
            _ => None,
        });
        prop_assert!(matches!(count, Some(c) if (1..=10).contains(&c)));
    }

    /// Non-numeric input while a number is expected never moves the step
    /// and produces exactly one validation reply.
    #[test]
    fn non_numeric_input_keeps_step(text in "[a-zA-Z][a-zA-Z ]{0,19}") {
        let mut record = UserRecord::new(1);
        record.step = Step::AwaitingRating;

        let result = transition(&record, &Event::message(text));
        prop_assert_eq!(result.record, record);
        prop_assert_eq!(result.effects.len(), 1);
        prop_assert!(
            matches!(&result.effects[0], Effect::Reply { keyboard: None, .. }),
            "expected a keyboard-less Reply effect"
        );
    }

    /// Unrecognized idle input yields the fallback and nothing else.
    #[test]
    fn idle_gibberish_is_single_reply(text in "[a-zA-Z][a-zA-Z ]{0,19}") {
        let record = UserRecord::new(1);
        let result = transition(&record, &Event::message(text));
        prop_assert_eq!(result.record, record);
        prop_assert_eq!(result.effects.len(), 1);
    }

    /// Callback data produced by the keyboards always parses back.
    #[test]
    fn rating_callback_data_roundtrips(rating in 800i64..3600) {
        let parsed = SelectionData::parse(&format!("rating_{rating}"));
        prop_assert_eq!(parsed, Some(SelectionData::Rating(rating)));
    }

    /// A rating selection puts the chat in AwaitingCount with that rating,
    /// regardless of the step it was in.
    #[test]
    fn rating_selection_from_any_step(record in arb_record(), rating in 800i64..3600) {
        let event = Event::selection("cb", format!("rating_{rating}"));
        let result = transition(&record, &event);
        prop_assert_eq!(result.record.step, Step::AwaitingCount);
        prop_assert_eq!(result.record.rating, Some(rating));
    }
}
