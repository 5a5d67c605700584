//! Property tests for adaptive selection

mod helpers;

use std::collections::HashSet;

use proptest::prelude::*;

use AdaptiveQuiz::models::Difficulty;
use AdaptiveQuiz::AdaptiveQuizError;
use helpers::*;

fn tier() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

/// Walk a whole session, answering per `answers`, and check every served question
async fn run_session(tiers: Vec<Difficulty>, answers: Vec<bool>) -> Result<(), TestCaseError> {
    let labels: Vec<String> = (0..tiers.len()).map(|i| format!("Q{}", i)).collect();
    let pool: Vec<(&str, Difficulty)> =
        labels.iter().map(String::as_str).zip(tiers.iter().copied()).collect();
    let room = classroom(&pool).await;

    let mut served = HashSet::new();
    let mut expected = Difficulty::Medium;

    for correct in answers {
        match room.service.next_question(&room.student, room.quiz.id).await {
            Ok(question) => {
                prop_assert_eq!(question.difficulty, expected);
                let lowest_unseen = room
                    .questions
                    .values()
                    .filter(|q| q.difficulty == expected && !served.contains(&q.id))
                    .map(|q| q.id)
                    .min();
                prop_assert_eq!(lowest_unseen, Some(question.id));
                prop_assert!(served.insert(question.id), "question {} served twice", question.id);

                let answer = if correct { "right" } else { "wrong" };
                let outcome = room
                    .service
                    .submit_answer(&room.student, room.quiz.id, question.id, Some(answer))
                    .await
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(outcome.correct, correct);

                expected = if correct { expected.step_up() } else { expected.step_down() };
            }
            Err(AdaptiveQuizError::Exhausted { difficulty, .. }) => {
                prop_assert_eq!(difficulty, expected);
                let unseen_at_tier = room
                    .questions
                    .values()
                    .any(|q| q.difficulty == expected && !served.contains(&q.id));
                prop_assert!(!unseen_at_tier);
                break;
            }
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        }
    }

    prop_assert_eq!(room.store.answer_count().await, served.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_sessions_follow_tier_rules(
        tiers in prop::collection::vec(tier(), 1..12),
        answers in prop::collection::vec(any::<bool>(), 0..16),
    ) {
        tokio_test::block_on(run_session(tiers, answers))?;
    }
}
