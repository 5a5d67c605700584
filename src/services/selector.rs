//! Adaptive question selection
//!
//! Picks the next question of a quiz for a student from their answer history:
//! the first question is Medium, a correct answer moves one tier up, an
//! incorrect one moves one tier down, and no question is ever served twice.
//! The selector keeps no state between calls, so repeated calls without a new
//! answer return the same question.

use std::sync::Arc;

use tracing::debug;

use crate::database::store::{AnswerHistory, QuestionStore};
use crate::models::answer::LastAnswer;
use crate::models::question::{Difficulty, Question};
use crate::utils::errors::{AdaptiveQuizError, Result};
use crate::utils::helpers::answers_match;

/// Tier served when the student has not answered anything in the quiz yet
pub const COLD_START_DIFFICULTY: Difficulty = Difficulty::Medium;

/// Whether `given` counts as a correct answer to `correct`
pub fn is_correct(correct: &str, given: Option<&str>) -> bool {
    answers_match(correct, given)
}

/// Tier that follows the last answer
pub fn next_difficulty(last: &LastAnswer) -> Difficulty {
    if last.was_correct() {
        last.difficulty.step_up()
    } else {
        last.difficulty.step_down()
    }
}

/// Tier to serve given the (possibly absent) last answer
pub fn target_difficulty(last: Option<&LastAnswer>) -> Difficulty {
    last.map_or(COLD_START_DIFFICULTY, next_difficulty)
}

/// Stateless next-question decision over the two repository contracts
pub struct AdaptiveSelector<Q: ?Sized, H: ?Sized> {
    questions: Arc<Q>,
    history: Arc<H>,
}

impl<Q: ?Sized, H: ?Sized> Clone for AdaptiveSelector<Q, H> {
    fn clone(&self) -> Self {
        Self {
            questions: Arc::clone(&self.questions),
            history: Arc::clone(&self.history),
        }
    }
}

impl<Q, H> AdaptiveSelector<Q, H>
where
    Q: QuestionStore + ?Sized,
    H: AnswerHistory + ?Sized,
{
    pub fn new(questions: Arc<Q>, history: Arc<H>) -> Self {
        Self { questions, history }
    }

    /// Next question for `student_id` in `quiz_id`.
    ///
    /// Fails with `QuizNotFound`/`StudentNotFound` for unknown ids and with
    /// `Exhausted` when every question at the computed tier was already
    /// answered. Other tiers are never tried.
    pub async fn next_question(&self, student_id: i64, quiz_id: i64) -> Result<Question> {
        if self.questions.find_quiz(quiz_id).await?.is_none() {
            return Err(AdaptiveQuizError::QuizNotFound { quiz_id });
        }
        if !self.history.student_exists(student_id).await? {
            return Err(AdaptiveQuizError::StudentNotFound { student_id });
        }

        let (last, answered) = futures::try_join!(
            self.history.fetch_last_answer(student_id, quiz_id),
            self.history.answered_question_ids(student_id, quiz_id),
        )?;

        let difficulty = target_difficulty(last.as_ref());
        debug!(
            student_id = student_id,
            quiz_id = quiz_id,
            last_question = ?last.as_ref().map(|l| l.question_id),
            last_correct = ?last.as_ref().map(LastAnswer::was_correct),
            difficulty = %difficulty,
            "Selecting next question"
        );

        let candidates = self
            .questions
            .fetch_candidate_questions(quiz_id, difficulty, &answered)
            .await?;

        candidates
            .into_iter()
            .filter(|q| q.difficulty == difficulty && !answered.contains(&q.id))
            .min_by_key(|q| q.id)
            .ok_or(AdaptiveQuizError::Exhausted { quiz_id, difficulty })
    }
}
