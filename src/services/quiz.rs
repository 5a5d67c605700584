//! Quiz service implementation
//!
//! This service is what the quiz-taking flow and the teacher tooling call. It
//! checks the session role, serializes answer submission per (student, quiz),
//! and delegates question choice to the adaptive selector.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::QuizConfig;
use crate::database::store::{AnswerHistory, QuestionStore};
use crate::database::{AnswerRepository, DatabaseService, MemoryStore, QuestionRepository};
use crate::models::{
    AnswerOutcome, CreateQuestionRequest, CreateQuizRequest, CreateTopicRequest, NewAnswerRecord,
    Question, Quiz, QuizProgress, Role, Topic, UpdateQuestionRequest,
};
use crate::state::{QuizLockRegistry, SessionContext};
use crate::utils::errors::{AdaptiveQuizError, Result};
use crate::utils::helpers::answers_match;
use crate::utils::logging::{
    log_answer_recorded, log_question_served, log_quiz_exhausted, log_teacher_action,
};

use super::selector::AdaptiveSelector;

/// Quiz service over a question store and an answer history
pub struct QuizService<Q: ?Sized, H: ?Sized> {
    questions: Arc<Q>,
    history: Arc<H>,
    selector: AdaptiveSelector<Q, H>,
    locks: QuizLockRegistry,
    rules: QuizConfig,
}

impl<Q: ?Sized, H: ?Sized> Clone for QuizService<Q, H> {
    fn clone(&self) -> Self {
        Self {
            questions: Arc::clone(&self.questions),
            history: Arc::clone(&self.history),
            selector: self.selector.clone(),
            locks: self.locks.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl QuizService<QuestionRepository, AnswerRepository> {
    /// Service backed by PostgreSQL
    pub fn from_database(database: &DatabaseService, rules: QuizConfig) -> Self {
        Self::new(
            Arc::new(database.questions.clone()),
            Arc::new(database.answers.clone()),
            rules,
        )
    }
}

impl QuizService<MemoryStore, MemoryStore> {
    /// Service backed by a single in-memory store
    pub fn in_memory(store: MemoryStore, rules: QuizConfig) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, rules)
    }
}

impl<Q, H> QuizService<Q, H>
where
    Q: QuestionStore + ?Sized,
    H: AnswerHistory + ?Sized,
{
    pub fn new(questions: Arc<Q>, history: Arc<H>, rules: QuizConfig) -> Self {
        let selector = AdaptiveSelector::new(questions.clone(), history.clone());
        Self {
            questions,
            history,
            selector,
            locks: QuizLockRegistry::new(),
            rules,
        }
    }

    pub fn locks(&self) -> &QuizLockRegistry {
        &self.locks
    }

    /// Next question for the session's student. Read-only and idempotent.
    pub async fn next_question(&self, session: &SessionContext, quiz_id: i64) -> Result<Question> {
        session.require_role(Role::Student, "take quizzes")?;

        match self.selector.next_question(session.user_id, quiz_id).await {
            Ok(question) => {
                log_question_served(
                    session.user_id,
                    quiz_id,
                    question.difficulty,
                    question.id,
                    &question.text,
                );
                Ok(question)
            }
            Err(AdaptiveQuizError::Exhausted { quiz_id, difficulty }) => {
                log_quiz_exhausted(session.user_id, quiz_id, difficulty);
                Err(AdaptiveQuizError::Exhausted { quiz_id, difficulty })
            }
            Err(e) => Err(e),
        }
    }

    /// Record the student's answer and pick the following question as one step.
    ///
    /// `answer` may be `None` when the student skipped the question; it is
    /// stored as given and counts as incorrect.
    pub async fn submit_answer(
        &self,
        session: &SessionContext,
        quiz_id: i64,
        question_id: i64,
        answer: Option<&str>,
    ) -> Result<AnswerOutcome> {
        session.require_role(Role::Student, "answer quiz questions")?;
        let student_id = session.user_id;

        if self.questions.find_quiz(quiz_id).await?.is_none() {
            return Err(AdaptiveQuizError::QuizNotFound { quiz_id });
        }
        if !self.history.student_exists(student_id).await? {
            return Err(AdaptiveQuizError::StudentNotFound { student_id });
        }
        if !self.questions.is_assigned(quiz_id, question_id).await? {
            return Err(AdaptiveQuizError::QuestionNotFound { question_id });
        }
        let question = self
            .questions
            .find_question(question_id)
            .await?
            .ok_or(AdaptiveQuizError::QuestionNotFound { question_id })?;

        let _guard = self.locks.acquire(student_id, quiz_id).await;

        let answered = self.history.answered_question_ids(student_id, quiz_id).await?;
        if answered.contains(&question_id) {
            return Err(AdaptiveQuizError::DuplicateAnswer {
                student_id,
                quiz_id,
                question_id,
            });
        }

        let record = self
            .history
            .append_answer(NewAnswerRecord {
                student_id,
                quiz_id,
                question_id,
                answer_given: answer.map(str::to_string),
                answered_at: Utc::now(),
            })
            .await?;

        let correct = answers_match(&question.correct_answer, record.answer_given.as_deref());
        log_answer_recorded(student_id, quiz_id, question_id, correct);

        let next_question = match self.selector.next_question(student_id, quiz_id).await {
            Ok(next) => {
                log_question_served(student_id, quiz_id, next.difficulty, next.id, &next.text);
                Some(next)
            }
            Err(AdaptiveQuizError::Exhausted { difficulty, .. }) => {
                log_quiz_exhausted(student_id, quiz_id, difficulty);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(AnswerOutcome {
            record,
            correct,
            next_question,
        })
    }

    /// Answered and correct counts for the session's student
    pub async fn quiz_progress(
        &self,
        session: &SessionContext,
        quiz_id: i64,
    ) -> Result<QuizProgress> {
        session.require_role(Role::Student, "view quiz progress")?;
        let student_id = session.user_id;

        if self.questions.find_quiz(quiz_id).await?.is_none() {
            return Err(AdaptiveQuizError::QuizNotFound { quiz_id });
        }

        let assigned = self.questions.quiz_questions(quiz_id).await?;
        let records = self.history.answers_for(student_id, quiz_id).await?;

        let mut correct_answers: HashMap<i64, String> = assigned
            .iter()
            .map(|q| (q.id, q.correct_answer.clone()))
            .collect();

        let mut correct = 0;
        for record in &records {
            if !correct_answers.contains_key(&record.question_id) {
                // Answered, then unassigned from the quiz
                let question = self
                    .questions
                    .find_question(record.question_id)
                    .await?
                    .ok_or(AdaptiveQuizError::QuestionNotFound {
                        question_id: record.question_id,
                    })?;
                correct_answers.insert(question.id, question.correct_answer);
            }
            let expected = &correct_answers[&record.question_id];
            if answers_match(expected, record.answer_given.as_deref()) {
                correct += 1;
            }
        }

        debug!(
            student_id = student_id,
            quiz_id = quiz_id,
            answered = records.len(),
            correct = correct,
            "Quiz progress computed"
        );

        Ok(QuizProgress {
            quiz_id,
            student_id,
            answered: records.len(),
            correct,
            assigned: assigned.len(),
        })
    }

    /// Add a topic to a school's question pool
    pub async fn create_topic(
        &self,
        session: &SessionContext,
        school_id: i64,
        name: &str,
    ) -> Result<Topic> {
        session.require_role(Role::Teacher, "add topics")?;

        let request = CreateTopicRequest {
            school_id,
            name: name.to_string(),
        }
        .normalized()?;

        let topic = self.questions.create_topic(request).await?;
        log_teacher_action(session.user_id, "create_topic", Some(topic.id), Some(&topic.name));
        Ok(topic)
    }

    /// Add a question to the pool after checking its invariants
    pub async fn create_question(
        &self,
        session: &SessionContext,
        request: CreateQuestionRequest,
    ) -> Result<Question> {
        session.require_role(Role::Teacher, "add questions")?;

        let request = request.normalized(&self.rules)?;
        let question = self.questions.create_question(request).await?;

        log_teacher_action(
            session.user_id,
            "create_question",
            Some(question.id),
            Some(question.difficulty.as_str()),
        );
        Ok(question)
    }

    /// Edit an existing question; the merged result must still satisfy the invariants
    pub async fn update_question(
        &self,
        session: &SessionContext,
        question_id: i64,
        request: UpdateQuestionRequest,
    ) -> Result<Question> {
        session.require_role(Role::Teacher, "edit questions")?;

        let existing = self
            .questions
            .find_question(question_id)
            .await?
            .ok_or(AdaptiveQuizError::QuestionNotFound { question_id })?;
        let merged = request.apply_to(&existing, &self.rules)?;

        let question = self
            .questions
            .update_question(
                question_id,
                UpdateQuestionRequest {
                    text: Some(merged.text),
                    difficulty: Some(merged.difficulty),
                    options: Some(merged.options),
                    correct_answer: Some(merged.correct_answer),
                },
            )
            .await?;

        log_teacher_action(session.user_id, "update_question", Some(question_id), None);
        Ok(question)
    }

    /// Create an empty quiz owned by the session's teacher
    pub async fn create_quiz(
        &self,
        session: &SessionContext,
        title: &str,
        class_id: i64,
    ) -> Result<Quiz> {
        session.require_role(Role::Teacher, "create quizzes")?;

        let title = title.trim();
        if title.is_empty() {
            return Err(AdaptiveQuizError::InvalidInput("Quiz title cannot be empty".to_string()));
        }

        let quiz = self
            .questions
            .create_quiz(CreateQuizRequest {
                title: title.to_string(),
                class_id,
                teacher_id: session.user_id,
            })
            .await?;

        log_teacher_action(session.user_id, "create_quiz", Some(quiz.id), Some(&quiz.title));
        Ok(quiz)
    }

    /// Assign questions to a quiz. Returns how many were newly assigned.
    pub async fn assign_questions(
        &self,
        session: &SessionContext,
        quiz_id: i64,
        question_ids: &[i64],
    ) -> Result<usize> {
        session.require_role(Role::Teacher, "assign quiz questions")?;

        if self.questions.find_quiz(quiz_id).await?.is_none() {
            return Err(AdaptiveQuizError::QuizNotFound { quiz_id });
        }

        let mut added = 0;
        for &question_id in question_ids {
            if self.questions.assign_question(quiz_id, question_id).await? {
                added += 1;
            }
        }

        info!(
            teacher_id = session.user_id,
            quiz_id = quiz_id,
            requested = question_ids.len(),
            added = added,
            "Questions assigned to quiz"
        );
        Ok(added)
    }
}
