//! In-process repository backend
//!
//! Implements both repository contracts over maps guarded by a tokio `RwLock`.
//! Used when embedding the engine without PostgreSQL and throughout the tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{AnswerHistory, QuestionStore};
use crate::models::{
    AnswerRecord, CreateQuestionRequest, CreateQuizRequest, CreateTopicRequest, CreateUserRequest,
    Difficulty, LastAnswer, NewAnswerRecord, Question, Quiz, Topic, UpdateQuestionRequest, User,
};
use crate::utils::errors::{AdaptiveQuizError, Result};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    topics: BTreeMap<i64, Topic>,
    questions: BTreeMap<i64, Question>,
    quizzes: BTreeMap<i64, Quiz>,
    /// (quiz_id, question_id)
    assignments: BTreeSet<(i64, i64)>,
    answers: Vec<AnswerRecord>,
}

fn next_key<V>(map: &BTreeMap<i64, V>) -> i64 {
    map.keys().next_back().map_or(1, |last| last + 1)
}

/// Shared in-memory store; clones share the same tables
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        let mut tables = self.tables.write().await;
        let user = User {
            id: next_key(&tables.users),
            role: request.role,
            first_name: request.first_name,
            last_name: request.last_name,
            school_id: request.school_id,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Number of stored answer records across all students
    pub async fn answer_count(&self) -> usize {
        self.tables.read().await.answers.len()
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        Ok(self.tables.read().await.quizzes.get(&quiz_id).cloned())
    }

    async fn find_question(&self, question_id: i64) -> Result<Option<Question>> {
        Ok(self.tables.read().await.questions.get(&question_id).cloned())
    }

    async fn fetch_candidate_questions(
        &self,
        quiz_id: i64,
        difficulty: Difficulty,
        exclude_question_ids: &[i64],
    ) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        let candidates = tables
            .assignments
            .range((quiz_id, i64::MIN)..=(quiz_id, i64::MAX))
            .filter(|(_, question_id)| !exclude_question_ids.contains(question_id))
            .filter_map(|(_, question_id)| tables.questions.get(question_id))
            .filter(|question| question.difficulty == difficulty)
            .cloned()
            .collect();

        Ok(candidates)
    }

    async fn is_assigned(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        Ok(self.tables.read().await.assignments.contains(&(quiz_id, question_id)))
    }

    async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .range((quiz_id, i64::MIN)..=(quiz_id, i64::MAX))
            .filter_map(|(_, question_id)| tables.questions.get(question_id))
            .cloned()
            .collect())
    }

    async fn create_topic(&self, request: CreateTopicRequest) -> Result<Topic> {
        let mut tables = self.tables.write().await;
        if tables
            .topics
            .values()
            .any(|t| t.school_id == request.school_id && t.name == request.name)
        {
            return Err(AdaptiveQuizError::InvalidInput(format!(
                "Topic '{}' already exists in school {}",
                request.name, request.school_id
            )));
        }

        let topic = Topic {
            id: next_key(&tables.topics),
            school_id: request.school_id,
            name: request.name,
        };
        tables.topics.insert(topic.id, topic.clone());
        Ok(topic)
    }

    async fn create_question(&self, request: CreateQuestionRequest) -> Result<Question> {
        let mut tables = self.tables.write().await;
        match tables.topics.get(&request.topic_id) {
            Some(topic) if topic.school_id == request.school_id => {}
            _ => return Err(AdaptiveQuizError::TopicNotFound { topic_id: request.topic_id }),
        }

        let question = Question {
            id: next_key(&tables.questions),
            school_id: request.school_id,
            topic_id: request.topic_id,
            text: request.text,
            difficulty: request.difficulty,
            options: request.options,
            correct_answer: request.correct_answer,
            created_at: Utc::now(),
        };
        tables.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn update_question(
        &self,
        question_id: i64,
        request: UpdateQuestionRequest,
    ) -> Result<Question> {
        let mut tables = self.tables.write().await;
        let question = tables
            .questions
            .get_mut(&question_id)
            .ok_or(AdaptiveQuizError::QuestionNotFound { question_id })?;

        if let Some(text) = request.text {
            question.text = text;
        }
        if let Some(difficulty) = request.difficulty {
            question.difficulty = difficulty;
        }
        if let Some(options) = request.options {
            question.options = options;
        }
        if let Some(correct_answer) = request.correct_answer {
            question.correct_answer = correct_answer;
        }

        Ok(question.clone())
    }

    async fn create_quiz(&self, request: CreateQuizRequest) -> Result<Quiz> {
        let mut tables = self.tables.write().await;
        let quiz = Quiz {
            id: next_key(&tables.quizzes),
            title: request.title,
            class_id: request.class_id,
            teacher_id: request.teacher_id,
            created_at: Utc::now(),
        };
        tables.quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn assign_question(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.quizzes.contains_key(&quiz_id) {
            return Err(AdaptiveQuizError::QuizNotFound { quiz_id });
        }
        if !tables.questions.contains_key(&question_id) {
            return Err(AdaptiveQuizError::QuestionNotFound { question_id });
        }
        Ok(tables.assignments.insert((quiz_id, question_id)))
    }
}

#[async_trait]
impl AnswerHistory for MemoryStore {
    async fn student_exists(&self, student_id: i64) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .get(&student_id)
            .map_or(false, |user| matches!(user.role, crate::models::Role::Student)))
    }

    async fn fetch_last_answer(&self, student_id: i64, quiz_id: i64) -> Result<Option<LastAnswer>> {
        let tables = self.tables.read().await;
        let last = tables
            .answers
            .iter()
            .filter(|a| a.student_id == student_id && a.quiz_id == quiz_id)
            .max_by_key(|a| (a.answered_at, a.id));

        let Some(record) = last else {
            return Ok(None);
        };

        let question = tables
            .questions
            .get(&record.question_id)
            .ok_or(AdaptiveQuizError::QuestionNotFound { question_id: record.question_id })?;

        Ok(Some(LastAnswer {
            question_id: question.id,
            difficulty: question.difficulty,
            correct_answer: question.correct_answer.clone(),
            answer_given: record.answer_given.clone(),
            answered_at: record.answered_at,
        }))
    }

    async fn answered_question_ids(&self, student_id: i64, quiz_id: i64) -> Result<Vec<i64>> {
        Ok(self
            .tables
            .read()
            .await
            .answers
            .iter()
            .filter(|a| a.student_id == student_id && a.quiz_id == quiz_id)
            .map(|a| a.question_id)
            .collect())
    }

    async fn append_answer(&self, record: NewAnswerRecord) -> Result<AnswerRecord> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&record.student_id) {
            return Err(AdaptiveQuizError::StudentNotFound { student_id: record.student_id });
        }
        if !tables.quizzes.contains_key(&record.quiz_id) {
            return Err(AdaptiveQuizError::QuizNotFound { quiz_id: record.quiz_id });
        }
        if !tables.questions.contains_key(&record.question_id) {
            return Err(AdaptiveQuizError::QuestionNotFound { question_id: record.question_id });
        }
        if tables.answers.iter().any(|a| {
            a.student_id == record.student_id
                && a.quiz_id == record.quiz_id
                && a.question_id == record.question_id
        }) {
            return Err(AdaptiveQuizError::DuplicateAnswer {
                student_id: record.student_id,
                quiz_id: record.quiz_id,
                question_id: record.question_id,
            });
        }

        let stored = AnswerRecord {
            id: tables.answers.len() as i64 + 1,
            student_id: record.student_id,
            quiz_id: record.quiz_id,
            question_id: record.question_id,
            answer_given: record.answer_given,
            answered_at: record.answered_at,
        };
        tables.answers.push(stored.clone());
        Ok(stored)
    }

    async fn answers_for(&self, student_id: i64, quiz_id: i64) -> Result<Vec<AnswerRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<AnswerRecord> = tables
            .answers
            .iter()
            .filter(|a| a.student_id == student_id && a.quiz_id == quiz_id)
            .cloned()
            .collect();
        records.sort_by_key(|a| (a.answered_at, a.id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Duration;

    async fn seeded() -> (MemoryStore, i64, i64, Vec<Question>) {
        let store = MemoryStore::new();
        let student = store
            .create_user(CreateUserRequest {
                role: Role::Student,
                first_name: "Ada".into(),
                last_name: "L".into(),
                school_id: Some(1),
            })
            .await
            .unwrap();
        let topic = store
            .create_topic(CreateTopicRequest { school_id: 1, name: "Maths".into() })
            .await
            .unwrap();
        let quiz = store
            .create_quiz(CreateQuizRequest { title: "Q".into(), class_id: 1, teacher_id: 9 })
            .await
            .unwrap();

        let mut questions = Vec::new();
        let pool = [("a", Difficulty::Medium), ("b", Difficulty::Easy), ("c", Difficulty::Medium)];
        for (text, difficulty) in pool {
            let question = store
                .create_question(CreateQuestionRequest {
                    school_id: 1,
                    topic_id: topic.id,
                    text: text.into(),
                    difficulty,
                    options: vec!["1".into(), "2".into()],
                    correct_answer: "1".into(),
                })
                .await
                .unwrap();
            store.assign_question(quiz.id, question.id).await.unwrap();
            questions.push(question);
        }

        (store, student.id, quiz.id, questions)
    }

    #[tokio::test]
    async fn test_candidates_filtered_and_ordered() {
        let (store, _, quiz_id, questions) = seeded().await;

        let medium = store
            .fetch_candidate_questions(quiz_id, Difficulty::Medium, &[])
            .await
            .unwrap();
        let ids: Vec<i64> = medium.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![questions[0].id, questions[2].id]);

        let medium = store
            .fetch_candidate_questions(quiz_id, Difficulty::Medium, &[questions[0].id])
            .await
            .unwrap();
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].id, questions[2].id);

        let hard = store.fetch_candidate_questions(quiz_id, Difficulty::Hard, &[]).await.unwrap();
        assert!(hard.is_empty());
        let other_quiz = store
            .fetch_candidate_questions(quiz_id + 1, Difficulty::Medium, &[])
            .await
            .unwrap();
        assert!(other_quiz.is_empty());
    }

    #[tokio::test]
    async fn test_assign_twice_is_noop() {
        let (store, _, quiz_id, questions) = seeded().await;
        assert!(!store.assign_question(quiz_id, questions[0].id).await.unwrap());
        assert_eq!(store.quiz_questions(quiz_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_last_answer_uses_timestamp_not_id() {
        let (store, student_id, quiz_id, questions) = seeded().await;
        let now = Utc::now();

        store
            .append_answer(NewAnswerRecord {
                student_id,
                quiz_id,
                question_id: questions[0].id,
                answer_given: Some("1".into()),
                answered_at: now,
            })
            .await
            .unwrap();
        // Stored later but answered earlier
        store
            .append_answer(NewAnswerRecord {
                student_id,
                quiz_id,
                question_id: questions[1].id,
                answer_given: None,
                answered_at: now - Duration::minutes(5),
            })
            .await
            .unwrap();

        let last = store.fetch_last_answer(student_id, quiz_id).await.unwrap().unwrap();
        assert_eq!(last.question_id, questions[0].id);
        assert!(last.was_correct());

        let history = store.answers_for(student_id, quiz_id).await.unwrap();
        assert_eq!(history[0].question_id, questions[1].id);
    }

    #[tokio::test]
    async fn test_duplicate_answer_rejected() {
        let (store, student_id, quiz_id, questions) = seeded().await;
        let record = NewAnswerRecord {
            student_id,
            quiz_id,
            question_id: questions[0].id,
            answer_given: Some("2".into()),
            answered_at: Utc::now(),
        };

        store.append_answer(record.clone()).await.unwrap();
        let err = store.append_answer(record).await.unwrap_err();
        assert!(matches!(err, AdaptiveQuizError::DuplicateAnswer { .. }));
        assert_eq!(store.answer_count().await, 1);
    }

    #[tokio::test]
    async fn test_question_requires_topic_in_same_school() {
        let (store, _, _, _) = seeded().await;
        let err = store
            .create_question(CreateQuestionRequest {
                school_id: 2,
                topic_id: 1,
                text: "x".into(),
                difficulty: Difficulty::Easy,
                options: vec!["1".into(), "2".into()],
                correct_answer: "1".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AdaptiveQuizError::TopicNotFound { topic_id: 1 }));
    }
}
