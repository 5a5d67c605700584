//! Seeded classrooms for quiz session tests

use std::collections::HashMap;

use AdaptiveQuiz::config::QuizConfig;
use AdaptiveQuiz::models::{
    CreateQuestionRequest, CreateUserRequest, Difficulty, Question, Quiz, Role,
};
use AdaptiveQuiz::{MemoryStore, QuizService, SessionContext};

pub const SCHOOL_ID: i64 = 1;
pub const CLASS_ID: i64 = 10;

/// A teacher, one student, and a quiz over freshly created questions
pub struct Classroom {
    pub store: MemoryStore,
    pub service: QuizService<MemoryStore, MemoryStore>,
    pub teacher: SessionContext,
    pub student: SessionContext,
    pub quiz: Quiz,
    /// Question ids by label, e.g. "M1"
    pub questions: HashMap<String, Question>,
}

impl Classroom {
    pub fn id(&self, label: &str) -> i64 {
        self.questions[label].id
    }

    /// Register another student in the same school
    pub async fn add_student(&self, first_name: &str) -> SessionContext {
        let user = self
            .store
            .create_user(CreateUserRequest {
                role: Role::Student,
                first_name: first_name.to_string(),
                last_name: "Tester".to_string(),
                school_id: Some(SCHOOL_ID),
            })
            .await
            .expect("create student");
        SessionContext::for_user(&user)
    }
}

/// Build a classroom whose quiz holds one question per `(label, tier)` pair.
///
/// Every question has options "right" and "wrong" with "right" correct, and
/// ids follow the order of `questions`.
pub async fn classroom(questions: &[(&str, Difficulty)]) -> Classroom {
    super::init_test_env();

    let store = MemoryStore::new();
    let service = QuizService::in_memory(store.clone(), QuizConfig::default());

    let teacher = store
        .create_user(CreateUserRequest {
            role: Role::Teacher,
            first_name: "Tess".to_string(),
            last_name: "Teacher".to_string(),
            school_id: Some(SCHOOL_ID),
        })
        .await
        .expect("create teacher");
    let teacher = SessionContext::for_user(&teacher);

    let student = store
        .create_user(CreateUserRequest {
            role: Role::Student,
            first_name: "Sam".to_string(),
            last_name: "Student".to_string(),
            school_id: Some(SCHOOL_ID),
        })
        .await
        .expect("create student");

    let topic = service
        .create_topic(&teacher, SCHOOL_ID, "General")
        .await
        .expect("create topic");
    let quiz = service
        .create_quiz(&teacher, "Adaptive practice", CLASS_ID)
        .await
        .expect("create quiz");

    let mut by_label = HashMap::new();
    for (label, difficulty) in questions {
        let question = service
            .create_question(
                &teacher,
                CreateQuestionRequest {
                    school_id: SCHOOL_ID,
                    topic_id: topic.id,
                    text: format!("Question {}", label),
                    difficulty: *difficulty,
                    options: vec!["right".to_string(), "wrong".to_string()],
                    correct_answer: "right".to_string(),
                },
            )
            .await
            .expect("create question");
        by_label.insert(label.to_string(), question);
    }

    let mut ids: Vec<i64> = by_label.values().map(|q: &Question| q.id).collect();
    ids.sort_unstable();
    service
        .assign_questions(&teacher, quiz.id, &ids)
        .await
        .expect("assign questions");

    Classroom {
        store,
        service,
        teacher,
        student: SessionContext::for_user(&student),
        quiz,
        questions: by_label,
    }
}
