//! Taking a quiz: navigation, answers and scoring

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Question, RowId, Test};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("test has no questions")]
    NoQuestions,
}

/// Outcome of one question after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOutcome {
    pub question_id: RowId,
    pub number: u32,
    pub given: Option<String>,
    pub correct: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub test_id: RowId,
    pub score: usize,
    pub total: usize,
    pub outcomes: Vec<QuestionOutcome>,
}

/// In-progress attempt at a test. Answers are keyed by question row id and
/// can be changed until [`QuizSession::submit`].
#[derive(Debug, Clone)]
pub struct QuizSession {
    test: Test,
    questions: Vec<Question>,
    current: usize,
    answers: HashMap<RowId, String>,
}

impl QuizSession {
    pub fn new(test: Test, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        Ok(Self {
            test,
            questions,
            current: 0,
            answers: HashMap::new(),
        })
    }

    pub fn test(&self) -> &Test {
        &self.test
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 0-based index of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Records (or replaces) the answer to the current question.
    pub fn answer(&mut self, choice: &str) {
        let id = self.current().id;
        self.answers.insert(id, choice.trim().to_string());
    }

    pub fn answer_for(&self, question_id: RowId) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    /// Moves forward; returns `false` on the last question.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Moves back; returns `false` on the first question.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Scores the attempt. An answer counts only when it equals the stored
    /// correct value exactly; unanswered questions count as wrong.
    pub fn submit(&self) -> QuizResult {
        let outcomes: Vec<QuestionOutcome> = self
            .questions
            .iter()
            .map(|q| {
                let given = self.answers.get(&q.id).cloned();
                let is_correct = given.as_deref() == Some(q.correct.as_str());
                QuestionOutcome {
                    question_id: q.id,
                    number: q.question_id,
                    given,
                    correct: q.correct.clone(),
                    is_correct,
                }
            })
            .collect();

        QuizResult {
            test_id: self.test.id,
            score: outcomes.iter().filter(|o| o.is_correct).count(),
            total: outcomes.len(),
            outcomes,
        }
    }
}
