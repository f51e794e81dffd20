//! Test catalog: publishing parsed quizzes, listing and deleting tests

use std::sync::Arc;

use crate::models::{NewQuestion, NewTest, Question, RowId, Test};
use crate::quiz::ParsedQuestion;
use crate::store::{RemoteStore, StoreError};

/// Failures of admin content operations; shown to the admin verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("missing information: {0}")]
    MissingInformation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Catalog {
    store: Arc<dyn RemoteStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Writes a test row, then all of its questions.
    ///
    /// The title is trimmed and required; an empty description is stored as
    /// absent. A failure while inserting questions leaves the test row behind.
    pub fn publish_test(
        &self,
        title: &str,
        description: &str,
        questions: &[ParsedQuestion],
    ) -> Result<Test, ContentError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ContentError::MissingInformation("a test title is required"));
        }
        if questions.is_empty() {
            return Err(ContentError::MissingInformation(
                "no parsed questions to upload",
            ));
        }

        let description = description.trim();
        let test = self.store.insert_test(&NewTest {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            question_count: questions.len(),
        })?;

        let rows: Vec<NewQuestion> = questions
            .iter()
            .map(|q| q.to_new_question(test.id))
            .collect();
        self.store.insert_questions(&rows)?;

        tracing::info!(test_id = test.id, title, questions = rows.len(), "test uploaded");
        Ok(test)
    }

    /// Newest first.
    pub fn list_tests(&self) -> Result<Vec<Test>, ContentError> {
        Ok(self.store.list_tests()?)
    }

    pub fn test(&self, id: RowId) -> Result<Test, ContentError> {
        Ok(self.store.test(id)?)
    }

    pub fn questions_for_test(&self, test_id: RowId) -> Result<Vec<Question>, ContentError> {
        Ok(self.store.questions(test_id)?)
    }

    /// Removes the questions first, then the test itself.
    pub fn delete_test(&self, id: RowId) -> Result<(), ContentError> {
        self.store.delete_questions(id)?;
        self.store.delete_test(id)?;
        tracing::info!(test_id = id, "test deleted");
        Ok(())
    }
}
