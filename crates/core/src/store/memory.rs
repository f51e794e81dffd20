//! In-memory remote store

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::models::{
    NewPremiumMembership, NewQuestion, NewTest, NewTrial, PremiumMembership, Question, RowId,
    Test, TrialRecord,
};

use super::{RemoteStore, StoreError};

#[derive(Default)]
struct Tables {
    next_id: RowId,
    premium: Vec<PremiumMembership>,
    trials: Vec<TrialRecord>,
    tests: Vec<Test>,
    questions: Vec<Question>,
}

impl Tables {
    fn next_id(&mut self) -> RowId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store backed by plain vectors, one per table.
///
/// Like the hosted backend it enforces no uniqueness on `device_id`.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store whose `created_at` defaults come from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }

    /// Number of trial rows for a device (test helper for the one-row invariant)
    pub fn trial_count(&self, device_id: &str) -> usize {
        self.read()
            .map(|t| t.trials.iter().filter(|r| r.device_id == device_id).count())
            .unwrap_or(0)
    }

    /// Number of premium rows for a device
    pub fn premium_count(&self, device_id: &str) -> usize {
        self.read()
            .map(|t| t.premium.iter().filter(|r| r.device_id == device_id).count())
            .unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|e| StoreError::Transport(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|e| StoreError::Transport(format!("lock poisoned: {e}")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryStore {
    fn active_premium(
        &self,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError> {
        let tables = self.read()?;
        tables
            .premium
            .iter()
            .filter(|m| m.device_id == device_id && m.expires_at >= now)
            .max_by_key(|m| m.expires_at)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn list_premium(&self) -> Result<Vec<PremiumMembership>, StoreError> {
        let tables = self.read()?;
        let mut rows = tables.premium.clone();
        rows.sort_by(|a, b| {
            b.purchased_at
                .cmp(&a.purchased_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    fn premium(&self, id: RowId) -> Result<PremiumMembership, StoreError> {
        let tables = self.read()?;
        tables
            .premium
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn insert_premium(
        &self,
        row: &NewPremiumMembership,
    ) -> Result<PremiumMembership, StoreError> {
        let mut tables = self.write()?;
        let membership = PremiumMembership {
            id: tables.next_id(),
            name: row.name.clone(),
            device_id: row.device_id.clone(),
            payment_id: row.payment_id.clone(),
            purchased_at: row.purchased_at,
            expires_at: row.expires_at,
        };
        tables.premium.push(membership.clone());
        Ok(membership)
    }

    fn update_premium_expiry(
        &self,
        id: RowId,
        expires_at: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError> {
        let mut tables = self.write()?;
        let membership = tables
            .premium
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;
        membership.expires_at = expires_at;
        Ok(membership.clone())
    }

    fn trial(&self, device_id: &str) -> Result<TrialRecord, StoreError> {
        let tables = self.read()?;
        tables
            .trials
            .iter()
            .filter(|t| t.device_id == device_id)
            .min_by_key(|t| t.trial_start)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn insert_trial(&self, row: &NewTrial) -> Result<TrialRecord, StoreError> {
        let mut tables = self.write()?;
        let trial = TrialRecord {
            id: tables.next_id(),
            device_id: row.device_id.clone(),
            trial_start: row.trial_start,
        };
        tables.trials.push(trial.clone());
        Ok(trial)
    }

    fn list_tests(&self) -> Result<Vec<Test>, StoreError> {
        let tables = self.read()?;
        let mut rows = tables.tests.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(rows)
    }

    fn test(&self, id: RowId) -> Result<Test, StoreError> {
        let tables = self.read()?;
        tables
            .tests
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn insert_test(&self, row: &NewTest) -> Result<Test, StoreError> {
        let created_at = self.clock.now();
        let mut tables = self.write()?;
        let test = Test {
            id: tables.next_id(),
            title: row.title.clone(),
            description: row.description.clone(),
            question_count: row.question_count,
            created_at,
        };
        tables.tests.push(test.clone());
        Ok(test)
    }

    fn delete_test(&self, id: RowId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.tests.retain(|t| t.id != id);
        Ok(())
    }

    fn questions(&self, test_id: RowId) -> Result<Vec<Question>, StoreError> {
        let tables = self.read()?;
        let mut rows: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| q.test_id == test_id)
            .cloned()
            .collect();
        rows.sort_by_key(|q| (q.question_id, q.id));
        Ok(rows)
    }

    fn insert_questions(&self, rows: &[NewQuestion]) -> Result<Vec<Question>, StoreError> {
        let mut tables = self.write()?;
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let question = Question {
                id: tables.next_id(),
                test_id: row.test_id,
                question_id: row.question_id,
                image: row.image.clone(),
                options: row.options.clone(),
                correct: row.correct.clone(),
                subject: row.subject,
                kind: row.kind,
            };
            inserted.push(question);
        }
        tables.questions.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn delete_questions(&self, test_id: RowId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.questions.retain(|q| q.test_id != test_id);
        Ok(())
    }
}
