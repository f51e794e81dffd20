//! Shared fixtures: a fixed clock, deterministic device signals and a store
//! that can be told to fail individual operations.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use quizgate_core::models::{
    NewPremiumMembership, NewQuestion, NewTest, NewTrial, PremiumMembership, Question, RowId,
    Test, TrialRecord,
};
use quizgate_core::{
    DeviceIdProvider, DeviceSignals, Entitlements, FixedClock, LocalStorage, MemoryStorage,
    MemoryStore, RemoteStore, StoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ActivePremium,
    ListPremium,
    Premium,
    InsertPremium,
    UpdatePremium,
    Trial,
    InsertTrial,
    ListTests,
    Test,
    InsertTest,
    DeleteTest,
    Questions,
    InsertQuestions,
    DeleteQuestions,
}

/// `MemoryStore` wrapper that returns a backend error for selected operations.
pub struct FaultyStore {
    inner: MemoryStore,
    failing: Mutex<HashSet<Op>>,
}

impl FaultyStore {
    pub fn new(clock: Arc<FixedClock>) -> Self {
        Self {
            inner: MemoryStore::with_clock(clock),
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, op: Op) -> Result<(), StoreError> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(StoreError::Backend {
                code: "500".to_string(),
                message: format!("injected failure in {op:?}"),
            });
        }
        Ok(())
    }
}

impl RemoteStore for FaultyStore {
    fn active_premium(
        &self,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError> {
        self.check(Op::ActivePremium)?;
        self.inner.active_premium(device_id, now)
    }

    fn list_premium(&self) -> Result<Vec<PremiumMembership>, StoreError> {
        self.check(Op::ListPremium)?;
        self.inner.list_premium()
    }

    fn premium(&self, id: RowId) -> Result<PremiumMembership, StoreError> {
        self.check(Op::Premium)?;
        self.inner.premium(id)
    }

    fn insert_premium(
        &self,
        row: &NewPremiumMembership,
    ) -> Result<PremiumMembership, StoreError> {
        self.check(Op::InsertPremium)?;
        self.inner.insert_premium(row)
    }

    fn update_premium_expiry(
        &self,
        id: RowId,
        expires_at: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError> {
        self.check(Op::UpdatePremium)?;
        self.inner.update_premium_expiry(id, expires_at)
    }

    fn trial(&self, device_id: &str) -> Result<TrialRecord, StoreError> {
        self.check(Op::Trial)?;
        self.inner.trial(device_id)
    }

    fn insert_trial(&self, row: &NewTrial) -> Result<TrialRecord, StoreError> {
        self.check(Op::InsertTrial)?;
        self.inner.insert_trial(row)
    }

    fn list_tests(&self) -> Result<Vec<Test>, StoreError> {
        self.check(Op::ListTests)?;
        self.inner.list_tests()
    }

    fn test(&self, id: RowId) -> Result<Test, StoreError> {
        self.check(Op::Test)?;
        self.inner.test(id)
    }

    fn insert_test(&self, row: &NewTest) -> Result<Test, StoreError> {
        self.check(Op::InsertTest)?;
        self.inner.insert_test(row)
    }

    fn delete_test(&self, id: RowId) -> Result<(), StoreError> {
        self.check(Op::DeleteTest)?;
        self.inner.delete_test(id)
    }

    fn questions(&self, test_id: RowId) -> Result<Vec<Question>, StoreError> {
        self.check(Op::Questions)?;
        self.inner.questions(test_id)
    }

    fn insert_questions(&self, rows: &[NewQuestion]) -> Result<Vec<Question>, StoreError> {
        self.check(Op::InsertQuestions)?;
        self.inner.insert_questions(rows)
    }

    fn delete_questions(&self, test_id: RowId) -> Result<(), StoreError> {
        self.check(Op::DeleteQuestions)?;
        self.inner.delete_questions(test_id)
    }
}

/// Local storage whose writes always fail.
pub struct ReadOnlyStorage;

impl LocalStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage is read-only")
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 30, 0).unwrap()
}

pub fn signals() -> DeviceSignals {
    DeviceSignals {
        user_agent: "quizgate/test (linux; x86_64)".to_string(),
        locale: "en-US".to_string(),
        screen_width: 1920,
        screen_height: 1080,
        timezone_offset_minutes: -330,
        surface: "surface:unavailable".to_string(),
    }
}

pub struct Harness {
    pub clock: Arc<FixedClock>,
    pub store: Arc<FaultyStore>,
    pub storage: Arc<MemoryStorage>,
    pub entitlements: Entitlements,
}

impl Harness {
    pub fn device_id(&self) -> String {
        self.entitlements.device_id().unwrap()
    }

    pub fn store_dyn(&self) -> Arc<dyn RemoteStore> {
        self.store.clone()
    }
}

pub fn harness() -> Harness {
    let clock = Arc::new(FixedClock::new(t0()));
    let store = Arc::new(FaultyStore::new(clock.clone()));
    let storage = Arc::new(MemoryStorage::new());
    let device = DeviceIdProvider::with_signals(storage.clone(), clock.clone(), signals());
    let entitlements = Entitlements::new(store.clone(), device, clock.clone());
    Harness {
        clock,
        store,
        storage,
        entitlements,
    }
}
