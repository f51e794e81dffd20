//! Remote store abstraction layer
//!
//! Provides a `RemoteStore` trait that decouples entitlement and catalog logic
//! from the hosted backend. Two implementations:
//! - `MemoryStore`: in-process tables (always available)
//! - `RestStore`: PostgREST-style row API over HTTP (behind `rest-store` feature)

pub mod memory;

#[cfg(feature = "rest-store")]
pub mod rest;

pub use memory::MemoryStore;

#[cfg(feature = "rest-store")]
pub use rest::RestStore;

use chrono::{DateTime, Utc};

use crate::models::{
    NewPremiumMembership, NewQuestion, NewTest, NewTrial, PremiumMembership, Question, RowId,
    Test, TrialRecord,
};

pub const PREMIUM_TABLE: &str = "premium_users";
pub const TRIALS_TABLE: &str = "user_trials";
pub const TESTS_TABLE: &str = "tests";
pub const QUESTIONS_TABLE: &str = "questions";

/// Error code the backend uses for "no (single) matching row".
pub const NOT_FOUND_CODE: &str = "PGRST116";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no matching row")]
    NotFound,
    #[error("backend error {code}: {message}")]
    Backend { code: String, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Abstract row store
///
/// Single-row lookups return `Err(StoreError::NotFound)` when nothing matches.
/// Returns owned values so callers don't hold locks.
pub trait RemoteStore: Send + Sync {
    // -- Premium memberships --

    /// Any membership for `device_id` with `expires_at >= now` (newest expiry first)
    fn active_premium(
        &self,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError>;

    /// All memberships, newest purchase first
    fn list_premium(&self) -> Result<Vec<PremiumMembership>, StoreError>;

    fn premium(&self, id: RowId) -> Result<PremiumMembership, StoreError>;

    fn insert_premium(&self, row: &NewPremiumMembership)
        -> Result<PremiumMembership, StoreError>;

    fn update_premium_expiry(
        &self,
        id: RowId,
        expires_at: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError>;

    // -- Trials --

    /// The trial row for `device_id`
    fn trial(&self, device_id: &str) -> Result<TrialRecord, StoreError>;

    fn insert_trial(&self, row: &NewTrial) -> Result<TrialRecord, StoreError>;

    // -- Tests --

    /// All tests, newest first
    fn list_tests(&self) -> Result<Vec<Test>, StoreError>;

    fn test(&self, id: RowId) -> Result<Test, StoreError>;

    fn insert_test(&self, row: &NewTest) -> Result<Test, StoreError>;

    fn delete_test(&self, id: RowId) -> Result<(), StoreError>;

    // -- Questions --

    /// Questions of a test, ordered by position
    fn questions(&self, test_id: RowId) -> Result<Vec<Question>, StoreError>;

    fn insert_questions(&self, rows: &[NewQuestion]) -> Result<Vec<Question>, StoreError>;

    fn delete_questions(&self, test_id: RowId) -> Result<(), StoreError>;
}
