//! Rows owned by the remote store
//!
//! The client only ever holds transient copies of these; every view re-fetches
//! after a mutation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the free trial, counted from first device contact.
pub const TRIAL_DAYS: i64 = 3;

/// Length of a purchased premium membership.
pub const PREMIUM_DAYS: i64 = 30;

/// Primary key of a remote row.
pub type RowId = i64;

// ── Trials ───────────────────────────────────────────────────────

/// A device's trial row (`user_trials`). Only the start is stored; the end is
/// always derived as `trial_start + TRIAL_DAYS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub id: RowId,
    pub device_id: String,
    pub trial_start: DateTime<Utc>,
}

impl TrialRecord {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.trial_start + Duration::days(TRIAL_DAYS)
    }

    /// The window is half-open: access ends exactly at `ends_at`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTrial {
    pub device_id: String,
    pub trial_start: DateTime<Utc>,
}

// ── Premium ──────────────────────────────────────────────────────

/// A premium membership row (`premium_users`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumMembership {
    pub id: RowId,
    /// Holder name as entered at checkout or by an admin
    pub name: String,
    pub device_id: String,
    /// Provider payment reference; absent for admin grants
    #[serde(default)]
    pub payment_id: Option<String>,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PremiumMembership {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPremiumMembership {
    pub name: String,
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// ── Content ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub id: RowId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub question_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub question_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Physics,
    Chemistry,
    Maths,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Physics => write!(f, "Physics"),
            Subject::Chemistry => write!(f, "Chemistry"),
            Subject::Maths => write!(f, "Maths"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Integer,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "mcq"),
            QuestionType::Integer => write!(f, "integer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: RowId,
    pub test_id: RowId,
    /// 1-based position inside the test
    pub question_id: u32,
    pub image: String,
    /// Empty for integer-answer questions
    #[serde(default)]
    pub options: Vec<String>,
    pub correct: String,
    pub subject: Subject,
    #[serde(rename = "type")]
    pub kind: QuestionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuestion {
    pub test_id: RowId,
    pub question_id: u32,
    pub image: String,
    pub options: Vec<String>,
    pub correct: String,
    pub subject: Subject,
    #[serde(rename = "type")]
    pub kind: QuestionType,
}
