//! Quizgate Core - trial-gated quiz engine
//!
//! This crate provides everything behind the quizgate surfaces:
//! - Device-derived pseudo identity and the 3-day trial / 30-day premium check
//! - A remote-store seam with in-memory and PostgREST-style backends
//! - Quiz file parsing, test publishing and quiz scoring
//! - The checkout bridge that turns a payment into a premium membership

pub mod admin;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod config;
pub mod device;
pub mod entitlement;
pub mod local;
pub mod models;
pub mod premium;
pub mod quiz;
pub mod session;
pub mod store;

pub use admin::{AdminError, AdminGate};
pub use catalog::{Catalog, ContentError};
pub use checkout::{
    process_payment, run_payment, CheckoutError, CheckoutEvent, CheckoutOptions, CheckoutProvider,
    PaymentBridge, PaymentOutcome, TestCheckout,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::QuizgateConfig;
pub use device::{DeviceIdProvider, DeviceSignals};
pub use entitlement::{Entitlements, TrialStatus};
pub use local::{FileStorage, LocalStorage, MemoryStorage};
pub use models::{
    PremiumMembership, Question, QuestionType, RowId, Subject, Test, TrialRecord, PREMIUM_DAYS,
    TRIAL_DAYS,
};
pub use premium::PremiumAdmin;
pub use quiz::{parse_quiz, parse_quiz_file, FormatError, ParsedQuestion, QuizFormat, QuizParser};
pub use session::{QuizResult, QuizSession, SessionError};
pub use store::{MemoryStore, RemoteStore, StoreError};

#[cfg(feature = "rest-store")]
pub use store::RestStore;

/// Quizgate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
