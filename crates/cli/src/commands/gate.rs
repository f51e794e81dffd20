//! Access gate run before any command that opens quiz content

use colored::Colorize;
use quizgate_core::{Entitlements, TrialStatus};

#[derive(Debug, thiserror::Error)]
#[error("{status_text}. Run `quizgate upgrade --name <NAME>` to continue.")]
pub struct AccessDenied {
    pub status: TrialStatus,
    status_text: String,
}

impl AccessDenied {
    pub fn new(status: TrialStatus) -> Self {
        Self {
            status,
            status_text: status.banner().unwrap_or("No access").to_string(),
        }
    }
}

/// Evaluates the device and returns its status if it may open content.
pub fn require_access(entitlements: &Entitlements) -> Result<TrialStatus, AccessDenied> {
    let status = entitlements.check_status();
    if status.has_access() {
        Ok(status)
    } else {
        print_paywall();
        Err(AccessDenied::new(status))
    }
}

pub fn print_paywall() {
    eprintln!();
    eprintln!("  {}", "Your free trial has ended".red().bold());
    eprintln!(
        "  Get 30 days of premium access: {}",
        "quizgate upgrade --name <NAME>".bold()
    );
    eprintln!();
}
