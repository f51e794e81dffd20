//! Status command: evaluate and show the device's entitlement

use anyhow::Result;
use colored::Colorize;
use quizgate_core::TrialStatus;

use crate::output::{status_badge, StatusReport};
use crate::App;

pub fn run(app: &App, json: bool) -> Result<()> {
    let entitlements = app.entitlements();
    let status = entitlements.check_status();
    let device_id = entitlements.device_id().ok();

    if json {
        let report = StatusReport {
            status,
            has_access: status.has_access(),
            device_id: device_id.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("  {}", status_badge(status));
    if let Some(id) = device_id.as_deref() {
        println!("  {}: {}", "Device".bold(), id.dimmed());
    }
    if status == TrialStatus::Expired {
        crate::commands::gate::print_paywall();
    }
    Ok(())
}
