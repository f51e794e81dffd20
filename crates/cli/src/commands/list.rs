//! List tests available to a device with access

use anyhow::Result;
use colored::Colorize;

use crate::commands::gate::require_access;
use crate::output::{format_test_row, status_badge};
use crate::progress::Step;
use crate::App;

pub fn run(app: &App) -> Result<()> {
    let status = require_access(&app.entitlements())?;
    println!("  {}", status_badge(status));
    println!();

    let catalog = app.catalog();
    let tests = Step::run("Fetching tests", || catalog.list_tests())?;

    if tests.is_empty() {
        println!("  {}", "No tests available yet.".dimmed());
        return Ok(());
    }
    for test in &tests {
        println!("{}", format_test_row(test));
    }
    println!();
    println!("  Start one with {}", "quizgate take <ID>".bold());
    Ok(())
}
