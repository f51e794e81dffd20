//! Upgrade command: checkout, then provisioning, then a fresh status check

use anyhow::{bail, Result};
use colored::Colorize;
use quizgate_core::{run_payment, PaymentOutcome, TrialStatus};

use crate::checkout::HostedCheckout;
use crate::output::status_badge;
use crate::App;

pub fn run(app: &App, name: &str, test_mode: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Please enter your name");
    }

    let entitlements = app.entitlements();
    if entitlements.check_status() == TrialStatus::Premium {
        println!("  {}", "You already have premium access.".cyan());
        println!("  Buying again adds another 30-day membership.");
    }

    if test_mode {
        eprintln!("  {}", "Test mode: simulating a successful payment".yellow());
    }
    let mut hosted = HostedCheckout::interactive(&app.config.checkout)?;
    let outcome = run_payment(
        &entitlements,
        &app.config.checkout,
        app.clock.clone(),
        &mut hosted,
        name,
        test_mode,
    );
    print_outcome(&outcome);

    if !outcome.is_success() {
        return Ok(());
    }

    // Re-evaluate from the store rather than trusting the local outcome.
    let status = entitlements.check_status();
    println!("  {}", status_badge(status));
    Ok(())
}

fn print_outcome(outcome: &PaymentOutcome) {
    let message = outcome.message();
    match outcome {
        PaymentOutcome::Activated { .. } => println!("  {} {}", "✓".green(), message.green()),
        PaymentOutcome::Cancelled => println!("  {}", message.dimmed()),
        _ => eprintln!("  {} {}", "Error:".red().bold(), message),
    }
}
