//! Admin commands: upload and delete tests, manage premium memberships
//!
//! Every action is checked against the configured admin password first.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use quizgate_core::premium::DEFAULT_GRANT_DAYS;
use quizgate_core::{AdminGate, RowId};

use crate::commands::parse::{parse_file, print_preview};
use crate::output::format_membership_row;
use crate::progress::Step;
use crate::App;

#[derive(Debug, Clone, clap::Subcommand)]
pub enum AdminAction {
    /// Parse a quiz file and publish it as a new test
    Upload {
        /// Quiz file (array-literal or line format)
        file: PathBuf,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a test and all of its questions
    Delete {
        test_id: RowId,
    },

    /// Manage premium memberships
    Premium {
        #[command(subcommand)]
        action: PremiumAction,
    },
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum PremiumAction {
    /// List all memberships, newest first
    List,

    /// Grant premium to a device without a payment
    Add {
        #[arg(long)]
        name: String,

        /// Device identifier (see `quizgate device`)
        #[arg(long)]
        device: String,

        #[arg(long, default_value_t = DEFAULT_GRANT_DAYS)]
        days: i64,
    },

    /// Extend a membership by a number of days
    Extend {
        id: RowId,

        #[arg(long, default_value_t = DEFAULT_GRANT_DAYS)]
        days: i64,
    },
}

pub fn run(app: &App, password: &str, action: &AdminAction) -> Result<()> {
    AdminGate::from_config(&app.config.admin).verify(password)?;

    match action {
        AdminAction::Upload {
            file,
            title,
            description,
        } => run_upload(app, file, title, description),
        AdminAction::Delete { test_id } => run_delete(app, *test_id),
        AdminAction::Premium { action } => match action {
            PremiumAction::List => run_premium_list(app),
            PremiumAction::Add { name, device, days } => run_premium_add(app, name, device, *days),
            PremiumAction::Extend { id, days } => run_premium_extend(app, *id, *days),
        },
    }
}

fn run_upload(app: &App, file: &std::path::Path, title: &str, description: &str) -> Result<()> {
    let questions = parse_file(&app.parser(), file)?;
    print_preview(&questions);
    println!();

    let catalog = app.catalog();
    let test = Step::run("Uploading test", || {
        catalog.publish_test(title, description, &questions)
    })?;

    println!(
        "  {} Test uploaded: {} (id {}, {} questions)",
        "✓".green(),
        test.title.bold(),
        test.id,
        test.question_count
    );
    Ok(())
}

fn run_delete(app: &App, test_id: RowId) -> Result<()> {
    let catalog = app.catalog();
    Step::run("Deleting test", || catalog.delete_test(test_id))?;
    println!("  {} Test {} deleted", "✓".green(), test_id);
    Ok(())
}

fn run_premium_list(app: &App) -> Result<()> {
    let admin = app.premium_admin();
    let memberships = Step::run("Fetching premium users", || admin.list())?;

    if memberships.is_empty() {
        println!("  {}", "No premium users yet.".dimmed());
        return Ok(());
    }
    let now = admin.now();
    for membership in &memberships {
        println!("{}", format_membership_row(membership, now));
    }
    Ok(())
}

fn run_premium_add(app: &App, name: &str, device: &str, days: i64) -> Result<()> {
    let admin = app.premium_admin();
    let membership = Step::run("Adding premium user", || admin.grant(name, device, days))?;
    println!(
        "  {} Premium user added (id {}, expires {})",
        "✓".green(),
        membership.id,
        membership.expires_at.format("%Y-%m-%d")
    );
    Ok(())
}

fn run_premium_extend(app: &App, id: RowId, days: i64) -> Result<()> {
    let admin = app.premium_admin();
    let membership = Step::run("Extending premium", || admin.extend(id, days))?;
    println!(
        "  {} Premium extended by {} days (expires {})",
        "✓".green(),
        days,
        membership.expires_at.format("%Y-%m-%d")
    );
    Ok(())
}
