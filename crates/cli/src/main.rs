//! Quizgate CLI - trial-gated practice tests

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use quizgate_cli::app::load_config;
use quizgate_cli::{commands, App, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("  {} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr: errors only by default, debug with `--verbose`,
/// `RUST_LOG` wins when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Init { path } => commands::init::run(path.as_deref()),
        Commands::Parse { file, json } => {
            let config = load_config(cli.config.as_deref())?;
            let parser = quizgate_core::QuizParser::new(&config.quiz.image_base_url);
            commands::parse::run(&parser, file, *json)
        }
        Commands::Status { json } => commands::status::run(&App::load(cli)?, *json),
        Commands::Device => commands::device::run(&App::load(cli)?),
        Commands::Upgrade { name, test_mode } => {
            commands::upgrade::run(&App::load(cli)?, name, *test_mode)
        }
        Commands::Tests => commands::list::run(&App::load(cli)?),
        Commands::Take { test_id } => commands::take::run(&App::load(cli)?, *test_id),
        Commands::Admin { password, action } => {
            commands::admin::run(&App::load(cli)?, password, action)
        }
    }
}
