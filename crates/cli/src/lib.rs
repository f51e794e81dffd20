//! Quizgate CLI library, exposed for integration tests

pub mod app;
pub mod checkout;
pub mod commands;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use app::App;

#[derive(Parser)]
#[command(name = "quizgate")]
#[command(about = "Practice tests with a 3-day free trial and premium upgrade", long_about = None)]
#[command(version = quizgate_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to quizgate.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use a throwaway in-memory store instead of the configured backend
    #[arg(long, global = true)]
    pub memory: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default quizgate.toml
    Init {
        /// Directory to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Show trial / premium status for this device
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print this device's identifier
    Device,

    /// Buy 30 days of premium access
    Upgrade {
        /// Name on the membership
        #[arg(long)]
        name: String,

        /// Skip the hosted checkout and simulate a successful payment
        #[arg(long)]
        test_mode: bool,
    },

    /// List available tests
    Tests,

    /// Take a test
    Take {
        /// Test id (see `quizgate tests`)
        test_id: i64,
    },

    /// Parse a quiz file and show the questions it would create
    Parse {
        /// Quiz file (array-literal or line format)
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Password-protected content and membership management
    Admin {
        /// Admin password (or QUIZGATE_ADMIN_PASSWORD)
        #[arg(long, env = "QUIZGATE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}
