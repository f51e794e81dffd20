//! Progress indicators

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// A single network step backed by an indicatif spinner.
///
/// Create with [`Step::new`], then call [`Step::finish`] or [`Step::fail`]
/// when the work completes. On a non-TTY the spinner draws nothing, but the
/// closing line is still emitted via `eprintln!`.
pub struct Step {
    pb: ProgressBar,
    label: String,
}

impl Step {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{}...", label));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { pb, label }
    }

    /// Prints `"  label... done"`.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
        eprintln!("  {}... {}", self.label, "done".green());
    }

    pub fn fail(&self) {
        self.pb.finish_and_clear();
        eprintln!("  {}... {}", self.label, "failed".red());
    }

    /// Runs `work` under the spinner, closing it according to the result.
    pub fn run<T, E>(label: &str, work: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let step = Step::new(label);
        let result = work();
        match &result {
            Ok(_) => step.finish(),
            Err(_) => step.fail(),
        }
        result
    }
}
