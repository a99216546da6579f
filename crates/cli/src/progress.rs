//! Progress indicators

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// A single network step backed by an indicatif spinner.
///
/// Create with [`Step::new`], then call [`Step::finish`], [`Step::fail`], or
/// [`Step::warn`] when the work completes. On a non-TTY (and in JSON mode)
/// the spinner draws nothing and no status lines are printed.
pub struct Step {
    pb: ProgressBar,
    label: String,
    quiet: bool,
}

impl Step {
    /// Start a new spinner step with the given label.
    pub fn new(label: impl Into<String>, quiet: bool) -> Self {
        let label = label.into();
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}")
            {
                pb.set_style(style);
            }
            pb.enable_steady_tick(std::time::Duration::from_millis(80));
            pb
        };
        pb.set_message(format!("{}...", label));
        Self { pb, label, quiet }
    }

    /// Finish successfully: prints `"  label... done"`.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
        if !self.quiet {
            eprintln!("  {}... {}", self.label, "done".green());
        }
    }

    /// Finish with a failure marker, e.g. `failed` or `offline`.
    pub fn fail(&self, marker: &str) {
        self.pb.finish_and_clear();
        if !self.quiet {
            eprintln!("  {}... {}", self.label, marker.red());
        }
    }

    /// Finish with a warning marker.
    pub fn warn(&self, marker: &str) {
        self.pb.finish_and_clear();
        if !self.quiet {
            eprintln!("  {}... {}", self.label, marker.yellow());
        }
    }
}
