//! Terminal progress for a batch: one spinner per file, coloured outcome lines.
//!
//! A [`Reporter`] is created once in `main` and handed to the orchestrator;
//! each file gets its own [`FileProgress`], which doubles as the job
//! engine's [`PollObserver`].

use std::path::Path;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::codemaker::{JobHandle, JobStatus};
use crate::lifecycle::{JobReport, PollObserver};
use crate::walker::BatchSummary;

pub struct Reporter {
    // Spinners are drawn only on an interactive stderr.
    visible: bool,
    green: Style,
    red: Style,
    yellow: Style,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            visible: console::Term::stderr().is_term(),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// A reporter that draws nothing.
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::new()
        }
    }

    /// Start the spinner for `path`.
    pub fn begin(&self, action: &str, path: &Path) -> FileProgress<'_> {
        let pb = if self.visible {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        let label = format!("{action} {}", path.display());
        pb.set_message(label.clone());
        FileProgress {
            reporter: self,
            pb,
            label,
        }
    }

    pub fn summary(&self, summary: &BatchSummary) {
        if !self.visible {
            return;
        }
        let failed = if summary.failed > 0 {
            self.red.apply_to(format!("{} failed", summary.failed))
        } else {
            self.green.apply_to("0 failed".to_string())
        };
        eprintln!("  {} processed, {failed}", summary.processed);
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FileProgress<'a> {
    reporter: &'a Reporter,
    pb: ProgressBar,
    label: String,
}

impl FileProgress<'_> {
    pub fn success(&self, written: &Path, report: &JobReport) {
        self.pb.finish_and_clear();
        if self.reporter.visible {
            eprintln!(
                "  {} {} ({} polls, {:.1}s)",
                self.reporter.green.apply_to("✓"),
                written.display(),
                report.polls,
                report.elapsed.as_secs_f64()
            );
        }
    }

    pub fn failure(&self, err: &dyn std::fmt::Display) {
        self.pb.finish_and_clear();
        if self.reporter.visible {
            eprintln!("  {} {}: {err}", self.reporter.red.apply_to("✗"), self.label);
        }
    }
}

impl PollObserver for FileProgress<'_> {
    fn submitted(&self, handle: &JobHandle) {
        self.pb.set_message(format!("{} [job {handle}]", self.label));
    }

    fn status(&self, attempt: u32, status: JobStatus) {
        self.pb.set_message(format!("{} [{status}, poll {}]", self.label, attempt + 1));
    }

    fn backoff(&self, _attempt: u32, delay: Duration) {
        if delay >= Duration::from_secs(10) {
            self.pb.set_message(format!(
                "{} {}",
                self.label,
                self.reporter.yellow.apply_to(format!("(waiting {}s)", delay.as_secs()))
            ));
        }
    }
}
