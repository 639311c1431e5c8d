//! Progress bar rendering for the two scan stages.
//!
//! The scanner core exposes each stage's progress as a plain
//! `(completed, total, successes)` callback; this module turns that into an
//! `indicatif` bar so the CLI front-end doesn't have to know the core's
//! internal stage machinery.

use indicatif::{ProgressBar, ProgressStyle as IndicatifStyle};

/// Which stage a progress bar is tracking. Only used to pick a label and a
/// counter name -- the underlying bar math is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    Latency,
    Speed,
}

impl ScanStage {
    fn label(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Speed => "speed",
        }
    }
}

/// Wraps an `indicatif::ProgressBar` with the stage's counter semantics.
pub struct ProgressTracker {
    bar: ProgressBar,
    stage: ScanStage,
}

impl ProgressTracker {
    /// Create a tracker for `stage` with `total` units of work. Pass
    /// `total == 0` to get a disabled (hidden) bar.
    pub fn new(stage: ScanStage, total: usize) -> Self {
        let bar = if total == 0 {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        bar.set_style(
            IndicatifStyle::with_template(
                "{msg} {bar:40.cyan/blue} {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("##-"),
        );
        Self { bar, stage }
    }

    /// Update the bar from a stage progress snapshot.
    pub fn update(&self, completed: usize, total: usize, successes: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
        self.bar.set_message(format!(
            "{} ({} found)",
            self.stage.label(),
            successes
        ));
    }

    /// Finish and clear the bar, leaving a one-line summary behind.
    pub fn finish(&self, successes: usize) {
        self.bar
            .finish_with_message(format!("{} done ({} found)", self.stage.label(), successes));
    }
}
