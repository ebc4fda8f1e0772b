//! Progress indicators and user interface utilities
//!
//! This module provides consistent progress indicators for modpkg operations.
//! Bars are used for work with a known size (uploads), spinners for
//! indeterminate work (waiting on the assembler).
//!
//! # Environment Variables
//!
//! - `MODPKG_NO_PROGRESS`: Set to any value to disable all progress indicators.
//!   Useful in CI pipelines and when capturing output in scripts.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Checks if progress bars should be disabled.
fn is_progress_disabled() -> bool {
    std::env::var("MODPKG_NO_PROGRESS").is_ok()
}

/// A progress bar with consistent styling.
///
/// Wraps the `indicatif` progress bar with modpkg styling and the
/// `MODPKG_NO_PROGRESS` escape hatch. When progress is disabled the bar is
/// hidden and all operations become no-ops, so call sites never need to
/// branch on the environment.
///
/// # Examples
///
/// ```rust
/// use modpkg_cli::utils::progress::ProgressBar;
///
/// let progress = ProgressBar::new(100);
/// progress.set_message("Uploading module");
/// progress.inc(25);
/// progress.finish_with_message("Upload complete");
/// ```
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a new progress bar with a specified total length.
    pub fn new(len: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(default_style());
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates a progress bar styled for byte transfer, e.g. uploads.
    pub fn new_bytes(len: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(ProgressStyle::download());
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates a spinner for indeterminate progress operations.
    ///
    /// The animation updates every 100ms automatically.
    pub fn new_spinner() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Sets the message displayed alongside the progress bar.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Sets the prefix displayed before the progress bar.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// Increments the progress bar by the specified amount.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Sets the absolute position of the progress bar.
    pub fn set_position(&self, pos: u64) {
        self.inner.set_position(pos);
    }

    /// Completes the progress bar, leaving a final message on screen.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Completes the progress bar and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Named styles shared by modpkg progress indicators.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Default bar: position, total, and ETA.
    pub fn default_style() -> IndicatifStyle {
        default_style()
    }

    /// Spinner for indeterminate operations.
    pub fn spinner() -> IndicatifStyle {
        spinner_style()
    }

    /// Transfer bar: bytes, total bytes, and ETA.
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("━╸━")
    }
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap()
        .progress_chars("━╸━")
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{prefix:.bold} {spinner:.cyan} {msg}")
        .unwrap()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_operations_do_not_panic() {
        let bar = ProgressBar::new(10);
        bar.set_message("working");
        bar.set_prefix(">");
        bar.inc(3);
        bar.set_position(7);
        bar.finish_with_message("done");
    }

    #[test]
    fn test_spinner_operations_do_not_panic() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("spinning");
        spinner.finish_and_clear();
    }

    #[test]
    fn test_styles_build() {
        let _ = ProgressStyle::default_style();
        let _ = ProgressStyle::spinner();
        let _ = ProgressStyle::download();
    }
}
