//! User-facing output
//!
//! The pipeline reports through the [`Ui`] trait so the same code drives:
//! - the console (plain lines on stdout plus a progress bar per table)
//! - silent runs and tests

use indicatif::{ProgressBar, ProgressStyle};

/// Pipeline phases, announced as they start
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Preparing,
    Loading,
    Verifying,
    Reporting,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Preparing => write!(f, "Creating database and tables..."),
            Phase::Loading => write!(f, "Loading data from CSV files..."),
            Phase::Verifying => write!(f, "Verifying data..."),
            Phase::Reporting => write!(f, "Running analytics report..."),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - console output or silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Console UI: messages on stdout, optional progress bar while a table loads
pub struct ConsoleUi {
    show_progress: bool,
    bar: Option<ProgressBar>,
}

impl ConsoleUi {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            bar: None,
        }
    }

    fn new_bar(total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg:20} [{bar:40.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.clear_progress();
        if phase != Phase::Complete {
            println!("\n{}", phase);
        }
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        if !self.show_progress {
            return;
        }
        let bar = self.bar.get_or_insert_with(|| Self::new_bar(total));
        bar.set_length(total);
        bar.set_message(label.into());
        bar.set_position(current);
    }

    fn clear_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        match &self.bar {
            Some(bar) => bar.println(message),
            None => println!("{}", message),
        }
    }
}

impl Drop for ConsoleUi {
    fn drop(&mut self) {
        self.clear_progress();
    }
}

/// Silent UI implementation for non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

/// UI that keeps every logged line, for inspecting a run afterwards
#[derive(Default, Debug)]
pub struct BufferedUi {
    pub phases: Vec<Phase>,
    pub lines: Vec<String>,
}

impl BufferedUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines containing the given text
    pub fn lines_containing(&self, needle: &str) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.contains(needle))
            .map(|l| l.as_str())
            .collect()
    }
}

impl Ui for BufferedUi {
    fn set_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, message: impl Into<String>) {
        self.lines.push(message.into());
    }
}
