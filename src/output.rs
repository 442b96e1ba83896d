// ABOUTME: User-facing progress and warning messages.
// ABOUTME: Written to stderr so stdout carries only remote output.

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress messages and warnings
    Normal,
    /// Warnings and errors only
    Quiet,
}

pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            eprintln!("{message}");
        }
    }

    /// Print a success message with timing (suppressed in quiet mode).
    pub fn success(&self, message: &str) {
        if self.mode != OutputMode::Normal {
            return;
        }
        let elapsed = self.elapsed_secs();
        if elapsed > 0.0 {
            eprintln!("{message} ({:.1}s)", elapsed);
        } else {
            eprintln!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        eprintln!("Warning: {message}");
    }

    pub fn error(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}
