// ABOUTME: Diagnostics accumulator for non-fatal warnings during a run.
// ABOUTME: Collects problems that shouldn't fail a session but should be shown to users.

/// Collects non-fatal warnings during session operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, logging it at debug level.
    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Warnings in the order they were recorded.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether anything went wrong that the user should hear about.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a terminal size fallback warning.
    pub fn terminal_size(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::TerminalSize,
            message: message.into(),
        }
    }

    /// Create an SSH disconnect warning.
    pub fn ssh_disconnect(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SshDisconnect,
            message: message.into(),
        }
    }
}

/// What kind of tolerated failure a warning records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The local terminal size could not be read; defaults were used.
    TerminalSize,
    /// Failed to cleanly disconnect SSH session.
    SshDisconnect,
}
