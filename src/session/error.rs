// ABOUTME: Session error types with SNAFU context selectors.
// ABOUTME: Each setup phase wraps the transport failure and names the host.

use snafu::Snafu;

use crate::ssh;

/// A failed session phase.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SessionError {
    #[snafu(display("unable to connect to {host}: {source}"))]
    ConnectFailed { host: String, source: ssh::Error },

    #[snafu(display("unable to open session on {host}: {source}"))]
    SessionOpenFailed { host: String, source: ssh::Error },

    #[snafu(display("unable to put terminal in raw mode: {source}"))]
    TerminalModeFailed { source: std::io::Error },

    #[snafu(display("request for pseudo terminal failed on {host}: {source}"))]
    PtyRequestFailed { host: String, source: ssh::Error },

    #[snafu(display("failed to start shell on {host}: {source}"))]
    ShellStartFailed { host: String, source: ssh::Error },

    #[snafu(display("failed to execute command: {command}: {reason} on {host}"))]
    CommandFailed {
        host: String,
        command: String,
        reason: CommandFailure,
    },

    #[snafu(display("failed to execute command: {command} on {host}: {source}"))]
    CommandAborted {
        host: String,
        command: String,
        source: ssh::Error,
    },

    #[snafu(display("unable to write output for {host}: {source}"))]
    OutputFailed {
        host: String,
        source: std::io::Error,
    },
}

/// Why a remote command counts as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFailure {
    ExitStatus(u32),
    Signal(String),
    NoExitStatus,
}

impl std::fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandFailure::ExitStatus(code) => write!(f, "exited with status {code}"),
            CommandFailure::Signal(signal) => write!(f, "killed by signal {signal}"),
            CommandFailure::NoExitStatus => write!(f, "channel closed without exit status"),
        }
    }
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    ConnectFailed,
    SessionOpenFailed,
    TerminalModeFailed,
    PtyRequestFailed,
    ShellStartFailed,
    CommandFailed,
    OutputFailed,
}

impl SessionError {
    pub fn kind(&self) -> SessionErrorKind {
        match self {
            SessionError::ConnectFailed { .. } => SessionErrorKind::ConnectFailed,
            SessionError::SessionOpenFailed { .. } => SessionErrorKind::SessionOpenFailed,
            SessionError::TerminalModeFailed { .. } => SessionErrorKind::TerminalModeFailed,
            SessionError::PtyRequestFailed { .. } => SessionErrorKind::PtyRequestFailed,
            SessionError::ShellStartFailed { .. } => SessionErrorKind::ShellStartFailed,
            SessionError::CommandFailed { .. } | SessionError::CommandAborted { .. } => {
                SessionErrorKind::CommandFailed
            }
            SessionError::OutputFailed { .. } => SessionErrorKind::OutputFailed,
        }
    }

    /// The host the failure happened on, if it is host-specific.
    pub fn host(&self) -> Option<&str> {
        match self {
            SessionError::ConnectFailed { host, .. }
            | SessionError::SessionOpenFailed { host, .. }
            | SessionError::PtyRequestFailed { host, .. }
            | SessionError::ShellStartFailed { host, .. }
            | SessionError::CommandFailed { host, .. }
            | SessionError::CommandAborted { host, .. }
            | SessionError::OutputFailed { host, .. } => Some(host),
            SessionError::TerminalModeFailed { .. } => None,
        }
    }
}
