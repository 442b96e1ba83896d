// ABOUTME: Application-wide error type for ec2sh.
// ABOUTME: Wraps the per-module errors and maps them onto one flat ErrorKind.

use crate::directory::DirectoryError;
use crate::resolve::ResolveError;
use crate::session::{SessionError, SessionErrorKind};
use crate::ssh::AuthError;
use crate::types::RequestError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("unable to determine home directory")]
    HomeNotFound,

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("multiple instances found for {filter} ({count}); give a command to run on all of them")]
    AmbiguousTarget { filter: String, count: usize },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No instance matched the filter tag.
    NoMatch,
    /// Several targets and no command; refusing to guess.
    AmbiguousTarget,
    /// A matched instance lacks the requested address class.
    MissingAddress,
    /// The instance directory itself failed.
    Directory,
    KeyUnreadable,
    KeyUnparseable,
    ConnectFailed,
    SessionOpenFailed,
    PtyRequestFailed,
    ShellStartFailed,
    /// The remote command failed (batch mode only).
    CommandFailed,
    TerminalModeFailed,
    /// Writing session output locally failed.
    Output,
    InvalidRequest,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AlreadyExists(_)
            | Error::ConfigNotFound(_)
            | Error::HomeNotFound
            | Error::Io(_)
            | Error::Yaml(_) => ErrorKind::Config,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::AmbiguousTarget { .. } => ErrorKind::AmbiguousTarget,
            Error::Auth(AuthError::KeyUnparseable { .. }) => ErrorKind::KeyUnparseable,
            Error::Auth(_) => ErrorKind::KeyUnreadable,
            Error::Resolve(ResolveError::NoMatch { .. }) => ErrorKind::NoMatch,
            Error::Resolve(ResolveError::MissingAddress { .. }) => ErrorKind::MissingAddress,
            Error::Resolve(ResolveError::Directory(_)) => ErrorKind::Directory,
            Error::Session(e) => match e.kind() {
                SessionErrorKind::ConnectFailed => ErrorKind::ConnectFailed,
                SessionErrorKind::SessionOpenFailed => ErrorKind::SessionOpenFailed,
                SessionErrorKind::TerminalModeFailed => ErrorKind::TerminalModeFailed,
                SessionErrorKind::PtyRequestFailed => ErrorKind::PtyRequestFailed,
                SessionErrorKind::ShellStartFailed => ErrorKind::ShellStartFailed,
                SessionErrorKind::CommandFailed => ErrorKind::CommandFailed,
                SessionErrorKind::OutputFailed => ErrorKind::Output,
            },
        }
    }
}

impl From<DirectoryError> for Error {
    fn from(err: DirectoryError) -> Self {
        Error::Resolve(ResolveError::Directory(err))
    }
}
