// ABOUTME: Remote session orchestration: interactive shells and batch commands.
// ABOUTME: Drivers own their connection lifecycle; the orchestrator picks which one runs.

mod batch;
mod error;
mod interactive;
mod orchestrator;
mod pumps;
mod stdio;
mod terminal;

pub use batch::{HostReport, end_banner, run_batch, start_banner};
pub use error::{CommandFailure, SessionError, SessionErrorKind};
pub use interactive::run_interactive;
pub use orchestrator::{Orchestrator, Outcome};
pub use stdio::{InputStream, OutputStream, Stdio};
pub use terminal::{
    ConsoleTerminal, DEFAULT_TERMINAL_SIZE, LocalTerminal, RawModeGuard, size_or_default,
};

use crate::diagnostics::{Diagnostics, Warning};
use crate::ssh::{Connection, RemoteChannel};
use std::fmt;

/// How an interactive session's remote shell ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionExit {
    pub status: Option<u32>,
    pub signal: Option<String>,
}

impl fmt::Display for SessionExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.signal) {
            (Some(code), _) => write!(f, "exit status {code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => write!(f, "no exit status"),
        }
    }
}

async fn close_channel<C: RemoteChannel + ?Sized>(channel: &mut C, host: &str) {
    // The remote side usually closed the channel already.
    if let Err(e) = channel.close().await {
        tracing::debug!("closing session on {}: {}", host, e);
    }
}

async fn close_connection<C: Connection + ?Sized>(
    connection: &mut C,
    host: &str,
    diag: &mut Diagnostics,
) {
    if let Err(e) = connection.close().await {
        diag.warn(Warning::ssh_disconnect(format!(
            "SSH disconnect failed for {host}: {e}"
        )));
    }
}
