// ABOUTME: Interactive session driver: one pty-backed remote shell wired to local stdio.
// ABOUTME: Setup aborts at the first failing phase; teardown runs in reverse on every path.

use super::error::{
    ConnectFailedSnafu, PtyRequestFailedSnafu, SessionError, SessionOpenFailedSnafu,
    TerminalModeFailedSnafu,
};
use super::pumps::Pumps;
use super::stdio::Stdio;
use super::terminal::{LocalTerminal, RawModeGuard, size_or_default};
use super::{SessionExit, close_channel, close_connection};
use crate::diagnostics::{Diagnostics, Warning};
use crate::ssh::{AuthContext, Connection, PtyRequest, RemoteChannel, Transport};
use crate::types::Target;
use snafu::ResultExt;

/// Open a shell on `target` and forward local stdio until the remote side exits.
///
/// The remote exit status is informational; only setup failures are errors.
pub async fn run_interactive<T, L>(
    transport: &T,
    terminal: &L,
    target: &Target,
    auth: &AuthContext,
    stdio: Stdio,
    diag: &mut Diagnostics,
) -> Result<SessionExit, SessionError>
where
    T: Transport + ?Sized,
    L: LocalTerminal + ?Sized,
{
    let host = target.host();

    let mut connection = transport
        .dial(target, auth)
        .await
        .context(ConnectFailedSnafu { host })?;

    let mut channel = match connection
        .open_session()
        .await
        .context(SessionOpenFailedSnafu { host })
    {
        Ok(channel) => channel,
        Err(e) => {
            close_connection(&mut connection, host, diag).await;
            return Err(e);
        }
    };

    let raw_mode = match RawModeGuard::enter(terminal).context(TerminalModeFailedSnafu) {
        Ok(guard) => guard,
        Err(e) => {
            close_channel(&mut channel, host).await;
            close_connection(&mut connection, host, diag).await;
            return Err(e);
        }
    };

    let result = drive(&mut channel, terminal, host, stdio, diag).await;

    close_channel(&mut channel, host).await;
    close_connection(&mut connection, host, diag).await;
    drop(raw_mode);

    if let Ok(exit) = &result {
        tracing::debug!("interactive session on {} ended: {}", host, exit);
    }
    result
}

async fn drive<C, L>(
    channel: &mut C,
    terminal: &L,
    host: &str,
    stdio: Stdio,
    diag: &mut Diagnostics,
) -> Result<SessionExit, SessionError>
where
    C: RemoteChannel + ?Sized,
    L: LocalTerminal + ?Sized,
{
    let ((cols, rows), fallback) = size_or_default(terminal);
    if fallback {
        diag.warn(Warning::terminal_size(format!(
            "unable to read terminal size; using {cols}x{rows}"
        )));
    }

    channel
        .request_pty(&PtyRequest::interactive(cols, rows))
        .await
        .context(PtyRequestFailedSnafu { host })?;

    let pumps = Pumps::start(stdio, channel.input_writer());

    if let Err(source) = channel.request_shell().await {
        pumps.finish().await;
        return Err(SessionError::ShellStartFailed {
            host: host.to_string(),
            source,
        });
    }

    let exit = pumps.relay(channel).await;
    pumps.finish().await;
    Ok(exit)
}
