// ABOUTME: Batch command executor: runs one command on each target in order.
// ABOUTME: Output is framed per host; the first failing host stops the run.

use super::error::{
    CommandFailure, ConnectFailedSnafu, OutputFailedSnafu, PtyRequestFailedSnafu, SessionError,
    SessionOpenFailedSnafu,
};
use super::stdio::OutputStream;
use super::terminal::{LocalTerminal, size_or_default};
use super::{close_channel, close_connection};
use crate::diagnostics::{Diagnostics, Warning};
use crate::ssh::{self, AuthContext, ChannelEvent, Connection, PtyRequest, RemoteChannel, Transport};
use crate::types::Target;
use nonempty::NonEmpty;
use snafu::ResultExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Result of a command that completed successfully on one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub host: String,
    pub exit_status: u32,
    /// Combined stdout and stderr as the remote side interleaved them.
    pub output: Vec<u8>,
}

pub fn start_banner(host: &str) -> String {
    format!("========== Start output on host: {host} ==========\n")
}

pub fn end_banner(host: &str) -> String {
    format!("========== End   output on host: {host} ==========\n")
}

/// Run `command` on every target, sequentially and in order.
///
/// Stops at the first host whose command fails; output already written for
/// earlier hosts stays written.
pub async fn run_batch<T, L>(
    transport: &T,
    terminal: &L,
    targets: &NonEmpty<Target>,
    auth: &AuthContext,
    command: &str,
    out: &mut OutputStream,
    diag: &mut Diagnostics,
) -> Result<Vec<HostReport>, SessionError>
where
    T: Transport + ?Sized,
    L: LocalTerminal + ?Sized,
{
    let mut reports = Vec::with_capacity(targets.len());
    for target in targets.iter() {
        let report = run_on_host(transport, terminal, target, auth, command, out, diag).await?;
        reports.push(report);
    }
    Ok(reports)
}

async fn run_on_host<T, L>(
    transport: &T,
    terminal: &L,
    target: &Target,
    auth: &AuthContext,
    command: &str,
    out: &mut OutputStream,
    diag: &mut Diagnostics,
) -> Result<HostReport, SessionError>
where
    T: Transport + ?Sized,
    L: LocalTerminal + ?Sized,
{
    let host = target.host();
    tracing::debug!("running {:?} on {}", command, target);

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

    let result = execute(&mut channel, terminal, host, command, out, diag).await;

    close_channel(&mut channel, host).await;
    close_connection(&mut connection, host, diag).await;
    result
}

async fn execute<C, L>(
    channel: &mut C,
    terminal: &L,
    host: &str,
    command: &str,
    out: &mut OutputStream,
    diag: &mut Diagnostics,
) -> Result<HostReport, SessionError>
where
    C: RemoteChannel + ?Sized,
    L: LocalTerminal + ?Sized,
{
    // Commands such as sudo need a controlling terminal.
    let ((cols, rows), fallback) = size_or_default(terminal);
    if fallback {
        diag.warn(Warning::terminal_size(format!(
            "unable to read terminal size for {host}; using {cols}x{rows}"
        )));
    }
    channel
        .request_pty(&PtyRequest::xterm(cols, rows))
        .await
        .context(PtyRequestFailedSnafu { host })?;

    let captured = run_command(channel, command).await;

    let output = match &captured {
        Ok(captured) => captured.output.as_slice(),
        Err(_) => &[],
    };
    write_framed(out, host, output)
        .await
        .context(OutputFailedSnafu { host })?;

    let captured = captured.map_err(|source| SessionError::CommandAborted {
        host: host.to_string(),
        command: command.to_string(),
        source,
    })?;

    let failure = match (captured.status, captured.signal) {
        (Some(0), _) => None,
        (Some(code), _) => Some(CommandFailure::ExitStatus(code)),
        (None, Some(signal)) => Some(CommandFailure::Signal(signal)),
        (None, None) => Some(CommandFailure::NoExitStatus),
    };

    match failure {
        None => Ok(HostReport {
            host: host.to_string(),
            exit_status: 0,
            output: captured.output,
        }),
        Some(reason) => Err(SessionError::CommandFailed {
            host: host.to_string(),
            command: command.to_string(),
            reason,
        }),
    }
}

struct Captured {
    output: Vec<u8>,
    status: Option<u32>,
    signal: Option<String>,
}

/// Run the command and collect combined output until the channel closes.
async fn run_command<C: RemoteChannel + ?Sized>(
    channel: &mut C,
    command: &str,
) -> ssh::Result<Captured> {
    channel.exec(command).await?;

    let mut captured = Captured {
        output: Vec::new(),
        status: None,
        signal: None,
    };

    while let Some(event) = channel.next_event().await {
        match event {
            ChannelEvent::Stdout(data) | ChannelEvent::Stderr(data) => {
                captured.output.extend_from_slice(&data);
            }
            ChannelEvent::ExitStatus(code) => captured.status = Some(code),
            ChannelEvent::ExitSignal(signal) => captured.signal = Some(signal),
            ChannelEvent::Eof => {}
            ChannelEvent::Closed => break,
        }
    }

    Ok(captured)
}

async fn write_framed<W>(out: &mut W, host: &str, output: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    out.write_all(start_banner(host).as_bytes()).await?;
    out.write_all(output).await?;
    out.write_all(b"\n").await?;
    out.write_all(end_banner(host).as_bytes()).await?;
    out.flush().await
}
