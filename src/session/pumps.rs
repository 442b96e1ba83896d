// ABOUTME: Byte pumps between local stdio and a remote session channel.
// ABOUTME: stdin is copied into the channel; stdout/stderr are fed from the channel reader.

use super::SessionExit;
use super::stdio::{InputStream, OutputStream, Stdio};
use crate::ssh::{ChannelEvent, InputWriter, RemoteChannel};
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const PUMP_QUEUE_DEPTH: usize = 64;

/// The three forwarding tasks of an interactive session.
pub(crate) struct Pumps {
    stdin: JoinHandle<()>,
    stdout_tx: mpsc::Sender<Bytes>,
    stdout: JoinHandle<()>,
    stderr_tx: mpsc::Sender<Bytes>,
    stderr: JoinHandle<()>,
}

impl Pumps {
    /// Spawn all three pumps.
    pub(crate) fn start(stdio: Stdio, input: InputWriter) -> Self {
        let Stdio {
            stdin,
            stdout,
            stderr,
        } = stdio;

        let (stdout_tx, stdout_rx) = mpsc::channel(PUMP_QUEUE_DEPTH);
        let (stderr_tx, stderr_rx) = mpsc::channel(PUMP_QUEUE_DEPTH);

        Self {
            stdin: tokio::spawn(pump_input(stdin, input)),
            stdout_tx,
            stdout: tokio::spawn(pump_output(stdout_rx, stdout, "stdout")),
            stderr_tx,
            stderr: tokio::spawn(pump_output(stderr_rx, stderr, "stderr")),
        }
    }

    /// Route channel output to the pumps until the channel closes.
    pub(crate) async fn relay<C: RemoteChannel + ?Sized>(&self, channel: &mut C) -> SessionExit {
        let mut exit = SessionExit::default();

        while let Some(event) = channel.next_event().await {
            match event {
                ChannelEvent::Stdout(data) => {
                    if self.stdout_tx.send(data).await.is_err() {
                        tracing::debug!("stdout pump stopped; dropping output");
                    }
                }
                ChannelEvent::Stderr(data) => {
                    if self.stderr_tx.send(data).await.is_err() {
                        tracing::debug!("stderr pump stopped; dropping output");
                    }
                }
                ChannelEvent::ExitStatus(code) => exit.status = Some(code),
                ChannelEvent::ExitSignal(signal) => exit.signal = Some(signal),
                ChannelEvent::Eof => tracing::debug!("remote sent EOF"),
                ChannelEvent::Closed => break,
            }
        }

        exit
    }

    /// Stop the pumps and wait for every task to end.
    ///
    /// Output pumps drain what they were already sent; the stdin pump is
    /// cancelled since local stdin may never reach end-of-stream.
    pub(crate) async fn finish(self) {
        let Self {
            stdin,
            stdout_tx,
            stdout,
            stderr_tx,
            stderr,
        } = self;

        drop(stdout_tx);
        drop(stderr_tx);
        stdin.abort();

        for (name, task) in [("stdin", stdin), ("stdout", stdout), ("stderr", stderr)] {
            match task.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::warn!("{} pump panicked: {}", name, e),
            }
        }
        tracing::debug!("session pumps stopped");
    }
}

async fn pump_input(mut stdin: InputStream, mut input: InputWriter) {
    match tokio::io::copy(&mut stdin, &mut input).await {
        Ok(copied) => {
            tracing::debug!(copied, "local stdin reached end of stream");
            if let Err(e) = input.shutdown().await {
                tracing::debug!("failed to send EOF to remote: {}", e);
            }
        }
        Err(e) => tracing::debug!("stdin pump stopped: {}", e),
    }
}

async fn pump_output(mut rx: mpsc::Receiver<Bytes>, mut out: OutputStream, name: &'static str) {
    while let Some(chunk) = rx.recv().await {
        if let Err(e) = out.write_all(&chunk).await {
            tracing::debug!("{} pump stopped: {}", name, e);
            return;
        }
        if let Err(e) = out.flush().await {
            tracing::debug!("{} pump stopped: {}", name, e);
            return;
        }
    }
}
