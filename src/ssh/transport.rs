// ABOUTME: Transport capability traits used by the session drivers.
// ABOUTME: Dial, open a session channel, negotiate a pty, and stream channel events.

use super::auth::AuthContext;
use super::error::Result;
use crate::types::Target;
use async_trait::async_trait;
use bytes::Bytes;
use russh::Pty;
use std::pin::Pin;
use tokio::io::AsyncWrite;

/// Writer feeding the remote session's standard input.
pub type InputWriter = Pin<Box<dyn AsyncWrite + Send>>;

/// Pseudo-terminal negotiation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyRequest {
    pub term: String,
    pub cols: u32,
    pub rows: u32,
    pub modes: Vec<(Pty, u32)>,
}

impl PtyRequest {
    /// An xterm pty with no terminal modes set.
    pub fn xterm(cols: u32, rows: u32) -> Self {
        Self {
            term: "xterm".to_string(),
            cols,
            rows,
            modes: Vec::new(),
        }
    }

    /// An xterm pty with echo on and the legacy 14.4kbaud line speeds.
    pub fn interactive(cols: u32, rows: u32) -> Self {
        Self {
            modes: vec![
                (Pty::ECHO, 1),
                (Pty::TTY_OP_ISPEED, 14400),
                (Pty::TTY_OP_OSPEED, 14400),
            ],
            ..Self::xterm(cols, rows)
        }
    }
}

/// Something the remote end sent on a session channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Stdout(Bytes),
    Stderr(Bytes),
    ExitStatus(u32),
    ExitSignal(String),
    Eof,
    Closed,
}

/// Dials authenticated connections.
#[async_trait]
pub trait Transport: Send + Sync {
    type Connection: Connection;

    /// Connect to `target` and authenticate with `auth`.
    async fn dial(&self, target: &Target, auth: &AuthContext) -> Result<Self::Connection>;
}

/// An authenticated connection able to open session channels.
#[async_trait]
pub trait Connection: Send {
    type Channel: RemoteChannel;

    async fn open_session(&mut self) -> Result<Self::Channel>;

    async fn close(&mut self) -> Result<()>;
}

/// One session channel on a connection.
///
/// Requests wait for the server's reply; events arriving before the reply
/// are kept and returned by `next_event` in order.
#[async_trait]
pub trait RemoteChannel: Send {
    async fn request_pty(&mut self, pty: &PtyRequest) -> Result<()>;

    async fn request_shell(&mut self) -> Result<()>;

    async fn exec(&mut self, command: &str) -> Result<()>;

    /// Next event from the remote side; `None` once the channel is gone.
    async fn next_event(&mut self) -> Option<ChannelEvent>;

    /// A writer for the remote standard input, usable from another task.
    fn input_writer(&self) -> InputWriter;

    async fn close(&mut self) -> Result<()>;
}
