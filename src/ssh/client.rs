// ABOUTME: russh-backed implementation of the transport traits.
// ABOUTME: Handles dialing, public key authentication, and session channel requests.

use super::auth::{AuthContext, HostKeyPolicy};
use super::error::{Error, Result};
use super::transport::{ChannelEvent, Connection, InputWriter, PtyRequest, RemoteChannel, Transport};
use crate::types::Target;
use async_trait::async_trait;
use bytes::Bytes;
use russh::client::{self, Config, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, ssh_key};
use russh::{Channel, ChannelMsg, Disconnect};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Dials SSH connections with russh.
#[derive(Debug, Clone, Default)]
pub struct SshTransport {
    /// Upper bound for the dial step. `None` waits indefinitely.
    connect_timeout: Option<Duration>,
}

impl SshTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// SSH client handler for russh.
pub(crate) struct SshHandler {
    target: Target,
    policy: HostKeyPolicy,
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.policy {
            HostKeyPolicy::AcceptAny => {
                tracing::debug!(
                    "accepting host key {} for {} without verification",
                    server_public_key.fingerprint(ssh_key::HashAlg::Sha256),
                    self.target
                );
                Ok(true)
            }
        }
    }
}

#[async_trait]
impl Transport for SshTransport {
    type Connection = SshConnection;

    async fn dial(&self, target: &Target, auth: &AuthContext) -> Result<SshConnection> {
        tracing::debug!("dialing {}", target);

        let handler = SshHandler {
            target: target.clone(),
            policy: auth.host_key_policy(),
        };
        let connecting = client::connect(
            Arc::new(Config::default()),
            (target.host(), target.port()),
            handler,
        );

        let connected = match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connecting)
                .await
                .map_err(|_| Error::ConnectTimeout(timeout))?,
            None => connecting.await,
        };

        let mut handle = connected.map_err(|e| {
            if e.to_string().contains("Connection refused") {
                Error::Connection(format!("connection refused to {}", target))
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        let hash_alg = handle.best_supported_rsa_hash().await?.flatten();
        let result = handle
            .authenticate_publickey(
                auth.login_name(),
                PrivateKeyWithHashAlg::new(auth.key(), hash_alg),
            )
            .await?;

        if !result.success() {
            return Err(Error::AuthenticationFailed(auth.login_name().to_string()));
        }

        tracing::debug!("authenticated to {} as {}", target, auth.login_name());
        Ok(SshConnection { handle })
    }
}

/// An authenticated russh connection.
pub struct SshConnection {
    handle: Handle<SshHandler>,
}

impl std::fmt::Debug for SshConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshConnection")
            .field("handle", &"<russh::Handle>")
            .finish()
    }
}

#[async_trait]
impl Connection for SshConnection {
    type Channel = SshChannel;

    async fn open_session(&mut self) -> Result<SshChannel> {
        let channel = self.handle.channel_open_session().await?;
        Ok(SshChannel {
            channel,
            pending: VecDeque::new(),
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(Error::Protocol)
    }
}

/// A session channel on an SSH connection.
pub struct SshChannel {
    channel: Channel<Msg>,
    /// Events that arrived while waiting for a request reply.
    pending: VecDeque<ChannelEvent>,
}

impl SshChannel {
    /// Wait for the reply to a request sent with `want_reply`.
    async fn await_reply(&mut self, request: &'static str) -> Result<()> {
        loop {
            match self.channel.wait().await {
                Some(ChannelMsg::Success) => return Ok(()),
                Some(ChannelMsg::Failure) => return Err(Error::RequestRejected(request)),
                Some(msg) => {
                    if let Some(event) = translate(msg) {
                        self.pending.push_back(event);
                    }
                }
                None => return Err(Error::ChannelClosed),
            }
        }
    }
}

/// Map a russh channel message to the events the drivers care about.
fn translate(msg: ChannelMsg) -> Option<ChannelEvent> {
    match msg {
        ChannelMsg::Data { data } => Some(ChannelEvent::Stdout(Bytes::copy_from_slice(&data))),
        ChannelMsg::ExtendedData { data, ext: 1 } => {
            Some(ChannelEvent::Stderr(Bytes::copy_from_slice(&data)))
        }
        ChannelMsg::ExitStatus { exit_status } => Some(ChannelEvent::ExitStatus(exit_status)),
        ChannelMsg::ExitSignal { signal_name, .. } => {
            Some(ChannelEvent::ExitSignal(format!("{signal_name:?}")))
        }
        ChannelMsg::Eof => Some(ChannelEvent::Eof),
        ChannelMsg::Close => Some(ChannelEvent::Closed),
        _ => None,
    }
}

#[async_trait]
impl RemoteChannel for SshChannel {
    async fn request_pty(&mut self, pty: &PtyRequest) -> Result<()> {
        self.channel
            .request_pty(true, &pty.term, pty.cols, pty.rows, 0, 0, &pty.modes)
            .await?;
        self.await_reply("pty").await?;
        tracing::debug!("pty {} {}x{} granted", pty.term, pty.cols, pty.rows);
        Ok(())
    }

    async fn request_shell(&mut self) -> Result<()> {
        self.channel.request_shell(true).await?;
        self.await_reply("shell").await
    }

    async fn exec(&mut self, command: &str) -> Result<()> {
        self.channel.exec(true, command).await?;
        self.await_reply("exec").await
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        loop {
            if let Some(event) = translate(self.channel.wait().await?) {
                return Some(event);
            }
        }
    }

    fn input_writer(&self) -> InputWriter {
        Box::pin(self.channel.make_writer())
    }

    async fn close(&mut self) -> Result<()> {
        self.channel.close().await.map_err(Error::Protocol)
    }
}
