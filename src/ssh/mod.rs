// ABOUTME: SSH client module for remote shell sessions.
// ABOUTME: Key-based authentication, russh transport, and the capability traits drivers use.

mod auth;
mod client;
mod error;
mod transport;

pub use auth::{AuthContext, AuthError, HostKeyPolicy, KeyFormatError, expand_home};
pub use client::{SshChannel, SshConnection, SshTransport};
pub use error::{Error, Result};
pub use transport::{
    ChannelEvent, Connection, InputWriter, PtyRequest, RemoteChannel, Transport,
};
