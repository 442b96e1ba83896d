// ABOUTME: SSH transport error types.
// ABOUTME: Covers connection, authentication, channel requests, and protocol failures.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("authentication failed: public key rejected for {0}")]
    AuthenticationFailed(String),

    #[error("remote side refused {0} request")]
    RequestRejected(&'static str),

    #[error("channel closed unexpectedly")]
    ChannelClosed,

    #[error("SSH protocol error: {0}")]
    Protocol(#[from] russh::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
