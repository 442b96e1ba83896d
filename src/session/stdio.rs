// ABOUTME: The local standard streams a session reads from and writes to.

use tokio::io::{AsyncRead, AsyncWrite};

pub type InputStream = Box<dyn AsyncRead + Send + Unpin>;
pub type OutputStream = Box<dyn AsyncWrite + Send + Unpin>;

/// Local stdin/stdout/stderr handed to a session driver.
pub struct Stdio {
    pub stdin: InputStream,
    pub stdout: OutputStream,
    pub stderr: OutputStream,
}

impl Stdio {
    pub fn new(stdin: InputStream, stdout: OutputStream, stderr: OutputStream) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }

    /// The process's own standard streams.
    pub fn inherit() -> Self {
        Self::new(
            Box::new(tokio::io::stdin()),
            Box::new(tokio::io::stdout()),
            Box::new(tokio::io::stderr()),
        )
    }
}
