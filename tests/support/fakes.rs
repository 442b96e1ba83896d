// ABOUTME: Scriptable fakes for the session capability traits.
// ABOUTME: Record every call so tests can assert on ordering and teardown.

use async_trait::async_trait;
use bytes::Bytes;
use ec2sh::directory::{DirectoryError, Instance, InstanceDirectory};
use ec2sh::session::{LocalTerminal, OutputStream, Stdio};
use ec2sh::ssh::{
    AuthContext, ChannelEvent, Connection, Error, InputWriter, PtyRequest, RemoteChannel,
    Result, Transport,
};
use ec2sh::types::{FilterTag, Target};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Directory returning a fixed instance list.
#[derive(Default)]
pub struct FakeDirectory {
    instances: Vec<Instance>,
    fail: bool,
    calls: Mutex<Vec<(FilterTag, bool)>>,
}

impl FakeDirectory {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Every (filter, only_running) pair the directory was asked for.
    pub fn calls(&self) -> Vec<(FilterTag, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InstanceDirectory for FakeDirectory {
    async fn find(
        &self,
        filter: &FilterTag,
        only_running: bool,
    ) -> std::result::Result<Vec<Instance>, DirectoryError> {
        self.calls
            .lock()
            .unwrap()
            .push((filter.clone(), only_running));
        if self.fail {
            return Err(DirectoryError::Query("throttled".to_string()));
        }
        Ok(self.instances.clone())
    }
}

/// How a scripted host behaves.
#[derive(Debug, Clone)]
pub enum HostScript {
    RefuseConnect,
    RefuseSession,
    RefusePty,
    RefuseShell,
    RefuseExec,
    /// Accept everything and replay these events after shell/exec.
    Events(Vec<ChannelEvent>),
}

impl HostScript {
    /// A command printing `output` and exiting with `status`.
    pub fn command(output: &str, status: u32) -> Self {
        HostScript::Events(vec![
            ChannelEvent::Stdout(Bytes::copy_from_slice(output.as_bytes())),
            ChannelEvent::ExitStatus(status),
            ChannelEvent::Eof,
            ChannelEvent::Closed,
        ])
    }
}

/// Something that happened on the fake transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Dial(String),
    OpenSession(String),
    Pty(String, PtyRequest),
    Shell(String),
    Exec(String, String),
    CloseChannel(String),
    CloseConnection(String),
}

#[derive(Default)]
struct Shared {
    calls: Mutex<Vec<Call>>,
    remote_stdin: SharedBuffer,
}

impl Shared {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Transport whose hosts follow scripts. Unscripted hosts succeed with no output.
#[derive(Default)]
pub struct FakeTransport {
    scripts: HashMap<String, HostScript>,
    shared: Arc<Shared>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, host: &str, script: HostScript) -> Self {
        self.scripts.insert(host.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().unwrap().clone()
    }

    /// Hosts dialed, in order.
    pub fn dialed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Dial(addr) => Some(addr),
                _ => None,
            })
            .collect()
    }

    /// Bytes written to remote stdin across all sessions.
    pub fn remote_stdin(&self) -> Vec<u8> {
        self.shared.remote_stdin.contents()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    type Connection = FakeConnection;

    async fn dial(&self, target: &Target, _auth: &AuthContext) -> Result<FakeConnection> {
        self.shared.record(Call::Dial(target.to_string()));
        let script = self
            .scripts
            .get(target.host())
            .cloned()
            .unwrap_or(HostScript::Events(vec![
                ChannelEvent::ExitStatus(0),
                ChannelEvent::Closed,
            ]));
        if matches!(script, HostScript::RefuseConnect) {
            return Err(Error::Connection("connection refused".to_string()));
        }
        Ok(FakeConnection {
            host: target.host().to_string(),
            script,
            shared: Arc::clone(&self.shared),
        })
    }
}

pub struct FakeConnection {
    host: String,
    script: HostScript,
    shared: Arc<Shared>,
}

#[async_trait]
impl Connection for FakeConnection {
    type Channel = FakeChannel;

    async fn open_session(&mut self) -> Result<FakeChannel> {
        self.shared.record(Call::OpenSession(self.host.clone()));
        if matches!(self.script, HostScript::RefuseSession) {
            return Err(Error::ChannelClosed);
        }
        Ok(FakeChannel {
            host: self.host.clone(),
            script: self.script.clone(),
            events: VecDeque::new(),
            shared: Arc::clone(&self.shared),
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.shared.record(Call::CloseConnection(self.host.clone()));
        Ok(())
    }
}

pub struct FakeChannel {
    host: String,
    script: HostScript,
    events: VecDeque<ChannelEvent>,
    shared: Arc<Shared>,
}

impl FakeChannel {
    fn start(&mut self) {
        if let HostScript::Events(events) = &self.script {
            self.events = events.iter().cloned().collect();
        }
    }
}

#[async_trait]
impl RemoteChannel for FakeChannel {
    async fn request_pty(&mut self, pty: &PtyRequest) -> Result<()> {
        self.shared.record(Call::Pty(self.host.clone(), pty.clone()));
        if matches!(self.script, HostScript::RefusePty) {
            return Err(Error::RequestRejected("pty"));
        }
        Ok(())
    }

    async fn request_shell(&mut self) -> Result<()> {
        self.shared.record(Call::Shell(self.host.clone()));
        if matches!(self.script, HostScript::RefuseShell) {
            return Err(Error::RequestRejected("shell"));
        }
        self.start();
        Ok(())
    }

    async fn exec(&mut self, command: &str) -> Result<()> {
        self.shared
            .record(Call::Exec(self.host.clone(), command.to_string()));
        if matches!(self.script, HostScript::RefuseExec) {
            return Err(Error::RequestRejected("exec"));
        }
        self.start();
        Ok(())
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        // Let the pump tasks run between events, as a real channel would.
        tokio::task::yield_now().await;
        self.events.pop_front()
    }

    fn input_writer(&self) -> InputWriter {
        Box::pin(self.shared.remote_stdin.clone())
    }

    async fn close(&mut self) -> Result<()> {
        self.shared.record(Call::CloseChannel(self.host.clone()));
        Ok(())
    }
}

/// Terminal that counts raw mode transitions.
#[derive(Default)]
pub struct FakeTerminal {
    pub size: Option<(u32, u32)>,
    pub fail_raw_mode: bool,
    raw_entries: AtomicUsize,
    restores: AtomicUsize,
}

impl FakeTerminal {
    pub fn sized(cols: u32, rows: u32) -> Self {
        Self {
            size: Some((cols, rows)),
            ..Default::default()
        }
    }

    /// A terminal that refuses raw mode.
    pub fn without_raw_mode() -> Self {
        Self {
            size: Some((80, 24)),
            fail_raw_mode: true,
            ..Default::default()
        }
    }

    pub fn raw_entries(&self) -> usize {
        self.raw_entries.load(Ordering::SeqCst)
    }

    pub fn restores(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }
}

impl LocalTerminal for FakeTerminal {
    fn size(&self) -> io::Result<(u32, u32)> {
        self.size
            .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "not a terminal"))
    }

    fn enable_raw_mode(&self) -> io::Result<()> {
        if self.fail_raw_mode {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not a terminal"));
        }
        self.raw_entries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn restore_mode(&self) -> io::Result<()> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Cloneable in-memory writer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn boxed(&self) -> OutputStream {
        Box::new(self.clone())
    }
}

impl AsyncWrite for SharedBuffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Captured local streams for one session.
pub struct CapturedStdio {
    pub stdout: SharedBuffer,
    pub stderr: SharedBuffer,
}

impl CapturedStdio {
    /// Stdio whose stdin yields `input` and then ends.
    pub fn with_input(input: &'static [u8]) -> (Stdio, Self) {
        Self::from_stdin(Box::new(input))
    }

    /// Stdio whose stdin never produces data nor ends.
    pub fn with_silent_stdin() -> (Stdio, Self, tokio::io::DuplexStream) {
        let (local, held) = tokio::io::duplex(64);
        let (stdio, captured) = Self::from_stdin(Box::new(local));
        (stdio, captured, held)
    }

    fn from_stdin(stdin: ec2sh::session::InputStream) -> (Stdio, Self) {
        let captured = Self {
            stdout: SharedBuffer::default(),
            stderr: SharedBuffer::default(),
        };
        let stdio = Stdio::new(stdin, captured.stdout.boxed(), captured.stderr.boxed());
        (stdio, captured)
    }
}
