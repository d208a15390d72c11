//! The compiler child process: spawning, the serialized outbound writer,
//! and the inbound reader task that turns socket bytes into decoded
//! protocol messages.
//!
//! The child's stdio is carried over `socketpair` sockets rather than
//! pipes, which gives both ends ordinary close semantics and spares us
//! SIGPIPE handling. We avoid tokio's `process` feature: the child is
//! spawned with `std::process::Command` and reaped on a blocking task.

use crate::codec;
use crate::error::Error;
use bytes::BytesMut;
use prost::Message as _;
use proto_sass::embedded_protocol::{InboundMessage, OutboundMessage};
use std::os::fd::OwnedFd;
use std::os::unix::net::UnixStream as StdUnixStream;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::mpsc;

/// What the reader task observed on the inbound socket.
#[derive(Debug)]
pub(crate) enum ChildEvent {
    /// One decoded frame: the compilation ID and its message.
    Frame(u32, OutboundMessage),
    /// The byte stream is broken beyond recovery; the child must go.
    Malformed(Error),
    /// The child closed its side of the socket without being asked to
    /// stop. Suppressed during a deliberate `stop`.
    Exited,
}

/// Exclusive owner of the outbound socket. Holding the lock across the
/// whole frame write keeps frames from two tasks from interleaving.
pub(crate) struct Writer {
    stream: tokio::sync::Mutex<OwnedWriteHalf>,
}

impl Writer {
    pub(crate) async fn send(
        &self,
        compilation_id: u32,
        message: &InboundMessage,
    ) -> std::io::Result<()> {
        let frame = codec::encode_frame(compilation_id, &message.encode_to_vec());
        let mut stream = self.stream.lock().await;
        stream.write_all(&frame).await
    }
}

/// A running compiler process and its two socket ends.
pub(crate) struct Child {
    pid: u32,
    process: Option<std::process::Child>,
    writer: Arc<Writer>,
    reader: tokio::task::JoinHandle<()>,
    stopping: Arc<AtomicBool>,
}

impl Child {
    /// Spawn `program` with the embedded-protocol sockets as its stdio and
    /// its stderr discarded. The returned receiver yields decoded inbound
    /// frames in arrival order.
    pub(crate) fn spawn(
        program: &Path,
        args: &[String],
    ) -> std::io::Result<(Child, mpsc::Receiver<ChildEvent>)> {
        let (stdin_host, stdin_child) = StdUnixStream::pair()?;
        let (stdout_host, stdout_child) = StdUnixStream::pair()?;

        let process = std::process::Command::new(program)
            .args(args)
            .stdin(Stdio::from(OwnedFd::from(stdin_child)))
            .stdout(Stdio::from(OwnedFd::from(stdout_child)))
            .stderr(Stdio::null())
            .spawn()?;
        let pid = process.id();
        tracing::debug!(pid, program = %program.display(), "spawned compiler");

        stdin_host.set_nonblocking(true)?;
        stdout_host.set_nonblocking(true)?;
        let (_stdin_read, write) = UnixStream::from_std(stdin_host)?.into_split();
        let (read, _stdout_write) = UnixStream::from_std(stdout_host)?.into_split();

        Ok(Self::start(pid, Some(process), read, write))
    }

    /// A child backed by an in-process peer instead of a spawned compiler.
    /// The returned stream is the peer's end: everything the host writes
    /// arrives there, and frames written to it arrive as inbound events.
    #[cfg(test)]
    pub(crate) fn pair() -> std::io::Result<(Child, UnixStream, mpsc::Receiver<ChildEvent>)> {
        let (host, peer) = UnixStream::pair()?;
        let (read, write) = host.into_split();
        let (child, events) = Self::start(0, None, read, write);
        Ok((child, peer, events))
    }

    fn start(
        pid: u32,
        process: Option<std::process::Child>,
        read: OwnedReadHalf,
        write: OwnedWriteHalf,
    ) -> (Child, mpsc::Receiver<ChildEvent>) {
        let (events_tx, events_rx) = mpsc::channel(32);
        let stopping = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn(read_loop(read, events_tx, stopping.clone()));

        let child = Child {
            pid,
            process,
            writer: Arc::new(Writer {
                stream: tokio::sync::Mutex::new(write),
            }),
            reader,
            stopping,
        };
        (child, events_rx)
    }

    pub(crate) fn pid(&self) -> u32 {
        self.pid
    }

    /// A handle for detached tasks that need to write responses.
    pub(crate) fn writer(&self) -> Arc<Writer> {
        self.writer.clone()
    }

    pub(crate) async fn send(
        &self,
        compilation_id: u32,
        message: &InboundMessage,
    ) -> std::io::Result<()> {
        self.writer.send(compilation_id, message).await
    }

    /// Deliberate termination: suppress the exit report, cancel the reader,
    /// kill the process, and reap it.
    pub(crate) async fn stop(mut self) {
        self.stopping.store(true, Ordering::Relaxed);
        self.reader.abort();
        if let Some(mut process) = self.process.take() {
            tracing::debug!(pid = self.pid, "stopping compiler");
            _ = process.kill();
            _ = tokio::task::spawn_blocking(move || process.wait()).await;
        }
    }
}

impl Drop for Child {
    fn drop(&mut self) {
        self.reader.abort();
        if let Some(process) = &mut self.process {
            _ = process.kill();
        }
    }
}

async fn read_loop(
    mut read: OwnedReadHalf,
    events: mpsc::Sender<ChildEvent>,
    stopping: Arc<AtomicBool>,
) {
    let mut decoder = codec::Decoder::new();
    let mut buffer = BytesMut::with_capacity(8 * 1024);

    loop {
        loop {
            match decoder.decode(&mut buffer) {
                Ok(Some((compilation_id, body))) => match OutboundMessage::decode(body.as_ref()) {
                    Ok(message) => {
                        if events
                            .send(ChildEvent::Frame(compilation_id, message))
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                    Err(err) => {
                        _ = events
                            .send(ChildEvent::Malformed(Error::protocol(format!(
                                "could not decode compiler message: {err}"
                            ))))
                            .await;
                        return;
                    }
                },
                Ok(None) => break,
                Err(err) => {
                    _ = events
                        .send(ChildEvent::Malformed(Error::protocol(err.to_string())))
                        .await;
                    return;
                }
            }
        }

        match read.read_buf(&mut buffer).await {
            // EOF is the one reliable termination signal across platforms:
            // the kernel closes the socket whenever the process dies.
            Ok(0) => {
                if !stopping.load(Ordering::Relaxed) {
                    _ = events.send(ChildEvent::Exited).await;
                }
                return;
            }
            Ok(_) => {}
            Err(err) => {
                if !stopping.load(Ordering::Relaxed) {
                    _ = events
                        .send(ChildEvent::Malformed(Error::protocol(format!(
                            "failed to read from compiler: {err}"
                        ))))
                        .await;
                }
                return;
            }
        }
    }
}
