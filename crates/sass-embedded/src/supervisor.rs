//! The compiler supervisor: a single task that owns the child process, the
//! request registry, and the lifecycle state machine. The public handle
//! talks to it over a command channel; detached callback and timer tasks
//! report back over an internal event channel.

use crate::child::{Child, ChildEvent};
use crate::error::Error;
use crate::function::SassFunction;
use crate::importer::ImportResolver;
use crate::options::Settings;
use crate::request::{
    next_request_id, CompilationRequest, Disposition, Registry, Request, VersionRequest,
};
use crate::{CompilerResults, Versions};
use proto_sass::embedded_protocol::{inbound_message, outbound_message, InboundMessage};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Builds a child process. Injected so the supervisor never cares whether
/// the far end is a real compiler or a test peer.
pub(crate) type Launcher =
    Arc<dyn Fn() -> std::io::Result<(Child, mpsc::Receiver<ChildEvent>)> + Send + Sync>;

/// The lifecycle state. A child process exists exactly in
/// {Checking, Running, Quiescing}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Initializing,
    Checking,
    Running,
    Broken,
    Quiescing,
    Shutdown,
}

/// Requests from the public handle.
pub(crate) enum Command {
    Compile {
        request: inbound_message::CompileRequest,
        importers: Vec<ImportResolver>,
        functions: HashMap<String, SassFunction>,
        reply: oneshot::Sender<Result<CompilerResults, Error>>,
    },
    Versions {
        reply: oneshot::Sender<Result<Versions, Error>>,
    },
    ProcessId {
        reply: oneshot::Sender<Option<u32>>,
    },
    Reinit {
        reply: oneshot::Sender<Result<(), Error>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Reports from detached tasks back into the supervisor.
#[derive(Debug)]
pub(crate) enum Event {
    /// A request completed somewhere other than the supervisor's own
    /// routing (a parked cancellation fired when its callback returned).
    Completed(u32),
    /// A per-request timer fired.
    TimedOut(u32),
    /// A detached task hit a transport failure.
    Fault(Error),
}

/// The oldest protocol these bindings speak; anything outside
/// `[2.0.0, 3.0.0)` fails the health check.
const MIN_PROTOCOL_VERSION: (u64, u64, u64) = (2, 0, 0);

pub(crate) struct Supervisor {
    settings: Arc<Settings>,
    launcher: Launcher,
    events_tx: mpsc::UnboundedSender<Event>,
    state_tx: watch::Sender<State>,
    start_count: Arc<AtomicU64>,

    registry: Registry,
    pending: VecDeque<Command>,
    child: Option<Child>,
    child_eof: bool,
    commands_closed: bool,
    health: Option<oneshot::Receiver<Result<Versions, Error>>>,
    versions: Option<Versions>,
    broken: Option<Error>,
    stopping: bool,
    reinit_waiters: Vec<oneshot::Sender<Result<(), Error>>>,
    shutdown_waiters: Vec<oneshot::Sender<()>>,
}

impl Supervisor {
    pub(crate) fn new(
        settings: Arc<Settings>,
        launcher: Launcher,
        state_tx: watch::Sender<State>,
        start_count: Arc<AtomicU64>,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let supervisor = Self {
            settings,
            launcher,
            events_tx,
            state_tx,
            start_count,
            registry: Registry::default(),
            pending: VecDeque::new(),
            child: None,
            child_eof: false,
            commands_closed: false,
            health: None,
            versions: None,
            broken: None,
            stopping: false,
            reinit_waiters: Vec::new(),
            shutdown_waiters: Vec::new(),
        };
        (supervisor, events_rx)
    }

    fn state(&self) -> State {
        *self.state_tx.borrow()
    }

    fn transition(&self, to: State) {
        let from = self.state_tx.send_replace(to);
        if from != to {
            tracing::debug!(?from, ?to, "supervisor state change");
        }
    }

    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        loop {
            self.transition(State::Initializing);
            debug_assert!(self.registry.is_empty());

            let mut child_events = match (self.launcher)() {
                Ok((child, child_events)) => {
                    self.start_count.fetch_add(1, Ordering::Relaxed);
                    self.child = Some(child);
                    self.child_eof = false;
                    child_events
                }
                Err(err) => {
                    let err = Error::Lifecycle(format!("failed to start compiler: {err}"));
                    tracing::warn!(error = %err, "compiler did not start");
                    self.broken = Some(err.clone());
                    self.transition(State::Broken);
                    for waiter in self.reinit_waiters.drain(..) {
                        _ = waiter.send(Err(err.clone()));
                    }
                    self.fail_pending(&err);
                    self.serve_broken(&mut commands).await;
                    self.broken = None;
                    if self.stopping {
                        break;
                    }
                    continue;
                }
            };

            self.transition(State::Checking);
            self.health = Some(self.send_version_request().await);

            self.serve(&mut commands, &mut events, &mut child_events)
                .await;

            // Quiescence reached: no active requests remain and the child
            // is gone. Either restart or exit for good.
            if self.stopping {
                break;
            }
        }

        self.transition(State::Shutdown);
        if let Some(child) = self.child.take() {
            child.stop().await;
        }
        let err = Error::shut_down();
        self.fail_pending(&err);
        for waiter in self.reinit_waiters.drain(..) {
            _ = waiter.send(Err(err.clone()));
        }
        for waiter in self.shutdown_waiters.drain(..) {
            _ = waiter.send(());
        }
        tracing::debug!("compiler supervisor exited");
    }

    /// Process traffic until the current child has been torn down and every
    /// active request has completed.
    async fn serve(
        &mut self,
        commands: &mut mpsc::Receiver<Command>,
        events: &mut mpsc::UnboundedReceiver<Event>,
        child_events: &mut mpsc::Receiver<ChildEvent>,
    ) {
        loop {
            if self.state() == State::Quiescing && self.registry.is_empty() {
                return;
            }

            tokio::select! {
                event = events.recv() => {
                    let event = event.expect("supervisor holds an event sender");
                    self.on_event(event).await;
                }
                child_event = child_events.recv(), if !self.child_eof => {
                    match child_event {
                        Some(event) => self.on_child_event(event).await,
                        None => self.child_eof = true,
                    }
                }
                command = commands.recv(), if !self.commands_closed => {
                    match command {
                        Some(command) => self.on_command(command).await,
                        None => {
                            // Every handle is gone: drain and exit.
                            self.commands_closed = true;
                            self.stopping = true;
                            self.fault(Error::shut_down()).await;
                        }
                    }
                }
            }

            self.poll_health().await;
        }
    }

    /// Park in Broken, handling commands (compiles fail fast; a reinit or
    /// shutdown faults), until the fault handler moves the lifecycle on.
    async fn serve_broken(&mut self, commands: &mut mpsc::Receiver<Command>) {
        while self.state() == State::Broken {
            match commands.recv().await {
                Some(command) => self.on_command(command).await,
                None => {
                    // Every handle is gone: drain and exit.
                    self.commands_closed = true;
                    self.stopping = true;
                    self.fault(Error::shut_down()).await;
                }
            }
        }
    }

    async fn on_command(&mut self, command: Command) {
        match command {
            Command::ProcessId { reply } => {
                _ = reply.send(self.child.as_ref().map(|c| c.pid()));
            }
            Command::Reinit { reply } => {
                self.reinit_waiters.push(reply);
                self.fault(Error::Lifecycle(
                    "user requested a compiler restart".to_string(),
                ))
                .await;
            }
            Command::Shutdown { reply } => {
                self.stopping = true;
                self.shutdown_waiters.push(reply);
                self.fault(Error::shut_down()).await;
            }
            command => match self.state() {
                State::Running => self.start(command).await,
                // Not ready: park until the next Running transition.
                State::Initializing | State::Checking | State::Quiescing => {
                    self.pending.push_back(command);
                }
                State::Broken | State::Shutdown => {
                    let err = self
                        .broken
                        .clone()
                        .unwrap_or_else(Error::shut_down);
                    fail_command(command, &err);
                }
            },
        }
    }

    /// Dispatch a compile or versions command in the Running state.
    async fn start(&mut self, command: Command) {
        match command {
            Command::Compile {
                request,
                importers,
                functions,
                reply,
            } => {
                let id = next_request_id();
                let compilation =
                    CompilationRequest::new(id, importers, functions, reply, self.events_tx.clone());
                self.registry
                    .insert(id, Request::Compilation(compilation.clone()));
                if let Some(timeout) = self.settings.effective_timeout() {
                    compilation.start_timer(timeout);
                }

                tracing::debug!(compilation_id = id, "dispatching compile request");
                let message = InboundMessage {
                    message: Some(inbound_message::Message::CompileRequest(request)),
                };
                let child = self.child.as_ref().expect("running state has a child");
                if let Err(err) = child.send(id, &message).await {
                    // The request completes through cancel_all on this path.
                    self.fault(Error::protocol(format!(
                        "failed to write to compiler: {err}"
                    )))
                    .await;
                }
            }
            Command::Versions { reply } => {
                _ = reply.send(Ok(self
                    .versions
                    .clone()
                    .expect("running state has checked versions")));
            }
            _ => unreachable!("start only handles compile and versions"),
        }
    }

    /// Send the health-check version query for a freshly spawned child.
    async fn send_version_request(&mut self) -> oneshot::Receiver<Result<Versions, Error>> {
        let id = next_request_id();
        let (reply, receiver) = oneshot::channel();
        let request = VersionRequest::new(id, reply, self.events_tx.clone());
        self.registry.insert(id, Request::Version(request.clone()));
        if let Some(timeout) = self.settings.effective_timeout() {
            request.start_timer(timeout);
        }

        let message = InboundMessage {
            message: Some(inbound_message::Message::VersionRequest(
                inbound_message::VersionRequest { id },
            )),
        };
        let child = self.child.as_ref().expect("checking state has a child");
        if let Err(err) = child.send(0, &message).await {
            self.fault(Error::protocol(format!(
                "failed to write to compiler: {err}"
            )))
            .await;
        }
        receiver
    }

    /// Resolve the pending health check, if its response has arrived.
    async fn poll_health(&mut self) {
        if self.state() != State::Checking {
            return;
        }
        let Some(health) = &mut self.health else {
            return;
        };
        let outcome = match health.try_recv() {
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(Error::protocol("version request was dropped"))
            }
            Ok(outcome) => outcome,
        };
        self.health = None;

        match outcome.and_then(|versions| {
            validate_protocol_version(&versions.protocol_version)?;
            Ok(versions)
        }) {
            Ok(versions) => {
                tracing::debug!(
                    protocol_version = %versions.protocol_version,
                    compiler = %versions.compiler_name,
                    "compiler is healthy"
                );
                self.versions = Some(versions);
                self.enter_running().await;
            }
            Err(err) => self.fault(err).await,
        }
    }

    /// Transition into Running and drain everything that queued up while
    /// the compiler wasn't ready.
    async fn enter_running(&mut self) {
        self.transition(State::Running);
        for waiter in self.reinit_waiters.drain(..) {
            _ = waiter.send(Ok(()));
        }
        while self.state() == State::Running {
            let Some(command) = self.pending.pop_front() else {
                return;
            };
            self.start(command).await;
        }
    }

    async fn on_child_event(&mut self, event: ChildEvent) {
        match event {
            ChildEvent::Frame(0, message) => {
                let Some(message) = message.message else {
                    self.fault(Error::protocol("received an empty outbound message"))
                        .await;
                    return;
                };
                self.on_global_message(message).await
            }
            ChildEvent::Frame(compilation_id, message) => {
                let Some(message) = message.message else {
                    self.fault(Error::protocol("received an empty outbound message"))
                        .await;
                    return;
                };
                let Some(Request::Compilation(request)) = self.registry.get(compilation_id) else {
                    self.fault(Error::protocol(format!(
                        "received message for unknown compilation {compilation_id}"
                    )))
                    .await;
                    return;
                };
                let request = request.clone();
                let writer = self
                    .child
                    .as_ref()
                    .expect("routing frames requires a child")
                    .writer();
                match request.receive(message, &writer) {
                    Ok(Disposition::Done) => self.registry.remove(compilation_id),
                    Ok(Disposition::Pending) => {}
                    Err(err) => self.fault(err).await,
                }
            }
            ChildEvent::Malformed(err) => self.fault(err).await,
            ChildEvent::Exited => {
                self.fault(Error::protocol("the compiler exited unexpectedly"))
                    .await;
            }
        }
    }

    /// Messages with the reserved compilation ID 0: version responses and
    /// global protocol errors.
    async fn on_global_message(&mut self, message: outbound_message::Message) {
        match message {
            outbound_message::Message::VersionResponse(response) => {
                let Some(Request::Version(request)) = self.registry.get(response.id) else {
                    self.fault(Error::protocol(format!(
                        "received version response for unknown request {}",
                        response.id
                    )))
                    .await;
                    return;
                };
                let request = request.clone();
                let id = response.id;
                match request.receive(response) {
                    Ok(Disposition::Done) => self.registry.remove(id),
                    Ok(Disposition::Pending) => {}
                    Err(err) => self.fault(err).await,
                }
            }
            outbound_message::Message::Error(error) => {
                self.fault(Error::protocol(format!(
                    "compiler reported a protocol error: {}",
                    error.message
                )))
                .await;
            }
            _ => {
                self.fault(Error::protocol(
                    "received a compilation message outside any compilation",
                ))
                .await;
            }
        }
    }

    async fn on_event(&mut self, event: Event) {
        match event {
            Event::Completed(id) => self.registry.remove(id),
            Event::TimedOut(id) => {
                // A timer racing its own request's completion is a no-op.
                if !self.registry.contains(id) {
                    return;
                }
                let label = self.registry.get(id).map(Request::label).unwrap_or_default();
                self.fault(Error::timeout(&label, self.settings.timeout_seconds))
                    .await;
            }
            Event::Fault(err) => self.fault(err).await,
        }
    }

    /// The single fault entry point. What it does depends on where the
    /// lifecycle currently stands.
    async fn fault(&mut self, err: Error) {
        match self.state() {
            State::Running | State::Checking => {
                tracing::warn!(error = %err, "compiler fault; tearing down");
                self.transition(State::Quiescing);
                self.health = None;
                if let Some(child) = self.child.take() {
                    child.stop().await;
                }
                self.registry.cancel_all(&err);
            }
            // Already tearing down: just hurry the child along.
            State::Quiescing => {
                if let Some(child) = self.child.take() {
                    child.stop().await;
                }
            }
            // Re-entry for reinit: the broken wait observes the transition
            // and the run loop spawns a fresh child (or exits, if the fault
            // came from a shutdown).
            State::Broken => self.transition(State::Initializing),
            State::Initializing | State::Shutdown => {}
        }
    }

    fn fail_pending(&mut self, err: &Error) {
        for command in self.pending.drain(..) {
            fail_command(command, err);
        }
    }
}

fn fail_command(command: Command, err: &Error) {
    match command {
        Command::Compile { reply, .. } => {
            _ = reply.send(Err(err.clone()));
        }
        Command::Versions { reply } => {
            _ = reply.send(Err(err.clone()));
        }
        Command::ProcessId { reply } => {
            _ = reply.send(None);
        }
        Command::Reinit { reply } => {
            _ = reply.send(Err(err.clone()));
        }
        Command::Shutdown { reply } => {
            _ = reply.send(());
        }
    }
}

fn validate_protocol_version(version: &str) -> Result<(), Error> {
    let Some(parsed) = parse_semver(version) else {
        return Err(Error::protocol(format!(
            "compiler protocol version '{version}' is unparseable"
        )));
    };
    let (min_major, _, _) = MIN_PROTOCOL_VERSION;
    if parsed.0 != min_major || parsed < MIN_PROTOCOL_VERSION {
        return Err(Error::protocol(format!(
            "compiler protocol version {version} is unsupported (need >= {}.{}.{}, < {}.0.0)",
            MIN_PROTOCOL_VERSION.0,
            MIN_PROTOCOL_VERSION.1,
            MIN_PROTOCOL_VERSION.2,
            min_major + 1,
        )));
    }
    Ok(())
}

fn parse_semver(version: &str) -> Option<(u64, u64, u64)> {
    let mut parts = version.splitn(3, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    // The patch component may carry a pre-release or build suffix.
    let patch = parts.next()?;
    let patch = patch
        .split(|c| c == '-' || c == '+')
        .next()?
        .parse()
        .ok()?;
    Some((major, minor, patch))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec;
    use crate::compiler::Compiler;
    use crate::function::function;
    use crate::importer::{Importer, ImporterContext, ImporterResults};
    use crate::options::{CompileOptions, OutputStyle, Settings, Syntax};
    use crate::value::Value;
    use bytes::BytesMut;
    use prost::Message as _;
    use proto_sass::embedded_protocol::{
        inbound_message, outbound_message, InboundMessage, OutboundMessage,
    };
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::AtomicBool;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::UnixStream;
    use url::Url;

    type Script = Box<dyn FnOnce(UnixStream) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

    fn script<F, Fut>(f: F) -> Script
    where
        F: FnOnce(UnixStream) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Box::new(move |stream| Box::pin(f(stream)))
    }

    /// A launcher that hands each spawned "compiler" to the next script.
    fn scripted_launcher(scripts: Vec<Script>) -> Launcher {
        let scripts = std::sync::Mutex::new(VecDeque::from(scripts));
        Arc::new(move || {
            let script = scripts
                .lock()
                .unwrap()
                .pop_front()
                .expect("test spawned more children than it scripted");
            let (child, peer, events) = Child::pair()?;
            tokio::spawn(script(peer));
            Ok((child, events))
        })
    }

    fn compiler_with(scripts: Vec<Script>, settings: Settings) -> Compiler {
        Compiler::with_launcher(Arc::new(settings), scripted_launcher(scripts))
    }

    /// The peer half of the framing: read one InboundMessage.
    struct Peer {
        stream: UnixStream,
        decoder: codec::Decoder,
        buffer: BytesMut,
    }

    impl Peer {
        fn new(stream: UnixStream) -> Self {
            Self {
                stream,
                decoder: codec::Decoder::new(),
                buffer: BytesMut::with_capacity(4096),
            }
        }

        async fn read(&mut self) -> Option<(u32, inbound_message::Message)> {
            loop {
                if let Some((id, body)) = self.decoder.decode(&mut self.buffer).unwrap() {
                    let message = InboundMessage::decode(body.as_ref()).unwrap();
                    return Some((id, message.message.expect("inbound message has content")));
                }
                match self.stream.read_buf(&mut self.buffer).await {
                    Ok(0) | Err(_) => return None,
                    Ok(_) => {}
                }
            }
        }

        async fn write(&mut self, compilation_id: u32, message: outbound_message::Message) {
            let message = OutboundMessage {
                message: Some(message),
            };
            _ = self
                .stream
                .write_all(&codec::encode_frame(compilation_id, &message.encode_to_vec()))
                .await;
        }

        /// Answer the supervisor's health check.
        async fn answer_version(&mut self) {
            self.answer_version_with("2.7.1").await;
        }

        async fn answer_version_with(&mut self, protocol_version: &str) {
            let Some((0, inbound_message::Message::VersionRequest(request))) = self.read().await
            else {
                panic!("expected a version request first");
            };
            self.write(
                0,
                outbound_message::Message::VersionResponse(outbound_message::VersionResponse {
                    id: request.id,
                    protocol_version: protocol_version.to_string(),
                    compiler_version: "1.77.8".to_string(),
                    implementation_version: "1.77.8".to_string(),
                    implementation_name: "dart-sass".to_string(),
                }),
            )
            .await;
        }

        /// Read a compile request, returning its compilation ID and body.
        async fn read_compile(&mut self) -> (u32, inbound_message::CompileRequest) {
            match self.read().await {
                Some((id, inbound_message::Message::CompileRequest(request))) => (id, request),
                other => panic!("expected a compile request, got {other:?}"),
            }
        }

        async fn respond_success(&mut self, compilation_id: u32, css: &str, loaded_urls: &[&str]) {
            use outbound_message::compile_response;
            self.write(
                compilation_id,
                outbound_message::Message::CompileResponse(outbound_message::CompileResponse {
                    loaded_urls: loaded_urls.iter().map(|u| u.to_string()).collect(),
                    result: Some(compile_response::Result::Success(
                        compile_response::CompileSuccess {
                            css: css.to_string(),
                            source_map: String::new(),
                        },
                    )),
                }),
            )
            .await;
        }
    }

    /// One healthy end-to-end compile: answer the health check, turn the
    /// compile request into fixed CSS, then hold the socket open until the
    /// host hangs up.
    fn healthy_compile(css: &'static str) -> Script {
        script(move |stream| async move {
            let mut peer = Peer::new(stream);
            peer.answer_version().await;
            let (id, _request) = peer.read_compile().await;
            peer.respond_success(id, css, &[]).await;
            let _ = peer.read().await;
        })
    }

    /// Passes the health check, then does nothing until the host hangs up.
    fn idle_child() -> Script {
        script(|stream| async move {
            let mut peer = Peer::new(stream);
            peer.answer_version().await;
            let _ = peer.read().await;
        })
    }

    #[tokio::test]
    async fn compiles_a_string() {
        let compiler = compiler_with(
            vec![script(|stream| async move {
                let mut peer = Peer::new(stream);
                peer.answer_version().await;

                let (id, request) = peer.read_compile().await;
                assert!(id >= 4000);
                match request.input {
                    Some(inbound_message::compile_request::Input::String(input)) => {
                        assert_eq!(input.source, "a{b:1}");
                        assert_eq!(input.syntax, proto_sass::embedded_protocol::Syntax::Scss as i32);
                    }
                    other => panic!("expected string input, got {other:?}"),
                }

                // One malformed loaded URL, which the host must skip.
                peer.respond_success(id, "a {\n  b: 1;\n}", &["file:///in.scss", "not a url"])
                    .await;
                let _ = peer.read().await;
            })],
            Settings::default(),
        );

        let results = compiler
            .compile_string("a{b:1}", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.css, "a {\n  b: 1;\n}");
        assert_eq!(
            results.loaded_urls,
            vec![Url::parse("file:///in.scss").unwrap()],
        );
        assert!(results.messages.is_empty());
        assert_eq!(compiler.start_count(), 1);

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn compiles_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("in.scss");
        std::fs::write(&sheet, "a{b:1}").unwrap();
        let expected = sheet.to_string_lossy().into_owned();

        let compiler = compiler_with(
            vec![script(move |stream| async move {
                let mut peer = Peer::new(stream);
                peer.answer_version().await;

                let (id, request) = peer.read_compile().await;
                match request.input {
                    Some(inbound_message::compile_request::Input::Path(path)) => {
                        assert_eq!(path, expected);
                    }
                    other => panic!("expected path input, got {other:?}"),
                }
                peer.respond_success(id, "a {\n  b: 1;\n}", &[]).await;
                let _ = peer.read().await;
            })],
            Settings::default(),
        );

        let results = compiler
            .compile_file(dir.path().join("in.scss"), CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.css, "a {\n  b: 1;\n}");

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn compiler_errors_stay_local() {
        use outbound_message::compile_response;

        let compiler = compiler_with(
            vec![script(|stream| async move {
                let mut peer = Peer::new(stream);
                peer.answer_version().await;

                // First compile fails with @error; second succeeds on the
                // same child.
                let (id, _) = peer.read_compile().await;
                peer.write(
                    id,
                    outbound_message::Message::CompileResponse(
                        outbound_message::CompileResponse {
                            loaded_urls: vec![],
                            result: Some(compile_response::Result::Failure(
                                compile_response::CompileFailure {
                                    message: "Error: \"stop\"".to_string(),
                                    span: None,
                                    stack_trace: String::new(),
                                    formatted: "Error: \"stop\"\n  - 1:1  root".to_string(),
                                },
                            )),
                        },
                    ),
                )
                .await;

                let (id, _) = peer.read_compile().await;
                peer.respond_success(id, "ok{}", &[]).await;
                let _ = peer.read().await;
            })],
            Settings::default(),
        );

        let err = compiler
            .compile_string("@error \"stop\";", CompileOptions::new())
            .await
            .unwrap_err();
        match &err {
            Error::Compiler(failure) => assert!(failure.message.contains("stop")),
            other => panic!("expected a compiler error, got {other:?}"),
        }

        // The supervisor never faulted: same child, same start count.
        let results = compiler
            .compile_string("ok", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.css, "ok{}");
        assert_eq!(compiler.start_count(), 1);

        compiler.shutdown().await;
    }

    struct MemoryImporter;

    #[async_trait::async_trait]
    impl Importer for MemoryImporter {
        async fn canonicalize(
            &self,
            url: &str,
            _context: &ImporterContext,
        ) -> anyhow::Result<Option<Url>> {
            Ok(Some(Url::parse(&format!("memory:/{url}"))?))
        }

        async fn load(&self, canonical_url: &Url) -> anyhow::Result<Option<ImporterResults>> {
            assert_eq!(canonical_url.as_str(), "memory:/x");
            Ok(Some(ImporterResults::new("a{b:1}", Syntax::Scss)))
        }
    }

    #[tokio::test]
    async fn importer_callbacks_round_trip() {
        use crate::request::BASE_IMPORTER_ID;

        let compiler = compiler_with(
            vec![script(|stream| async move {
                let mut peer = Peer::new(stream);
                peer.answer_version().await;

                let (id, request) = peer.read_compile().await;
                // The string importer is importer 4000.
                match request.input {
                    Some(inbound_message::compile_request::Input::String(input)) => {
                        use inbound_message::compile_request::importer::Importer as P;
                        assert_eq!(
                            input.importer.unwrap().importer,
                            Some(P::ImporterId(BASE_IMPORTER_ID)),
                        );
                    }
                    other => panic!("expected string input, got {other:?}"),
                }

                peer.write(
                    id,
                    outbound_message::Message::CanonicalizeRequest(
                        outbound_message::CanonicalizeRequest {
                            id: 1,
                            importer_id: BASE_IMPORTER_ID,
                            url: "x".to_string(),
                            from_import: false,
                            containing_url: None,
                        },
                    ),
                )
                .await;
                match peer.read().await {
                    Some((
                        cid,
                        inbound_message::Message::CanonicalizeResponse(response),
                    )) => {
                        assert_eq!(cid, id);
                        assert_eq!(response.id, 1);
                        assert_eq!(
                            response.result,
                            Some(inbound_message::canonicalize_response::Result::Url(
                                "memory:/x".to_string()
                            )),
                        );
                    }
                    other => panic!("expected canonicalize response, got {other:?}"),
                }

                peer.write(
                    id,
                    outbound_message::Message::ImportRequest(outbound_message::ImportRequest {
                        id: 2,
                        importer_id: BASE_IMPORTER_ID,
                        url: "memory:/x".to_string(),
                    }),
                )
                .await;
                match peer.read().await {
                    Some((_, inbound_message::Message::ImportResponse(response))) => {
                        assert_eq!(response.id, 2);
                        match response.result {
                            Some(inbound_message::import_response::Result::Success(success)) => {
                                assert_eq!(success.contents, "a{b:1}");
                            }
                            other => panic!("expected import success, got {other:?}"),
                        }
                    }
                    other => panic!("expected import response, got {other:?}"),
                }

                peer.respond_success(id, "a {\n  b: 1;\n}", &["memory:/x"]).await;
                let _ = peer.read().await;
            })],
            Settings::default(),
        );

        let results = compiler
            .compile_string(
                "@use 'x';",
                CompileOptions::new()
                    .input_importer(crate::ImportResolver::Importer(Arc::new(MemoryImporter))),
            )
            .await
            .unwrap();
        assert_eq!(results.loaded_urls, vec![Url::parse("memory:/x").unwrap()]);

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn host_functions_quote_and_echo_keyword_access() {
        use proto_sass::embedded_protocol::{value, Value as ProtoValue};

        let compiler = compiler_with(
            vec![script(|stream| async move {
                let mut peer = Peer::new(stream);
                peer.answer_version().await;

                let (id, request) = peer.read_compile().await;
                assert_eq!(request.global_functions, vec!["myQuote($p)".to_string()]);

                // Call myQuote with an argument list whose keywords the
                // function reads; its wire ID must come back.
                peer.write(
                    id,
                    outbound_message::Message::FunctionCallRequest(
                        outbound_message::FunctionCallRequest {
                            id: 9,
                            arguments: vec![ProtoValue {
                                value: Some(value::Value::ArgumentList(value::ArgumentList {
                                    id: 26,
                                    separator: 0,
                                    contents: vec![ProtoValue {
                                        value: Some(value::Value::String(value::String {
                                            text: "fish".to_string(),
                                            quoted: false,
                                        })),
                                    }],
                                    keywords: Default::default(),
                                })),
                            }],
                            identifier: Some(
                                outbound_message::function_call_request::Identifier::Name(
                                    "myQuote".to_string(),
                                ),
                            ),
                        },
                    ),
                )
                .await;

                match peer.read().await {
                    Some((_, inbound_message::Message::FunctionCallResponse(response))) => {
                        assert_eq!(response.id, 9);
                        assert_eq!(response.accessed_argument_lists, vec![26]);
                        match response.result {
                            Some(inbound_message::function_call_response::Result::Success(
                                value,
                            )) => match value.value {
                                Some(value::Value::String(s)) => {
                                    assert_eq!(s.text, "fish");
                                    assert!(s.quoted);
                                }
                                other => panic!("expected a string, got {other:?}"),
                            },
                            other => panic!("expected success, got {other:?}"),
                        }
                    }
                    other => panic!("expected function call response, got {other:?}"),
                }

                peer.respond_success(id, "a{b:\"fish\"}", &[]).await;
                let _ = peer.read().await;
            })],
            Settings::default(),
        );

        let my_quote = function(|arguments: Vec<Value>| async move {
            let Some(Value::ArgumentList(list)) = arguments.first() else {
                anyhow::bail!("expected an argument list");
            };
            // Touch the keywords so the access is observable.
            let _ = list.keywords();
            match list.positional().first() {
                Some(Value::String(s)) => Ok(Value::string(s.text.clone())),
                other => anyhow::bail!("cannot quote {other:?}"),
            }
        });

        let results = compiler
            .compile_string(
                "a{b: myQuote(fish)}",
                CompileOptions::new()
                    .style(OutputStyle::Compressed)
                    .function("myQuote($p)", my_quote),
            )
            .await
            .unwrap();
        assert_eq!(results.css, "a{b:\"fish\"}");

        compiler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_faults_and_restarts() {
        let compiler = compiler_with(
            vec![
                // Accepts the compile request and then goes quiet.
                script(|stream| async move {
                    let mut peer = Peer::new(stream);
                    peer.answer_version().await;
                    let _ = peer.read_compile().await;
                    // Hold the socket open until the supervisor kills us.
                    let _ = peer.read().await;
                }),
                healthy_compile("ok{}"),
            ],
            Settings::default().timeout(2),
        );

        let err = compiler
            .compile_string("a{b:1}", CompileOptions::new())
            .await
            .unwrap_err();
        match &err {
            Error::Protocol(message) => assert!(message.contains("Timeout"), "{message}"),
            other => panic!("expected a protocol error, got {other:?}"),
        }

        // The fault tore the child down and a fresh one came up.
        let results = compiler
            .compile_string("a{b:1}", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.css, "ok{}");
        assert_eq!(compiler.start_count(), 2);

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn unknown_compilation_id_faults_active_requests() {
        let compiler = compiler_with(
            vec![
                script(|stream| async move {
                    let mut peer = Peer::new(stream);
                    peer.answer_version().await;
                    let _ = peer.read_compile().await;
                    // A frame for a compilation that doesn't exist.
                    peer.respond_success(999, "never{}", &[]).await;
                    let _ = peer.read().await;
                }),
                healthy_compile("ok{}"),
            ],
            Settings::default(),
        );

        let err = compiler
            .compile_string("a{b:1}", CompileOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)), "{err:?}");

        // Quiescing → Initializing → Running, with a fresh child.
        let results = compiler
            .compile_string("a{b:1}", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.css, "ok{}");
        assert_eq!(compiler.start_count(), 2);

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn importer_id_validation_never_reaches_callbacks() {
        let called = Arc::new(AtomicBool::new(false));

        struct Flagging(Arc<AtomicBool>);

        #[async_trait::async_trait]
        impl Importer for Flagging {
            async fn canonicalize(
                &self,
                _url: &str,
                _context: &ImporterContext,
            ) -> anyhow::Result<Option<Url>> {
                self.0.store(true, Ordering::Relaxed);
                Ok(None)
            }

            async fn load(&self, _url: &Url) -> anyhow::Result<Option<ImporterResults>> {
                self.0.store(true, Ordering::Relaxed);
                Ok(None)
            }
        }

        let compiler = compiler_with(
            vec![
                script(|stream| async move {
                    let mut peer = Peer::new(stream);
                    peer.answer_version().await;
                    let (id, _) = peer.read_compile().await;
                    // Out of range: only importer 4000 exists.
                    peer.write(
                        id,
                        outbound_message::Message::CanonicalizeRequest(
                            outbound_message::CanonicalizeRequest {
                                id: 1,
                                importer_id: 5000,
                                url: "x".to_string(),
                                from_import: false,
                                containing_url: None,
                            },
                        ),
                    )
                    .await;
                    let _ = peer.read().await;
                }),
                // The fault tears the first child down; the supervisor
                // comes back up on this one.
                idle_child(),
            ],
            Settings::default(),
        );

        let err = compiler
            .compile_string(
                "@use 'x';",
                CompileOptions::new().input_importer(crate::ImportResolver::Importer(Arc::new(
                    Flagging(called.clone()),
                ))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)), "{err:?}");
        assert!(!called.load(Ordering::Relaxed));

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn bad_protocol_version_fails_the_health_check() {
        let compiler = compiler_with(
            vec![
                script(|stream| async move {
                    let mut peer = Peer::new(stream);
                    peer.answer_version_with("3.0.0").await;
                    let _ = peer.read().await;
                }),
                healthy_compile("ok{}"),
            ],
            Settings::default(),
        );

        // The first child flunks its health check; the parked compile runs
        // on the replacement.
        let results = compiler
            .compile_string("a{b:1}", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.css, "ok{}");
        assert_eq!(compiler.start_count(), 2);

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn versions_come_from_the_health_check() {
        let compiler = compiler_with(vec![idle_child()], Settings::default());

        let versions = compiler.versions().await.unwrap();
        assert_eq!(versions.protocol_version, "2.7.1");
        assert_eq!(versions.compiler_name, "dart-sass");

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn broken_fails_fast_until_reinit() {
        let attempted = Arc::new(AtomicU64::new(0));
        let scripts = std::sync::Mutex::new(VecDeque::from(vec![healthy_compile("ok{}")]));
        let launcher: Launcher = {
            let attempted = attempted.clone();
            Arc::new(move || {
                // The first spawn fails outright.
                if attempted.fetch_add(1, Ordering::Relaxed) == 0 {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no such binary",
                    ));
                }
                let script = scripts.lock().unwrap().pop_front().unwrap();
                let (child, peer, events) = Child::pair()?;
                tokio::spawn(script(peer));
                Ok((child, events))
            })
        };
        let compiler = Compiler::with_launcher(Arc::new(Settings::default()), launcher);

        let err = compiler
            .compile_string("a{}", CompileOptions::new())
            .await
            .unwrap_err();
        match &err {
            Error::Lifecycle(message) => assert!(message.contains("failed to start")),
            other => panic!("expected a lifecycle error, got {other:?}"),
        }

        compiler.reinit().await.unwrap();
        let results = compiler
            .compile_string("a{}", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.css, "ok{}");

        compiler.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_reaches_broken_supervisors() {
        let launcher: Launcher = Arc::new(|| {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such binary",
            ))
        });
        let compiler = Compiler::with_launcher(Arc::new(Settings::default()), launcher);

        let err = compiler
            .compile_string("a{}", CompileOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lifecycle(_)), "{err:?}");

        compiler.shutdown().await;
        let err = compiler.reinit().await.unwrap_err();
        assert!(matches!(err, Error::Lifecycle(_)), "{err:?}");
    }

    #[tokio::test]
    async fn shutdown_is_terminal() {
        let compiler = compiler_with(vec![idle_child()], Settings::default());

        compiler.shutdown().await;
        // Idempotent.
        compiler.shutdown().await;

        let err = compiler
            .compile_string("a{}", CompileOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lifecycle(_)), "{err:?}");

        let err = compiler.reinit().await.unwrap_err();
        assert!(matches!(err, Error::Lifecycle(_)), "{err:?}");
    }

    #[tokio::test]
    async fn log_events_accumulate_onto_results() {
        let compiler = compiler_with(
            vec![script(|stream| async move {
                let mut peer = Peer::new(stream);
                peer.answer_version().await;
                let (id, _) = peer.read_compile().await;
                peer.write(
                    id,
                    outbound_message::Message::LogEvent(outbound_message::LogEvent {
                        r#type: proto_sass::embedded_protocol::LogEventType::DeprecationWarning
                            as i32,
                        message: "don't".to_string(),
                        span: None,
                        stack_trace: String::new(),
                        formatted: "DEPRECATION WARNING: don't".to_string(),
                        deprecation_type: Some("slash-div".to_string()),
                    }),
                )
                .await;
                peer.respond_success(id, "a{}", &[]).await;
                let _ = peer.read().await;
            })],
            Settings::default(),
        );

        let results = compiler
            .compile_string("a{}", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(results.messages.len(), 1);
        let message = &results.messages[0];
        assert_eq!(message.kind, crate::MessageKind::Deprecation);
        assert_eq!(message.message, "don't");
        assert_eq!(message.deprecation_type.as_deref(), Some("slash-div"));

        compiler.shutdown().await;
    }

    #[test]
    fn request_ids_are_unique_and_increasing() {
        let first = next_request_id();
        let mut previous = first;
        for _ in 0..100 {
            let id = next_request_id();
            assert!(id > previous);
            previous = id;
        }
        assert!(first >= 4000);
    }

    #[test]
    fn protocol_version_bounds() {
        assert!(validate_protocol_version("2.0.0").is_ok());
        assert!(validate_protocol_version("2.7.1").is_ok());
        assert!(validate_protocol_version("2.7.1-dev").is_ok());
        assert!(validate_protocol_version("1.9.9").is_err());
        assert!(validate_protocol_version("3.0.0").is_err());
        assert!(validate_protocol_version("two").is_err());
    }
}
