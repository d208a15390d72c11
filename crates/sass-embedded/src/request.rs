//! Active requests: the registry that correlates inbound frames with the
//! compilation (or version query) they belong to, and the per-request state
//! machines that bracket user callbacks, arm timeouts, and guarantee
//! exactly one completion.

use crate::child::Writer;
use crate::convert;
use crate::error::{CompilerError, Error};
use crate::function::{self, SassFunction};
use crate::importer::{FilesystemImporter, ImportResolver, Importer, ImporterContext};
use crate::supervisor::Event;
use crate::value::{KeywordsObserver, Value};
use crate::{CompilerMessage, CompilerResults, Versions};
use proto_sass::embedded_protocol::{inbound_message, outbound_message, InboundMessage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use url::Url;

/// Importers visible to the compiler are numbered upward from here, in the
/// order they appear in the compilation's effective importer list.
pub(crate) const BASE_IMPORTER_ID: u32 = 4000;

static NEXT_REQUEST_ID: AtomicU32 = AtomicU32::new(4000);

/// Allocate a compilation/request ID. Process-wide and monotonic; IDs are
/// never reused within a supervisor's lifetime.
pub(crate) fn next_request_id() -> u32 {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// What the supervisor should do with a request after routing a message.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Still in flight.
    Pending,
    /// Finished; drop it from the registry.
    Done,
}

/// An active request, as the registry stores it.
#[derive(Clone)]
pub(crate) enum Request {
    Compilation(Arc<CompilationRequest>),
    Version(Arc<VersionRequest>),
}

impl Request {
    pub(crate) fn label(&self) -> String {
        match self {
            Request::Compilation(req) => req.label.clone(),
            Request::Version(req) => req.label.clone(),
        }
    }

    /// Cancel with `err`. Returns true when the request completed now; a
    /// request inside a user callback records the error instead and
    /// completes when the callback returns.
    fn cancel(&self, err: Error) -> bool {
        match self {
            Request::Compilation(req) => req.cancel(err),
            Request::Version(req) => req.cancel(err),
        }
    }
}

/// The set of live requests, keyed by request ID. Mutated only from the
/// supervisor task.
#[derive(Default)]
pub(crate) struct Registry {
    active: HashMap<u32, Request>,
}

impl Registry {
    pub(crate) fn insert(&mut self, id: u32, request: Request) {
        let previous = self.active.insert(id, request);
        debug_assert!(previous.is_none(), "request id {id} was reused");
    }

    pub(crate) fn remove(&mut self, id: u32) {
        self.active.remove(&id);
    }

    pub(crate) fn get(&self, id: u32) -> Option<&Request> {
        self.active.get(&id)
    }

    pub(crate) fn contains(&self, id: u32) -> bool {
        self.active.contains_key(&id)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Cancel every live request. Requests that complete immediately are
    /// dropped; requests waiting on a user callback stay until the callback
    /// returns and their completion event arrives.
    pub(crate) fn cancel_all(&mut self, err: &Error) {
        self.active.retain(|_, request| !request.cancel(err.clone()));
    }
}

/// Callback bracketing state shared by both request kinds.
#[derive(Debug)]
enum Phase {
    Normal,
    /// `depth` user callbacks are executing. A cancellation that arrives
    /// now is parked in `pending` and fires when the last callback returns.
    InClient { depth: u32, pending: Option<Error> },
    Completed,
}

struct CompilationState {
    phase: Phase,
    done: Option<oneshot::Sender<Result<CompilerResults, Error>>>,
    timer: Option<tokio::task::AbortHandle>,
    messages: Vec<CompilerMessage>,
}

/// One in-flight compilation: its callback configuration, accumulated
/// diagnostics, and completion sink.
pub(crate) struct CompilationRequest {
    id: u32,
    label: String,
    importers: Vec<ImportResolver>,
    functions: HashMap<String, SassFunction>,
    events: mpsc::UnboundedSender<Event>,
    state: Mutex<CompilationState>,
}

impl CompilationRequest {
    pub(crate) fn new(
        id: u32,
        importers: Vec<ImportResolver>,
        functions: HashMap<String, SassFunction>,
        done: oneshot::Sender<Result<CompilerResults, Error>>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            label: format!("compile-{id}"),
            importers,
            functions,
            events,
            state: Mutex::new(CompilationState {
                phase: Phase::Normal,
                done: Some(done),
                timer: None,
                messages: Vec::new(),
            }),
        })
    }

    /// Arm the inactivity timer. Fires at most once; every completion path
    /// disarms it.
    pub(crate) fn start_timer(&self, timeout: Duration) {
        let id = self.id;
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            _ = events.send(Event::TimedOut(id));
        });
        self.state.lock().unwrap().timer = Some(handle.abort_handle());
    }

    /// Route one inbound message addressed to this compilation. Returned
    /// errors are protocol violations and fault the supervisor.
    pub(crate) fn receive(
        self: &Arc<Self>,
        message: outbound_message::Message,
        writer: &Arc<Writer>,
    ) -> Result<Disposition, Error> {
        use outbound_message::Message;

        match message {
            Message::CompileResponse(response) => self.on_compile_response(response),
            Message::LogEvent(event) => {
                let message = convert::message_from_log(event)?;
                self.state.lock().unwrap().messages.push(message);
                Ok(Disposition::Pending)
            }
            Message::CanonicalizeRequest(request) => {
                let importer = match self.importer(request.importer_id)? {
                    ImportResolver::Importer(importer) => importer.clone(),
                    other => {
                        return Err(Error::protocol(format!(
                            "canonicalize request addressed to {} {}",
                            other.kind_name(),
                            request.importer_id,
                        )));
                    }
                };
                if self.client_starting() {
                    tokio::spawn(self.clone().run_canonicalize(
                        request,
                        importer,
                        writer.clone(),
                    ));
                }
                Ok(Disposition::Pending)
            }
            Message::ImportRequest(request) => {
                let importer = match self.importer(request.importer_id)? {
                    ImportResolver::Importer(importer) => importer.clone(),
                    other => {
                        return Err(Error::protocol(format!(
                            "import request addressed to {} {}",
                            other.kind_name(),
                            request.importer_id,
                        )));
                    }
                };
                let url = Url::parse(&request.url).map_err(|err| {
                    Error::protocol(format!(
                        "import request URL '{}' is malformed: {err}",
                        request.url
                    ))
                })?;
                if self.client_starting() {
                    tokio::spawn(self.clone().run_import(request.id, url, importer, writer.clone()));
                }
                Ok(Disposition::Pending)
            }
            Message::FileImportRequest(request) => {
                let importer = match self.importer(request.importer_id)? {
                    ImportResolver::FilesystemImporter(importer) => importer.clone(),
                    other => {
                        return Err(Error::protocol(format!(
                            "file import request addressed to {} {}",
                            other.kind_name(),
                            request.importer_id,
                        )));
                    }
                };
                if self.client_starting() {
                    tokio::spawn(self.clone().run_file_import(request, importer, writer.clone()));
                }
                Ok(Disposition::Pending)
            }
            Message::FunctionCallRequest(request) => {
                use outbound_message::function_call_request::Identifier;

                let function = match &request.identifier {
                    Some(Identifier::Name(name)) => {
                        self.functions.get(name).cloned().ok_or_else(|| {
                            Error::protocol(format!("unknown function '{name}'"))
                        })?
                    }
                    Some(Identifier::FunctionId(id)) => function::lookup(*id)
                        .map(|f| f.function())
                        .ok_or_else(|| Error::protocol(format!("unknown function id {id}")))?,
                    None => {
                        return Err(Error::protocol(
                            "function call request is missing its identifier",
                        ));
                    }
                };

                // Arguments are decoded before the callback runs, so a
                // malformed value faults without any user code observing it.
                let observer = KeywordsObserver::default();
                let arguments = request
                    .arguments
                    .into_iter()
                    .map(|v| convert::value_from_proto(v, &observer))
                    .collect::<Result<Vec<_>, _>>()?;

                if self.client_starting() {
                    tokio::spawn(self.clone().run_function_call(
                        request.id,
                        function,
                        arguments,
                        observer,
                        writer.clone(),
                    ));
                }
                Ok(Disposition::Pending)
            }
            Message::Error(error) => Err(Error::protocol(format!(
                "compiler reported a protocol error: {}",
                error.message
            ))),
            Message::VersionResponse(_) => Err(Error::protocol(
                "version response addressed to a compilation",
            )),
        }
    }

    fn on_compile_response(
        &self,
        response: outbound_message::CompileResponse,
    ) -> Result<Disposition, Error> {
        use outbound_message::compile_response::Result as CompileResult;

        // Malformed entries are skipped rather than failing an otherwise
        // complete compilation.
        let loaded_urls: Vec<Url> = response
            .loaded_urls
            .iter()
            .filter_map(|u| Url::parse(u).ok())
            .collect();

        let completed = match response.result {
            None => return Err(Error::protocol("compile response is missing its result")),
            Some(CompileResult::Success(success)) => self.complete(move |messages| {
                Ok(CompilerResults {
                    css: success.css,
                    source_map: convert::none_if_empty(success.source_map),
                    messages,
                    loaded_urls,
                })
            }),
            Some(CompileResult::Failure(failure)) => self.complete(move |messages| {
                Err(Error::Compiler(Box::new(CompilerError {
                    message: failure.message,
                    span: failure.span.map(convert::span_from_proto),
                    stack_trace: convert::none_if_empty(failure.stack_trace),
                    formatted: failure.formatted,
                    loaded_urls,
                    messages,
                })))
            }),
        };

        if !completed {
            return Err(Error::protocol("compiler sent a second compile response"));
        }
        Ok(Disposition::Done)
    }

    /// Complete exactly once. `build` receives the accumulated diagnostics;
    /// returns false if the request had already completed.
    fn complete(
        &self,
        build: impl FnOnce(Vec<CompilerMessage>) -> Result<CompilerResults, Error>,
    ) -> bool {
        let mut state = self.state.lock().unwrap();
        let Some(done) = state.done.take() else {
            return false;
        };
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.phase = Phase::Completed;
        let messages = std::mem::take(&mut state.messages);
        drop(state);

        _ = done.send(build(messages));
        true
    }

    /// Cancel with `err`, returning true when completed now. While a user
    /// callback is in flight the error is parked instead, and the request
    /// completes when the callback returns.
    pub(crate) fn cancel(&self, err: Error) -> bool {
        let mut state = self.state.lock().unwrap();
        match &mut state.phase {
            Phase::Normal => {
                let Some(done) = state.done.take() else {
                    return false;
                };
                if let Some(timer) = state.timer.take() {
                    timer.abort();
                }
                state.phase = Phase::Completed;
                drop(state);
                _ = done.send(Err(err));
                true
            }
            Phase::InClient { pending, .. } => {
                // First cancellation wins.
                if pending.is_none() {
                    *pending = Some(err);
                }
                false
            }
            Phase::Completed => false,
        }
    }

    /// Bracket entry into a user callback. False once completed, in which
    /// case the callback must not run.
    fn client_starting(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        match &mut state.phase {
            Phase::Normal => {
                state.phase = Phase::InClient {
                    depth: 1,
                    pending: None,
                };
                true
            }
            Phase::InClient { depth, .. } => {
                *depth += 1;
                true
            }
            Phase::Completed => false,
        }
    }

    /// Bracket exit from a user callback. Fires a parked cancellation when
    /// the last concurrent callback returns.
    fn client_stopped(&self) {
        let mut state = self.state.lock().unwrap();
        let Phase::InClient { depth, pending } = &mut state.phase else {
            return;
        };
        *depth -= 1;
        if *depth > 0 {
            return;
        }
        match pending.take() {
            None => state.phase = Phase::Normal,
            Some(err) => {
                let done = state.done.take();
                if let Some(timer) = state.timer.take() {
                    timer.abort();
                }
                state.phase = Phase::Completed;
                drop(state);

                if let Some(done) = done {
                    _ = done.send(Err(err));
                }
                _ = self.events.send(Event::Completed(self.id));
            }
        }
    }

    fn is_completed(&self) -> bool {
        matches!(self.state.lock().unwrap().phase, Phase::Completed)
    }

    fn importer(&self, importer_id: u32) -> Result<&ImportResolver, Error> {
        importer_id
            .checked_sub(BASE_IMPORTER_ID)
            .and_then(|index| self.importers.get(index as usize))
            .ok_or_else(|| Error::protocol(format!("importer id {importer_id} is out of range")))
    }

    async fn run_canonicalize(
        self: Arc<Self>,
        request: outbound_message::CanonicalizeRequest,
        importer: Arc<dyn Importer>,
        writer: Arc<Writer>,
    ) {
        use inbound_message::canonicalize_response;

        let context = ImporterContext {
            from_import: request.from_import,
            containing_url: request
                .containing_url
                .as_deref()
                .and_then(|u| Url::parse(u).ok()),
        };
        let result = importer.canonicalize(&request.url, &context).await;
        self.client_stopped();
        if self.is_completed() {
            return;
        }

        let result = match result {
            Ok(Some(url)) => Some(canonicalize_response::Result::Url(url.to_string())),
            Ok(None) => None,
            Err(err) => Some(canonicalize_response::Result::Error(format!("{err:#}"))),
        };
        self.respond(
            &writer,
            inbound_message::Message::CanonicalizeResponse(
                inbound_message::CanonicalizeResponse {
                    id: request.id,
                    containing_url_unused: false,
                    result,
                },
            ),
        )
        .await;
    }

    async fn run_import(
        self: Arc<Self>,
        request_id: u32,
        url: Url,
        importer: Arc<dyn Importer>,
        writer: Arc<Writer>,
    ) {
        use inbound_message::import_response;

        let result = importer.load(&url).await;
        self.client_stopped();
        if self.is_completed() {
            return;
        }

        let result = match result {
            Ok(Some(results)) => Some(import_response::Result::Success(
                import_response::ImportSuccess {
                    contents: results.contents,
                    syntax: convert::syntax_to_proto(results.syntax) as i32,
                    source_map_url: results.source_map_url.map(|u| u.to_string()),
                },
            )),
            Ok(None) => None,
            Err(err) => Some(import_response::Result::Error(format!("{err:#}"))),
        };
        self.respond(
            &writer,
            inbound_message::Message::ImportResponse(inbound_message::ImportResponse {
                id: request_id,
                result,
            }),
        )
        .await;
    }

    async fn run_file_import(
        self: Arc<Self>,
        request: outbound_message::FileImportRequest,
        importer: Arc<dyn FilesystemImporter>,
        writer: Arc<Writer>,
    ) {
        use inbound_message::file_import_response;

        let context = ImporterContext {
            from_import: request.from_import,
            containing_url: request
                .containing_url
                .as_deref()
                .and_then(|u| Url::parse(u).ok()),
        };
        let result = importer.resolve(&request.url, &context).await;
        self.client_stopped();
        if self.is_completed() {
            return;
        }

        let result = match result {
            Ok(Some(url)) if url.scheme() != "file" => {
                Some(file_import_response::Result::Error(format!(
                    "filesystem importer returned non-file URL '{url}'"
                )))
            }
            Ok(Some(url)) => Some(file_import_response::Result::FileUrl(url.to_string())),
            Ok(None) => None,
            Err(err) => Some(file_import_response::Result::Error(format!("{err:#}"))),
        };
        self.respond(
            &writer,
            inbound_message::Message::FileImportResponse(inbound_message::FileImportResponse {
                id: request.id,
                containing_url_unused: false,
                result,
            }),
        )
        .await;
    }

    async fn run_function_call(
        self: Arc<Self>,
        request_id: u32,
        function: SassFunction,
        arguments: Vec<Value>,
        observer: KeywordsObserver,
        writer: Arc<Writer>,
    ) {
        use inbound_message::function_call_response;

        let result = (function)(arguments).await;
        self.client_stopped();
        if self.is_completed() {
            return;
        }

        let result = match result {
            Ok(value) => function_call_response::Result::Success(convert::value_to_proto(&value)),
            Err(err) => function_call_response::Result::Error(format!("{err:#}")),
        };
        self.respond(
            &writer,
            inbound_message::Message::FunctionCallResponse(
                inbound_message::FunctionCallResponse {
                    id: request_id,
                    accessed_argument_lists: observer.accessed(),
                    result: Some(result),
                },
            ),
        )
        .await;
    }

    async fn respond(&self, writer: &Writer, message: inbound_message::Message) {
        let message = InboundMessage {
            message: Some(message),
        };
        if let Err(err) = writer.send(self.id, &message).await {
            _ = self.events.send(Event::Fault(Error::protocol(format!(
                "failed to write to compiler: {err}"
            ))));
        }
    }
}

struct VersionState {
    done: Option<oneshot::Sender<Result<Versions, Error>>>,
    timer: Option<tokio::task::AbortHandle>,
}

/// The one-off version query used as the post-spawn health check.
pub(crate) struct VersionRequest {
    id: u32,
    label: String,
    events: mpsc::UnboundedSender<Event>,
    state: Mutex<VersionState>,
}

impl VersionRequest {
    pub(crate) fn new(
        id: u32,
        done: oneshot::Sender<Result<Versions, Error>>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            label: format!("version-{id}"),
            events,
            state: Mutex::new(VersionState {
                done: Some(done),
                timer: None,
            }),
        })
    }

    pub(crate) fn start_timer(&self, timeout: Duration) {
        let id = self.id;
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            _ = events.send(Event::TimedOut(id));
        });
        self.state.lock().unwrap().timer = Some(handle.abort_handle());
    }

    pub(crate) fn receive(
        &self,
        response: outbound_message::VersionResponse,
    ) -> Result<Disposition, Error> {
        let versions = Versions {
            protocol_version: response.protocol_version,
            package_version: response.compiler_version,
            compiler_version: response.implementation_version,
            compiler_name: response.implementation_name,
        };
        if !self.complete(Ok(versions)) {
            return Err(Error::protocol("compiler sent a second version response"));
        }
        Ok(Disposition::Done)
    }

    fn complete(&self, result: Result<Versions, Error>) -> bool {
        let mut state = self.state.lock().unwrap();
        let Some(done) = state.done.take() else {
            return false;
        };
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        drop(state);
        _ = done.send(result);
        true
    }

    fn cancel(&self, err: Error) -> bool {
        // Version queries never run user callbacks, so cancellation always
        // completes immediately.
        self.complete(Err(err));
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proto_sass::embedded_protocol::outbound_message::{compile_response, CompileResponse};

    fn compilation() -> (
        Arc<CompilationRequest>,
        oneshot::Receiver<Result<CompilerResults, Error>>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        let (done, done_rx) = oneshot::channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let request = CompilationRequest::new(4001, vec![], HashMap::new(), done, events_tx);
        (request, done_rx, events_rx)
    }

    fn success_response() -> CompileResponse {
        CompileResponse {
            loaded_urls: vec![],
            result: Some(compile_response::Result::Success(
                compile_response::CompileSuccess {
                    css: "a{}".to_string(),
                    source_map: String::new(),
                },
            )),
        }
    }

    #[tokio::test]
    async fn completes_exactly_once_under_racing_cancellations() {
        let (request, done, _events) = compilation();

        assert_eq!(
            request.on_compile_response(success_response()).unwrap(),
            Disposition::Done,
        );
        // Late cancellations (e.g. a racing timer) are no-ops.
        assert!(!request.cancel(Error::protocol("too late")));
        assert!(!request.cancel(Error::protocol("still too late")));

        assert_eq!(done.await.unwrap().unwrap().css, "a{}");
    }

    #[tokio::test]
    async fn second_compile_response_is_a_protocol_error() {
        let (request, _done, _events) = compilation();

        request.on_compile_response(success_response()).unwrap();
        assert!(matches!(
            request.on_compile_response(success_response()),
            Err(Error::Protocol(_)),
        ));
    }

    #[tokio::test]
    async fn cancellation_parks_while_a_callback_runs() {
        let (request, done, mut events) = compilation();

        assert!(request.client_starting());
        assert!(request.client_starting());

        // Cancelled mid-callback: nothing completes yet.
        assert!(!request.cancel(Error::protocol("compiler died")));
        assert!(!request.is_completed());

        // The parked error fires when the last callback returns.
        request.client_stopped();
        assert!(!request.is_completed());
        request.client_stopped();
        assert!(request.is_completed());

        match done.await.unwrap() {
            Err(Error::Protocol(message)) => assert!(message.contains("compiler died")),
            other => panic!("expected the parked cancellation, got {other:?}"),
        }
        assert!(matches!(events.recv().await, Some(Event::Completed(4001))));
    }

    #[tokio::test]
    async fn callbacks_refuse_to_start_after_completion() {
        let (request, _done, _events) = compilation();

        request.on_compile_response(success_response()).unwrap();
        assert!(!request.client_starting());
    }

    #[tokio::test]
    async fn cancel_all_retains_requests_stuck_in_callbacks() {
        let (normal, _done_a, _events_a) = compilation();
        let (in_client, _done_b, _events_b) = compilation();
        assert!(in_client.client_starting());

        let mut registry = Registry::default();
        registry.insert(1, Request::Compilation(normal));
        registry.insert(2, Request::Compilation(in_client.clone()));

        registry.cancel_all(&Error::protocol("fault"));
        assert!(!registry.contains(1));
        assert!(registry.contains(2));

        // Its completion event arrives once the callback unwinds.
        in_client.client_stopped();
        assert!(in_client.is_completed());
    }
}
