use crate::{CompilerMessage, Span};
use url::Url;

/// The error type of the embedded host.
///
/// The three variants match the three distinct ways this library can fail:
/// the protocol or transport broke (the supervisor tears down and restarts
/// the compiler, failing every active compilation), the stylesheet didn't
/// compile (local to one compilation), or the caller misused the API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The compiler, or the transport underneath it, violated the embedded
    /// protocol: a malformed frame, an unknown request ID, a missing
    /// required field, or a timeout. All compilations that were active when
    /// the fault occurred fail with this error, and the compiler process is
    /// restarted.
    #[error("sass protocol error: {0}")]
    Protocol(String),
    /// The Sass compilation itself failed. Other compilations running on
    /// the same compiler are unaffected.
    #[error("sass compilation failed: {}", .0.message)]
    Compiler(Box<CompilerError>),
    /// The host API was misused: compiling after shutdown, a malformed
    /// function signature, or an unavailable compiler binary.
    #[error("{0}")]
    Lifecycle(String),
}

impl Error {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    pub(crate) fn timeout(label: &str, seconds: i64) -> Self {
        Self::Protocol(format!("Timeout: {label} did not complete in {seconds}s"))
    }

    pub(crate) fn shut_down() -> Self {
        Self::Lifecycle("the compiler has been shut down".to_string())
    }
}

/// A failed compilation, as reported by the compiler.
#[derive(Debug, Clone)]
pub struct CompilerError {
    /// The failure message.
    pub message: String,
    /// The source span the failure points at.
    pub span: Option<Span>,
    /// The Sass stack trace at the point of failure.
    pub stack_trace: Option<String>,
    /// The compiler's human-readable rendering of the whole failure,
    /// including the span and trace.
    pub formatted: String,
    /// Canonical URLs of everything loaded before the failure.
    pub loaded_urls: Vec<Url>,
    /// Diagnostics emitted before the failure.
    pub messages: Vec<CompilerMessage>,
}
