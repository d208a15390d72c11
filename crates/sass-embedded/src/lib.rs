//! An embedded-protocol host for Dart Sass.
//!
//! The compiler runs as a long-lived child process speaking the Sass
//! Embedded Protocol: varint-framed protobuf messages multiplexed over the
//! child's stdio, with callbacks (importers and custom functions) flowing
//! back to host code mid-compilation. This crate supervises that process:
//! it health-checks new children, correlates concurrent compilations by ID,
//! applies per-request timeouts, and tears down and restarts the child
//! whenever the protocol is violated underneath us.
//!
//! Most callers only need [`Compiler`], [`Settings`], and
//! [`CompileOptions`]; importer and function callbacks are configured
//! through [`ImportResolver`] and [`SassFunction`].

mod child;
mod codec;
mod compiler;
mod convert;
mod error;
mod function;
mod importer;
mod options;
mod request;
mod supervisor;
mod value;

pub use compiler::Compiler;
pub use error::{CompilerError, Error};
pub use function::{function, SassDynamicFunction, SassFunction};
pub use importer::{
    FilesystemImporter, ImportResolver, Importer, ImporterContext, ImporterResults,
};
pub use options::{
    CompileOptions, MessageStyle, OutputStyle, Settings, SourceMapStyle, Syntax, WarningLevel,
};
pub use value::{
    CalculationOperation, CalculationOperator, CalculationValue, ColorFormat, CompilerFunction,
    ListSeparator, SassArgumentList, SassCalculation, SassColor, SassList, SassMap, SassNumber,
    SassString, Value,
};

use url::Url;

/// Everything a successful compilation produced.
#[derive(Debug, Clone)]
pub struct CompilerResults {
    /// The compiled CSS.
    pub css: String,
    /// The JSON source map, when one was requested via
    /// [`SourceMapStyle`].
    pub source_map: Option<String>,
    /// Warnings and `@debug` output, in emission order.
    pub messages: Vec<CompilerMessage>,
    /// The canonical URLs of every stylesheet loaded during the
    /// compilation, in load order.
    pub loaded_urls: Vec<Url>,
}

/// A diagnostic emitted by the compiler during a compilation.
#[derive(Debug, Clone)]
pub struct CompilerMessage {
    pub kind: MessageKind,
    /// The message text.
    pub message: String,
    /// The source span the message points at, if any.
    pub span: Option<Span>,
    /// The Sass stack trace at the point of the message.
    pub stack_trace: Option<String>,
    /// The deprecation ID, for [`MessageKind::Deprecation`] messages.
    pub deprecation_type: Option<String>,
    /// The compiler's human-readable rendering, including the span.
    pub formatted: String,
}

/// What sort of diagnostic a [`CompilerMessage`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A `@warn` or compiler-generated warning.
    Warning,
    /// A deprecated-feature warning.
    Deprecation,
    /// `@debug` output.
    Debug,
}

/// A chunk of a source file.
#[derive(Debug, Clone)]
pub struct Span {
    /// The text covered by the span.
    pub text: String,
    pub start: Location,
    /// The first location after the span, or `None` for a point span.
    pub end: Option<Location>,
    /// The URL of the file the span refers to.
    pub url: Option<Url>,
    /// Additional surrounding text.
    pub context: Option<String>,
}

/// A point in a source file. All fields are 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

/// Version information reported by the compiler's health check.
#[derive(Debug, Clone)]
pub struct Versions {
    /// The embedded protocol version, in semver form.
    pub protocol_version: String,
    /// The version of the compiler package.
    pub package_version: String,
    /// The version of the Sass implementation.
    pub compiler_version: String,
    /// The name of the Sass implementation, e.g. `dart-sass`.
    pub compiler_name: String,
}
