use crate::function::SassFunction;
use crate::importer::ImportResolver;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// The syntax of an input stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// The CSS-superset `.scss` syntax.
    #[default]
    Scss,
    /// The whitespace-sensitive indented syntax.
    Indented,
    /// Plain CSS.
    Css,
}

/// How to format compiled CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

/// Whether and how to generate a source map for a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapStyle {
    /// No source map.
    #[default]
    None,
    /// A source map that references sources by URL.
    SeparateSources,
    /// A source map with the source text embedded in it.
    EmbeddedSources,
}

/// How the compiler should format the human-readable `formatted` renderings
/// of errors and log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStyle {
    #[default]
    Plain,
    /// With terminal colors.
    Terminal,
}

/// How chatty the compiler should be about warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningLevel {
    /// The compiler's defaults: repeated deprecation warnings are
    /// summarized after the first few.
    #[default]
    Default,
    /// Every warning, every time.
    All,
    /// Suppress warnings from dependencies (anything loaded through a load
    /// path or importer).
    QuietDeps,
    /// No log events at all.
    Silent,
}

/// Compiler-wide configuration, fixed at [`crate::Compiler`] construction.
pub struct Settings {
    pub(crate) program: Option<PathBuf>,
    pub(crate) timeout_seconds: i64,
    pub(crate) message_style: MessageStyle,
    pub(crate) warning_level: WarningLevel,
    pub(crate) fatal_deprecations: Vec<String>,
    pub(crate) silenced_deprecations: Vec<String>,
    pub(crate) future_deprecations: Vec<String>,
    pub(crate) importers: Vec<ImportResolver>,
    pub(crate) functions: Vec<(String, SassFunction)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program: None,
            timeout_seconds: 60,
            message_style: MessageStyle::default(),
            warning_level: WarningLevel::default(),
            fatal_deprecations: Vec::new(),
            silenced_deprecations: Vec::new(),
            future_deprecations: Vec::new(),
            importers: Vec::new(),
            functions: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this compiler binary instead of discovering one.
    pub fn program(mut self, path: impl Into<PathBuf>) -> Self {
        self.program = Some(path.into());
        self
    }

    /// Seconds a compilation (or health check) may take before the
    /// supervisor declares the compiler hung and restarts it. Negative
    /// disables the timeout.
    pub fn timeout(mut self, seconds: i64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn message_style(mut self, style: MessageStyle) -> Self {
        self.message_style = style;
        self
    }

    pub fn warning_level(mut self, level: WarningLevel) -> Self {
        self.warning_level = level;
        self
    }

    /// Treat this deprecation as a compilation error.
    pub fn fatal_deprecation(mut self, id: impl Into<String>) -> Self {
        self.fatal_deprecations.push(id.into());
        self
    }

    /// Silence warnings for this deprecation.
    pub fn silenced_deprecation(mut self, id: impl Into<String>) -> Self {
        self.silenced_deprecations.push(id.into());
        self
    }

    /// Opt into this future deprecation early.
    pub fn future_deprecation(mut self, id: impl Into<String>) -> Self {
        self.future_deprecations.push(id.into());
        self
    }

    /// Append a global importer, consulted for every compilation ahead of
    /// any per-compilation importers.
    pub fn importer(mut self, resolver: ImportResolver) -> Self {
        self.importers.push(resolver);
        self
    }

    /// Register a global function under `signature`, e.g. `"my-fn($x)"`.
    pub fn function(mut self, signature: impl Into<String>, function: SassFunction) -> Self {
        self.functions.push((signature.into(), function));
        self
    }

    pub(crate) fn effective_timeout(&self) -> Option<Duration> {
        (self.timeout_seconds >= 0).then(|| Duration::from_secs(self.timeout_seconds as u64))
    }
}

/// Per-compilation options for [`crate::Compiler::compile_string`] and
/// [`crate::Compiler::compile_file`].
#[derive(Default)]
pub struct CompileOptions {
    pub(crate) style: OutputStyle,
    pub(crate) source_map: SourceMapStyle,
    pub(crate) syntax: Syntax,
    pub(crate) url: Option<Url>,
    pub(crate) input_importer: Option<ImportResolver>,
    pub(crate) importers: Vec<ImportResolver>,
    pub(crate) functions: Vec<(String, SassFunction)>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn source_map(mut self, style: SourceMapStyle) -> Self {
        self.source_map = style;
        self
    }

    /// The syntax of the string input. Ignored for file compilations.
    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// The nominal URL of the string input. Ignored for file compilations.
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// The importer that loads URLs relative to the string input. Ignored
    /// for file compilations.
    pub fn input_importer(mut self, resolver: ImportResolver) -> Self {
        self.input_importer = Some(resolver);
        self
    }

    /// Append an importer consulted for this compilation only, after the
    /// compiler-wide importers.
    pub fn importer(mut self, resolver: ImportResolver) -> Self {
        self.importers.push(resolver);
        self
    }

    /// Register a function for this compilation only.
    pub fn function(mut self, signature: impl Into<String>, function: SassFunction) -> Self {
        self.functions.push((signature.into(), function));
        self
    }
}
