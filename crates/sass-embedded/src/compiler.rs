use crate::child::Child;
use crate::error::Error;
use crate::function::{self, SassFunction};
use crate::importer::ImportResolver;
use crate::options::{CompileOptions, MessageStyle, Settings, SourceMapStyle, WarningLevel};
use crate::request::BASE_IMPORTER_ID;
use crate::supervisor::{Command, Launcher, State, Supervisor};
use crate::{CompilerResults, Versions};
use indexmap::IndexMap;
use proto_sass::embedded_protocol::inbound_message::{compile_request, CompileRequest};
use proto_sass::embedded_protocol::OutputStyle as ProtoOutputStyle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// An embedded Sass compiler.
///
/// Each instance supervises one long-lived Dart Sass child process and
/// multiplexes any number of concurrent compilations over it. The process
/// is started at construction, health-checked, and restarted transparently
/// whenever the protocol breaks underneath us.
///
/// ```no_run
/// # async fn example() -> Result<(), sass_embedded::Error> {
/// use sass_embedded::{CompileOptions, Compiler, Settings};
///
/// let compiler = Compiler::new(Settings::default())?;
/// let results = compiler
///     .compile_string("a { b: 1 + 2 }", CompileOptions::new())
///     .await?;
/// assert!(results.css.contains("b: 3"));
/// compiler.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct Compiler {
    commands: mpsc::Sender<Command>,
    settings: Arc<Settings>,
    start_count: Arc<AtomicU64>,
}

impl Compiler {
    /// Start a supervisor for the compiler named by `settings`, or for the
    /// binary discovered alongside this program / on the `$PATH`.
    ///
    /// Discovery failure surfaces here; a binary that exists but won't run
    /// surfaces as a `Lifecycle` error from the first compile instead.
    pub fn new(settings: Settings) -> Result<Self, Error> {
        let program = match &settings.program {
            Some(program) => program.clone(),
            None => locate_bin::locate_compiler()
                .map_err(|err| Error::Lifecycle(format!("{err:#}")))?,
        };

        // The standalone `sass` binary needs to be told to speak the
        // embedded protocol; the dedicated binary already does.
        let args: Vec<String> = if program
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy().starts_with("dart-sass-embedded"))
        {
            vec![]
        } else {
            vec!["--embedded".to_string()]
        };

        let launcher: Launcher = Arc::new(move || Child::spawn(&program, &args));
        Ok(Self::with_launcher(Arc::new(settings), launcher))
    }

    /// A supervisor whose children come from `launcher` rather than a
    /// discovered binary.
    pub(crate) fn with_launcher(settings: Arc<Settings>, launcher: Launcher) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(16);
        let (state_tx, _state_rx) = watch::channel(State::Initializing);
        let start_count = Arc::new(AtomicU64::new(0));

        let (supervisor, events_rx) = Supervisor::new(
            settings.clone(),
            launcher,
            state_tx,
            start_count.clone(),
        );
        tokio::spawn(supervisor.run(commands_rx, events_rx));

        Self {
            commands: commands_tx,
            settings,
            start_count,
        }
    }

    /// Compile the stylesheet at `path`.
    pub async fn compile_file(
        &self,
        path: impl AsRef<Path>,
        options: CompileOptions,
    ) -> Result<CompilerResults, Error> {
        let input = compile_request::Input::Path(path.as_ref().to_string_lossy().into_owned());
        self.compile(input, options).await
    }

    /// Compile a stylesheet from source text.
    pub async fn compile_string(
        &self,
        source: impl Into<String>,
        options: CompileOptions,
    ) -> Result<CompilerResults, Error> {
        let input = compile_request::Input::String(compile_request::StringInput {
            source: source.into(),
            url: options.url.as_ref().map(|u| u.to_string()).unwrap_or_default(),
            syntax: crate::convert::syntax_to_proto(options.syntax) as i32,
            importer: None, // patched in build_compile_request once IDs are assigned
        });
        self.compile(input, options).await
    }

    async fn compile(
        &self,
        input: compile_request::Input,
        options: CompileOptions,
    ) -> Result<CompilerResults, Error> {
        let (request, importers, functions) =
            build_compile_request(&self.settings, options, input)?;
        let (reply, receiver) = oneshot::channel();
        self.commands
            .send(Command::Compile {
                request,
                importers,
                functions,
                reply,
            })
            .await
            .map_err(|_| Error::shut_down())?;
        receiver.await.map_err(|_| Error::shut_down())?
    }

    /// The versions the compiler reported during its health check.
    pub async fn versions(&self) -> Result<Versions, Error> {
        let (reply, receiver) = oneshot::channel();
        self.commands
            .send(Command::Versions { reply })
            .await
            .map_err(|_| Error::shut_down())?;
        receiver.await.map_err(|_| Error::shut_down())?
    }

    /// The child process ID, when a child is currently alive.
    pub async fn process_id(&self) -> Option<u32> {
        let (reply, receiver) = oneshot::channel();
        if self
            .commands
            .send(Command::ProcessId { reply })
            .await
            .is_err()
        {
            return None;
        }
        receiver.await.unwrap_or(None)
    }

    /// Tear down the current child (failing any active compilations) and
    /// wait for a fresh one to come up healthy.
    pub async fn reinit(&self) -> Result<(), Error> {
        let (reply, receiver) = oneshot::channel();
        self.commands
            .send(Command::Reinit { reply })
            .await
            .map_err(|_| Error::shut_down())?;
        receiver.await.map_err(|_| Error::shut_down())?
    }

    /// Graceful shutdown: drain active compilations' cancellations, stop
    /// the child, and retire the supervisor. Idempotent.
    pub async fn shutdown(&self) {
        let (reply, receiver) = oneshot::channel();
        if self
            .commands
            .send(Command::Shutdown { reply })
            .await
            .is_err()
        {
            // The supervisor is already gone.
            return;
        }
        _ = receiver.await;
    }

    /// How many times a child process has been spawned. Grows on every
    /// fault-triggered restart.
    pub(crate) fn start_count(&self) -> u64 {
        self.start_count.load(Ordering::Relaxed)
    }
}

/// Assemble the wire request plus the callback configuration that must live
/// host-side for the compilation's lifetime: the effective importer list
/// (addressed from [`BASE_IMPORTER_ID`] in order) and the by-name function
/// table.
fn build_compile_request(
    settings: &Settings,
    options: CompileOptions,
    mut input: compile_request::Input,
) -> Result<(CompileRequest, Vec<ImportResolver>, HashMap<String, SassFunction>), Error> {
    // [string importer?] ++ global importers ++ per-compile importers.
    let mut importers = Vec::new();
    if let Some(resolver) = &options.input_importer {
        importers.push(resolver.clone());
    }
    importers.extend(settings.importers.iter().cloned());
    importers.extend(options.importers.iter().cloned());

    let mut wire_importers = Vec::new();
    for (index, resolver) in importers.iter().enumerate() {
        let id = BASE_IMPORTER_ID + index as u32;
        if index == 0 && options.input_importer.is_some() {
            // The string input's own importer is addressed through the
            // StringInput, not the global chain.
            if let compile_request::Input::String(string_input) = &mut input {
                string_input.importer = Some(importer_to_proto(resolver, id));
            }
            continue;
        }
        wire_importers.push(importer_to_proto(resolver, id));
    }

    // Later registrations win per name (per-compilation over global), and
    // the compiler must see exactly one signature for each name the host
    // will answer for.
    let mut by_name: IndexMap<String, (String, SassFunction)> = IndexMap::new();
    for (signature, function) in settings.functions.iter().chain(options.functions.iter()) {
        let name = function::signature_name(signature)?;
        by_name.insert(name.to_string(), (signature.clone(), function.clone()));
    }
    let global_functions = by_name
        .values()
        .map(|(signature, _)| signature.clone())
        .collect();
    let functions: HashMap<String, SassFunction> = by_name
        .into_iter()
        .map(|(name, (_, function))| (name, function))
        .collect();

    let request = CompileRequest {
        style: match options.style {
            crate::OutputStyle::Expanded => ProtoOutputStyle::Expanded as i32,
            crate::OutputStyle::Compressed => ProtoOutputStyle::Compressed as i32,
        },
        source_map: options.source_map != SourceMapStyle::None,
        importers: wire_importers,
        global_functions,
        alert_color: settings.message_style == MessageStyle::Terminal,
        alert_ascii: false,
        verbose: settings.warning_level == WarningLevel::All,
        quiet_deps: settings.warning_level == WarningLevel::QuietDeps,
        source_map_include_sources: options.source_map == SourceMapStyle::EmbeddedSources,
        charset: true,
        silent: settings.warning_level == WarningLevel::Silent,
        fatal_deprecation: settings.fatal_deprecations.clone(),
        silence_deprecation: settings.silenced_deprecations.clone(),
        future_deprecation: settings.future_deprecations.clone(),
        input: Some(input),
    };
    Ok((request, importers, functions))
}

fn importer_to_proto(resolver: &ImportResolver, id: u32) -> compile_request::Importer {
    use compile_request::importer::Importer as P;

    let importer = match resolver {
        ImportResolver::LoadPath(path) => P::Path(path.to_string_lossy().into_owned()),
        ImportResolver::Importer(_) => P::ImporterId(id),
        ImportResolver::FilesystemImporter(_) => P::FileImporterId(id),
        ImportResolver::NodePackageImporter(path) => {
            P::NodePackageImporter(compile_request::NodePackageImporter {
                entry_point_directory: path.to_string_lossy().into_owned(),
            })
        }
    };
    compile_request::Importer {
        non_canonical_scheme: vec![],
        importer: Some(importer),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::function::function;
    use crate::value::Value;

    #[tokio::test]
    async fn duplicate_function_names_keep_only_the_later_registration() {
        let settings = Settings::default()
            .function("greet($a)", function(|_| async { Ok(Value::NULL) }));
        let options = CompileOptions::new()
            .function("greet($a, $b: 1)", function(|_| async { Ok(Value::TRUE) }));

        let (request, _importers, functions) = build_compile_request(
            &settings,
            options,
            compile_request::Input::Path("in.scss".to_string()),
        )
        .unwrap();

        // One signature on the wire, and the callback table answers with
        // the per-compilation function.
        assert_eq!(request.global_functions, vec!["greet($a, $b: 1)".to_string()]);
        assert_eq!(functions.len(), 1);
        let greet = functions.get("greet").unwrap();
        assert_eq!((greet)(vec![]).await.unwrap(), Value::TRUE);
    }

    #[test]
    fn malformed_signatures_are_lifecycle_errors() {
        let options = CompileOptions::new()
            .function("no-parens", function(|_| async { Ok(Value::NULL) }));

        let result = build_compile_request(
            &Settings::default(),
            options,
            compile_request::Input::Path("in.scss".to_string()),
        );
        assert!(matches!(result, Err(Error::Lifecycle(_))));
    }
}
