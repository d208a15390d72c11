use crate::options::Syntax;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Context the compiler attaches to a canonicalize or file-import request.
#[derive(Debug, Clone)]
pub struct ImporterContext {
    /// Whether the load comes from an `@import` rule, as opposed to
    /// `@use` or `@forward`.
    pub from_import: bool,
    /// The canonical URL of the stylesheet that contains the load, when it
    /// has one.
    pub containing_url: Option<Url>,
}

/// A stylesheet produced by [`Importer::load`].
#[derive(Debug, Clone)]
pub struct ImporterResults {
    /// The stylesheet's text.
    pub contents: String,
    /// The syntax `contents` is written in.
    pub syntax: Syntax,
    /// A URL to record for this stylesheet in the source map, if any.
    pub source_map_url: Option<Url>,
}

impl ImporterResults {
    pub fn new(contents: impl Into<String>, syntax: Syntax) -> Self {
        Self {
            contents: contents.into(),
            syntax,
            source_map_url: None,
        }
    }
}

/// A content-returning importer: resolves `@use`/`@forward`/`@import` URLs
/// to canonical URLs, and loads stylesheet text for them.
///
/// Both steps may suspend. Returning `Ok(None)` means "not mine"; the
/// compiler moves on to the next importer in the chain. Returned errors are
/// reported to the stylesheet, not treated as protocol faults.
#[async_trait::async_trait]
pub trait Importer: Send + Sync {
    /// Convert `url`, as written in the stylesheet, to its canonical form.
    async fn canonicalize(
        &self,
        url: &str,
        context: &ImporterContext,
    ) -> anyhow::Result<Option<Url>>;

    /// Load the stylesheet a previously-canonicalized URL points at.
    /// `Ok(None)` means the URL doesn't exist.
    async fn load(&self, canonical_url: &Url) -> anyhow::Result<Option<ImporterResults>>;
}

/// An importer that redirects loads onto the physical filesystem and lets
/// the compiler do the reading and Sass's own partial/index resolution.
#[async_trait::async_trait]
pub trait FilesystemImporter: Send + Sync {
    /// Resolve `url` to the `file:` URL the compiler should load, or
    /// `Ok(None)` if this importer doesn't recognize it.
    async fn resolve(&self, url: &str, context: &ImporterContext) -> anyhow::Result<Option<Url>>;
}

/// One entry in a compilation's import chain.
#[derive(Clone)]
pub enum ImportResolver {
    /// A directory for the compiler's built-in filesystem loading.
    LoadPath(PathBuf),
    /// A host importer that returns stylesheet contents.
    Importer(Arc<dyn Importer>),
    /// A host importer that redirects to the filesystem.
    FilesystemImporter(Arc<dyn FilesystemImporter>),
    /// The compiler's built-in `pkg:` importer, rooted at this directory.
    NodePackageImporter(PathBuf),
}

impl ImportResolver {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            ImportResolver::LoadPath(_) => "load path",
            ImportResolver::Importer(_) => "importer",
            ImportResolver::FilesystemImporter(_) => "filesystem importer",
            ImportResolver::NodePackageImporter(_) => "node package importer",
        }
    }
}

impl std::fmt::Debug for ImportResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportResolver::LoadPath(path) => f.debug_tuple("LoadPath").field(path).finish(),
            ImportResolver::Importer(_) => f.write_str("Importer(..)"),
            ImportResolver::FilesystemImporter(_) => f.write_str("FilesystemImporter(..)"),
            ImportResolver::NodePackageImporter(path) => {
                f.debug_tuple("NodePackageImporter").field(path).finish()
            }
        }
    }
}
