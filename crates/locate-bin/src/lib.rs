use std::path::{Path, PathBuf};
use which::which;

/// Binary names tried, in order, when `DART_SASS_EMBEDDED_NAME` is unset.
/// `sass` is the standalone Dart Sass executable, which speaks the embedded
/// protocol since 1.63; `dart-sass-embedded` is the older dedicated
/// protocol binary.
const COMPILER_NAMES: &[&str] = &["sass", "dart-sass-embedded"];

/// Environment variable that overrides the compiler binary name.
pub const COMPILER_NAME_VAR: &str = "DART_SASS_EMBEDDED_NAME";

/// Locate the Dart Sass compiler binary.
///
/// Each candidate name is looked for as a bundled binary next to the
/// running executable first, and on the `$PATH` second. Setting
/// `DART_SASS_EMBEDDED_NAME` narrows the search to that one name.
pub fn locate_compiler() -> anyhow::Result<PathBuf> {
    let override_name = std::env::var(COMPILER_NAME_VAR).ok();
    let candidates: Vec<&str> = match &override_name {
        Some(name) => vec![name.as_str()],
        None => COMPILER_NAMES.to_vec(),
    };

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    for name in &candidates {
        if let Some(dir) = &exe_dir {
            let bundled = dir.join(name);
            if bundled.is_file() {
                let bundled = bundled.canonicalize().unwrap_or(bundled);
                tracing::debug!(executable = %bundled.display(), "using bundled compiler");
                return Ok(bundled);
            }
        }
        if let Ok(found) = which(name) {
            tracing::debug!(executable = %found.display(), "found '{name}' on the $PATH");
            return Ok(found);
        }
    }

    Err(match override_name {
        Some(name) => anyhow::anyhow!(
            "failed to locate '{name}' ({COMPILER_NAME_VAR}) alongside this program or on the $PATH"
        ),
        None => anyhow::anyhow!(
            "failed to locate a Sass compiler (tried {}); install Dart Sass or set {COMPILER_NAME_VAR}",
            COMPILER_NAMES.join(", "),
        ),
    })
}
