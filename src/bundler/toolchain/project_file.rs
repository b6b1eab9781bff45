//! Serialization of the compiler project file (`.prj`).
//!
//! ```text
//! <flag-line>*
//! (!classpathentry <path>
//!   -optimize=<all|autodetect>
//!   -protect=<all|nomatter>
//! !end)*
//! (!module <path>)*
//! ```
//!
//! Flags are positional in the compiler's grammar: later equations override earlier
//! ones. They are written verbatim in the order given, never sorted or deduplicated.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

/// One classpath entry of the compiled application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Path relative to the build directory.
    pub path: PathBuf,
    /// Library code is compiled conservatively; first-party code is fully optimized and
    /// protected.
    pub is_library: bool,
}

impl Dependency {
    pub fn new(path: impl Into<PathBuf>, is_library: bool) -> Self {
        Self {
            path: path.into(),
            is_library,
        }
    }

    fn optimize(&self) -> &'static str {
        if self.is_library { "autodetect" } else { "all" }
    }

    fn protect(&self) -> &'static str {
        if self.is_library { "nomatter" } else { "all" }
    }
}

/// Render the project file text.
///
/// A flag containing a line break cannot be represented and is rejected.
pub fn render(flags: &[String], dependencies: &[Dependency], modules: &[PathBuf]) -> Result<String> {
    let mut out = String::new();

    for flag in flags {
        if flag.contains(['\n', '\r']) {
            return Err(Error::Config(format!(
                "compiler option contains a line break: {flag:?}"
            )));
        }
        let _ = writeln!(out, "{flag}");
    }

    for dependency in dependencies {
        let _ = writeln!(out, "!classpathentry {}", dependency.path.display());
        let _ = writeln!(out, "  -optimize={}", dependency.optimize());
        let _ = writeln!(out, "  -protect={}", dependency.protect());
        out.push_str("!end\n");
    }

    for module in modules {
        let _ = writeln!(out, "!module {}", module.display());
    }

    Ok(out)
}

/// Write the project file, creating parent directories as needed.
pub async fn write(
    path: &Path,
    flags: &[String],
    dependencies: &[Dependency],
    modules: &[PathBuf],
) -> Result<()> {
    let text = render(flags, dependencies, modules)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating project file directory", parent)?;
    }
    tokio::fs::write(path, text)
        .await
        .fs_context("writing project file", path)?;
    log::debug!("Wrote project file {}", path.display());
    Ok(())
}
