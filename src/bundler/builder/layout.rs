//! Directory layout under the output root.

use std::path::{Path, PathBuf};

const BUILD_DIR: &str = "build";
const LIB_DIR: &str = "lib";
const APP_DIR: &str = "app";
const TOMCAT_DIR: &str = "tomcat";

/// `<root>/build` holds staged inputs and the project file, `<root>/app` the packaged
/// application image. Final archives and installers land directly in `<root>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.build_dir().join(LIB_DIR)
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root.join(APP_DIR)
    }

    /// Staged copy of the Tomcat installation.
    pub fn tomcat_dir(&self) -> PathBuf {
        self.build_dir().join(TOMCAT_DIR)
    }

    pub fn project_file(&self, output_name: &str) -> PathBuf {
        self.build_dir().join(format!("{output_name}.prj"))
    }

    /// Path of a staged dependency relative to the build directory.
    pub fn relative_lib_path(file_name: &str) -> PathBuf {
        Path::new(LIB_DIR).join(file_name)
    }

    /// Tomcat directory relative to the build directory, as passed to `-appdir=`.
    pub fn relative_tomcat_dir() -> &'static str {
        TOMCAT_DIR
    }
}
