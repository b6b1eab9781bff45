//! Compilation settings: the `[build]` table and `[[dependencies]]` entries.

use serde::Deserialize;
use std::path::PathBuf;

/// Final distributable format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Packaging {
    /// The assembled `app/` directory is the result.
    None,
    /// `<final_name>.zip` of the assembled directory.
    #[default]
    Zip,
    /// Self-extracting Excelsior Installer executable.
    #[serde(alias = "installer")]
    ExcelsiorInstaller,
    /// macOS `.app` bundle, optionally signed and wrapped in a `.pkg`.
    #[serde(alias = "app-bundle")]
    OsxAppBundle,
    /// App bundle on macOS, Excelsior Installer elsewhere.
    NativeBundle,
}

impl Packaging {
    /// Replace `native-bundle` with the concrete format for the host.
    pub fn resolve_native(self, is_macos: bool) -> Packaging {
        match self {
            Packaging::NativeBundle if is_macos => Packaging::OsxAppBundle,
            Packaging::NativeBundle => Packaging::ExcelsiorInstaller,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Packaging::None => "none",
            Packaging::Zip => "zip",
            Packaging::ExcelsiorInstaller => "excelsior-installer",
            Packaging::OsxAppBundle => "osx-app-bundle",
            Packaging::NativeBundle => "native-bundle",
        }
    }
}

impl std::fmt::Display for Packaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Packaging {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Packaging::None),
            "zip" => Ok(Packaging::Zip),
            "excelsior-installer" | "installer" => Ok(Packaging::ExcelsiorInstaller),
            "osx-app-bundle" | "app-bundle" => Ok(Packaging::OsxAppBundle),
            "native-bundle" => Ok(Packaging::NativeBundle),
            other => Err(format!("unknown packaging `{other}`")),
        }
    }
}

/// Kind of application being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    /// Plain Java SE application started from a main class.
    #[default]
    Plain,
    /// Web application deployed into a bundled Tomcat.
    Tomcat,
}

/// How much stack trace information the executable keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackTraceSupport {
    /// Class and method names only.
    #[default]
    Minimal,
    /// Full stack traces with line numbers.
    Full,
    /// No stack trace support.
    None,
}

/// Inlining aggressiveness preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InlineExpansion {
    #[default]
    Aggressive,
    VeryAggressive,
    Medium,
    Low,
    TinyMethodsOnly,
}

impl InlineExpansion {
    /// `(inlinelimit, inlinetolimit)` for non-default presets.
    pub fn limits(self) -> Option<(u32, u32)> {
        match self {
            InlineExpansion::Aggressive => None,
            InlineExpansion::VeryAggressive => Some((250, 4000)),
            InlineExpansion::Medium => Some((100, 1000)),
            InlineExpansion::Low => Some((50, 500)),
            InlineExpansion::TinyMethodsOnly => Some((0, 0)),
        }
    }
}

/// Compilation settings.
///
/// Maps to the `[build]` table. Relative paths are resolved against the directory
/// holding the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// The application jar (or war for Tomcat applications). Required.
    pub main_jar: PathBuf,

    /// Fully qualified main class. Required for plain applications.
    pub main_class: Option<String>,

    /// Application type.
    ///
    /// Default: `plain`
    pub app_type: AppType,

    /// Excelsior JET installation directory.
    ///
    /// Default: None (the `jet.home` property, `JET_HOME`, then `PATH`)
    pub jet_home: Option<String>,

    /// Root of all generated files (`build/`, `app/`, archives).
    ///
    /// Default: `target/jet`
    pub output_dir: PathBuf,

    /// Executable name without suffix.
    ///
    /// Default: the simple name of the main class, or the war stem for Tomcat
    pub output_name: Option<String>,

    /// Distributable format.
    ///
    /// Default: `zip`
    pub packaging: Packaging,

    /// (Windows) `.ico` file embedded into the executable.
    pub icon: Option<PathBuf>,

    /// (Windows) Build a GUI executable without a console window.
    pub hide_console: bool,

    /// Extra files copied verbatim into the package.
    ///
    /// Default: `jetresources/packagefiles` when that directory exists
    pub package_files_dir: Option<PathBuf>,

    /// JVM arguments baked into the executable. `$(Root)` refers to the
    /// application directory at run time.
    pub jvm_args: Vec<String>,

    /// Extra compiler options appended after all generated ones.
    pub compiler_options: Vec<String>,

    /// Directory holding `<name>.startup` and `<name>.usg` execution profiles.
    ///
    /// Default: `jetresources`
    pub exec_profiles_dir: Option<PathBuf>,

    /// Base name of the execution profiles.
    ///
    /// Default: the artifact id
    pub exec_profiles_name: Option<String>,

    /// (32-bit only) Compile the application together with the used platform
    /// classes. Needs the usage profile recorded by `test-run`.
    pub global_optimizer: bool,

    /// Allow the executable to run several applications via a `-Xmain`-style switch.
    pub multi_app: bool,

    /// Record a startup profile during the first runs of the executable.
    ///
    /// Default: true
    pub profile_startup: bool,

    /// Startup profiling duration in seconds.
    ///
    /// Default: 20
    pub profile_startup_timeout: u32,

    /// Default: `minimal`
    pub stack_trace_support: StackTraceSupport,

    /// Default: `aggressive`
    pub inline_expansion: InlineExpansion,

    /// Encrypt string literals and reflection data in the executable.
    pub protect_data: bool,

    /// Seed for data protection.
    ///
    /// Default: derived from the project coordinates
    pub crypt_seed: Option<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            main_jar: PathBuf::new(),
            main_class: None,
            app_type: AppType::default(),
            jet_home: None,
            output_dir: PathBuf::from("target/jet"),
            output_name: None,
            packaging: Packaging::default(),
            icon: None,
            hide_console: false,
            package_files_dir: None,
            jvm_args: Vec::new(),
            compiler_options: Vec::new(),
            exec_profiles_dir: None,
            exec_profiles_name: None,
            global_optimizer: false,
            multi_app: false,
            profile_startup: true,
            profile_startup_timeout: 20,
            stack_trace_support: StackTraceSupport::default(),
            inline_expansion: InlineExpansion::default(),
            protect_data: false,
            crypt_seed: None,
        }
    }
}

/// One resolved project dependency (`[[dependencies]]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySettings {
    /// Path of the jar.
    pub path: PathBuf,

    /// Group of the artifact; a group other than the project's marks a library.
    #[serde(default)]
    pub group_id: Option<String>,

    /// Explicit library flag, overrides the group comparison.
    #[serde(default)]
    pub is_library: Option<bool>,
}

impl DependencySettings {
    /// Library code is compiled with `autodetect`/`nomatter` policy.
    pub fn is_library(&self, project_group: &str) -> bool {
        self.is_library.unwrap_or_else(|| match &self.group_id {
            Some(group) => group != project_group,
            None => true,
        })
    }
}
