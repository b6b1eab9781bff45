//! Runtime, trial and Tomcat settings.

use serde::Deserialize;
use std::path::PathBuf;

/// JET runtime flavor selected with `-jetrt=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeFlavor {
    Desktop,
    Server,
    Classic,
}

impl RuntimeFlavor {
    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeFlavor::Desktop => "desktop",
            RuntimeFlavor::Server => "server",
            RuntimeFlavor::Classic => "classic",
        }
    }
}

/// Java SE compact profile the application fits into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompactProfile {
    /// Let the compiler pick.
    #[default]
    Auto,
    Compact1,
    Compact2,
    Compact3,
    Full,
}

impl CompactProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            CompactProfile::Auto => "auto",
            CompactProfile::Compact1 => "compact1",
            CompactProfile::Compact2 => "compact2",
            CompactProfile::Compact3 => "compact3",
            CompactProfile::Full => "full",
        }
    }
}

/// Disk footprint reduction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiskFootprintReduction {
    None,
    Medium,
    HighMemory,
    HighDisk,
}

impl DiskFootprintReduction {
    pub fn as_str(self) -> &'static str {
        match self {
            DiskFootprintReduction::None => "none",
            DiskFootprintReduction::Medium => "medium",
            DiskFootprintReduction::HighMemory => "high-memory",
            DiskFootprintReduction::HighDisk => "high-disk",
        }
    }
}

/// Java Runtime Slim-Down: detach rarely used runtime components into a package
/// downloaded on demand.
///
/// Maps to the `[runtime.slim_down]` table. Enabling it implies the Global Optimizer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlimDownSettings {
    /// Components to detach, e.g. `["corba", "jdbc"]`.
    ///
    /// Default: empty, meaning `auto`
    pub detach_components: Vec<String>,

    /// URL the detached package is downloaded from. Mandatory.
    pub detached_base_url: Option<String>,

    /// File name of the detached package.
    ///
    /// Default: `<final_name>.pkl`
    pub detached_package: Option<String>,
}

/// JET runtime options.
///
/// Maps to the `[runtime]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeSettings {
    /// Runtime flavor.
    ///
    /// Default: None (compiler default)
    pub flavor: Option<RuntimeFlavor>,

    /// Location of the runtime files inside the package (11.3+).
    pub location: Option<String>,

    /// Compact profile (11.3+).
    ///
    /// Default: `auto`
    pub profile: CompactProfile,

    /// Optional runtime components added to the package (`-add-opt-rt-files`).
    pub components: Vec<String>,

    /// Disk footprint reduction mode.
    pub disk_footprint_reduction: Option<DiskFootprintReduction>,

    /// Slim-down configuration; absent means disabled.
    pub slim_down: Option<SlimDownSettings>,
}

/// Trial version configuration.
///
/// Maps to the `[trial_version]` table. Exactly one of `expire_in_days` and
/// `expire_date` must be set, and `expire_message` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrialVersionSettings {
    /// Days from the build date until the executable expires.
    pub expire_in_days: Option<u32>,

    /// Fixed expiration date in `ddMMMyyyy` form, e.g. `15Sep2025`.
    pub expire_date: Option<String>,

    /// Message shown once the trial has expired.
    pub expire_message: Option<String>,
}

/// Tomcat web application configuration.
///
/// Maps to the `[tomcat]` table; used when `build.app_type = "tomcat"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomcatSettings {
    /// Tomcat installation to bundle.
    ///
    /// Default: the `tomcat.home` property, `TOMCAT_HOME`, then `CATALINA_HOME`
    pub tomcat_home: Option<PathBuf>,

    /// Name the war is deployed under in `webapps/`; `.war` is appended if missing.
    ///
    /// Default: the main jar file name
    pub war_deploy_name: Option<String>,
}
