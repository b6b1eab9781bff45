//! Core Settings struct and implementations.

use super::{
    AppBundleSettings, BuildSettings, DependencySettings, InstallerSettings, PackageSettings,
    RuntimeSettings, TomcatSettings, TrialVersionSettings, WindowsVersionInfo,
};
use crate::bundler::error::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Configuration format understood by this release.
pub const CONFIG_VERSION: u32 = 1;

/// File name looked up when no configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "jet-bundler.toml";

/// Format of `trial_version.expire_date`, e.g. `15Sep2025`.
pub const EXPIRE_DATE_FORMAT: &str = "%d%b%Y";

const DEFAULT_RESOURCES_DIR: &str = "jetresources";
const DEFAULT_PACKAGE_FILES_DIR: &str = "jetresources/packagefiles";
const DEFAULT_EULA: &str = "eula.txt";
const DEFAULT_UNICODE_EULA: &str = "unicodeEula.txt";
const DEFAULT_INSTALLER_SPLASH: &str = "installerSplash.bmp";
const DEFAULT_WINDOWS_ICON: &str = "icon.ico";
const DEFAULT_BUNDLE_ICON: &str = "icon.icns";

/// Main settings for a build.
///
/// One versioned struct holding every table of `jet-bundler.toml`, constructed via
/// [`SettingsBuilder`](super::SettingsBuilder) which migrates deprecated keys,
/// resolves relative paths and validates the result once.
///
/// # Examples
///
/// ```no_run
/// use jet_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> jet_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .config_file("jet-bundler.toml")
///     .build()?;
/// println!("packaging {}", settings.build.packaging);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Configuration format version.
    ///
    /// Default: the current version
    pub version: Option<u32>,

    /// Project coordinates and product metadata.
    pub project: PackageSettings,

    /// Compilation settings.
    pub build: BuildSettings,

    /// Resolved project dependencies, in classpath order.
    pub dependencies: Vec<DependencySettings>,

    /// Windows version-information resource.
    pub windows_version_info: WindowsVersionInfo,

    /// Excelsior Installer options.
    pub installer: InstallerSettings,

    /// macOS application bundle options.
    pub app_bundle: AppBundleSettings,

    /// Runtime options.
    pub runtime: RuntimeSettings,

    /// Trial version; absent means no expiration.
    pub trial_version: Option<TrialVersionSettings>,

    /// Tomcat options.
    pub tomcat: TomcatSettings,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,

    /// Deprecated keys found while loading.
    #[serde(skip)]
    deprecations: Vec<String>,
}

impl Settings {
    /// Directory holding the configuration file.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Deprecation notices collected while loading.
    pub fn deprecations(&self) -> &[String] {
        &self.deprecations
    }

    /// Root of all generated files.
    pub fn output_dir(&self) -> &Path {
        &self.build.output_dir
    }

    /// Directory holding the execution profiles.
    pub fn exec_profiles_dir(&self) -> PathBuf {
        self.build
            .exec_profiles_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_RESOURCES_DIR))
    }

    /// Base name of the execution profiles.
    pub fn exec_profiles_name(&self) -> &str {
        self.build
            .exec_profiles_name
            .as_deref()
            .unwrap_or(&self.project.artifact_id)
    }

    /// Startup profile written by a profiling run.
    pub fn startup_profile(&self) -> PathBuf {
        self.exec_profiles_dir()
            .join(format!("{}.startup", self.exec_profiles_name()))
    }

    /// Usage profile needed by the Global Optimizer.
    pub fn usage_profile(&self) -> PathBuf {
        self.exec_profiles_dir()
            .join(format!("{}.usg", self.exec_profiles_name()))
    }

    /// Extra package files directory, if configured or present at the default place.
    pub fn package_files_dir(&self) -> Option<PathBuf> {
        match &self.build.package_files_dir {
            Some(dir) => Some(dir.clone()),
            None => {
                let default = self.base_dir.join(DEFAULT_PACKAGE_FILES_DIR);
                default.is_dir().then_some(default)
            }
        }
    }

    /// Seed for data protection, derived from the project coordinates when not set.
    pub fn crypt_seed(&self) -> String {
        if let Some(seed) = &self.build.crypt_seed {
            return seed.clone();
        }
        let mut hasher = Sha256::new();
        hasher.update(self.project.group_id.as_bytes());
        hasher.update(b":");
        hasher.update(self.project.artifact_id.as_bytes());
        hasher.update(b":");
        hasher.update(self.project.version().as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..32].to_string()
    }

    /// `.app` directory name without the extension.
    pub fn bundle_file_name(&self) -> &str {
        self.app_bundle
            .file_name
            .as_deref()
            .unwrap_or_else(|| self.project.name())
    }

    pub fn bundle_name(&self) -> &str {
        self.app_bundle
            .bundle_name
            .as_deref()
            .unwrap_or_else(|| self.project.name())
    }

    pub fn bundle_identifier(&self) -> String {
        match &self.app_bundle.identifier {
            Some(id) => id.clone(),
            None if self.project.group_id.is_empty() => self.project.artifact_id.clone(),
            None => format!("{}.{}", self.project.group_id, self.project.artifact_id),
        }
    }

    pub fn bundle_short_version(&self) -> &str {
        self.app_bundle
            .short_version
            .as_deref()
            .unwrap_or_else(|| self.project.version())
    }

    pub fn bundle_version(&self) -> &str {
        self.app_bundle
            .version
            .as_deref()
            .unwrap_or_else(|| self.bundle_short_version())
    }

    pub(super) fn set_base_dir(&mut self, base_dir: PathBuf, deprecations: Vec<String>) {
        self.base_dir = base_dir;
        self.deprecations = deprecations;
    }

    /// Make every configured path absolute against the base directory.
    pub(super) fn resolve_paths(&mut self) {
        let base = self.base_dir.clone();
        let resolve = |path: &mut PathBuf| {
            if !path.as_os_str().is_empty() && path.is_relative() {
                *path = base.join(&*path);
            }
        };
        let resolve_opt = |path: &mut Option<PathBuf>| {
            if let Some(path) = path {
                resolve(path);
            }
        };

        resolve(&mut self.build.main_jar);
        resolve(&mut self.build.output_dir);
        resolve_opt(&mut self.build.icon);
        resolve_opt(&mut self.build.package_files_dir);
        resolve_opt(&mut self.build.exec_profiles_dir);
        resolve_opt(&mut self.installer.eula);
        resolve_opt(&mut self.installer.splash);
        resolve_opt(&mut self.app_bundle.icon);
        resolve_opt(&mut self.tomcat.tomcat_home);
        for dependency in &mut self.dependencies {
            resolve(&mut dependency.path);
        }
    }

    /// Pick up unset resources from `jetresources/` when the conventional file exists.
    pub(super) fn apply_resource_defaults(&mut self) -> Result<()> {
        let resources = self.base_dir.join(DEFAULT_RESOURCES_DIR);
        let existing = |name: &str| {
            let path = resources.join(name);
            path.is_file().then_some(path)
        };

        if self.installer.eula.is_none() {
            self.installer.eula = match (existing(DEFAULT_EULA), existing(DEFAULT_UNICODE_EULA)) {
                (Some(_), Some(_)) => {
                    return Err(Error::Config(format!(
                        "both {DEFAULT_RESOURCES_DIR}/{DEFAULT_EULA} and \
                         {DEFAULT_RESOURCES_DIR}/{DEFAULT_UNICODE_EULA} exist; \
                         remove one or set `installer.eula`"
                    )));
                }
                (eula, unicode) => eula.or(unicode),
            };
        }
        if self.installer.splash.is_none() {
            self.installer.splash = existing(DEFAULT_INSTALLER_SPLASH);
        }
        if self.build.icon.is_none() {
            self.build.icon = existing(DEFAULT_WINDOWS_ICON);
        }
        if self.app_bundle.icon.is_none() {
            self.app_bundle.icon = existing(DEFAULT_BUNDLE_ICON);
        }
        Ok(())
    }

    /// Structural checks that do not depend on the toolchain.
    pub(super) fn validate(&self) -> Result<()> {
        if let Some(version) = self.version
            && version > CONFIG_VERSION
        {
            return Err(Error::Config(format!(
                "configuration version {version} is newer than the supported version {CONFIG_VERSION}"
            )));
        }
        if self.project.artifact_id.trim().is_empty() {
            return Err(Error::Config("`project.artifact_id` is required".into()));
        }
        if self.build.main_jar.as_os_str().is_empty() {
            return Err(Error::Config("`build.main_jar` is required".into()));
        }
        if let Some(dir) = &self.build.package_files_dir
            && !dir.is_dir()
        {
            return Err(Error::Config(format!(
                "package files directory {} does not exist",
                dir.display()
            )));
        }
        if let Some(trial) = &self.trial_version {
            validate_trial(trial)?;
        }
        Ok(())
    }
}

fn validate_trial(trial: &TrialVersionSettings) -> Result<()> {
    match (trial.expire_in_days, &trial.expire_date) {
        (Some(_), Some(_)) => {
            return Err(Error::Config(
                "set either `trial_version.expire_in_days` or `trial_version.expire_date`, not both"
                    .into(),
            ));
        }
        (None, None) => {
            return Err(Error::Config(
                "`trial_version` needs `expire_in_days` or `expire_date`".into(),
            ));
        }
        (_, Some(date)) => {
            NaiveDate::parse_from_str(date, EXPIRE_DATE_FORMAT).map_err(|e| {
                Error::Config(format!(
                    "`trial_version.expire_date` must look like 15Sep2025, got `{date}`: {e}"
                ))
            })?;
        }
        (Some(_), None) => {}
    }
    if trial
        .expire_message
        .as_deref()
        .is_none_or(|m| m.trim().is_empty())
    {
        return Err(Error::Config(
            "`trial_version.expire_message` is required".into(),
        ));
    }
    Ok(())
}
