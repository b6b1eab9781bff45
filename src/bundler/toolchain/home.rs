//! Excelsior JET installation discovery and validation.
//!
//! Resolution order, first success wins:
//!
//! 1. explicit path (`--jet-home` or `build.jet_home`)
//! 2. the `jet.home` property
//! 3. the `JET_HOME` environment variable
//! 4. the first `PATH` entry that is a JET `bin` directory with a supported version
//!
//! A resolved installation is cached for the lifetime of the process, so resolving the
//! same root twice returns the same `Arc` without probing the filesystem again.

use super::edition::{Capabilities, Edition, parse_banner};
use crate::bundler::{
    capability::ToolFacts,
    context::{CollectingSink, Context, Level},
    error::{ErrorExt, ResolutionError, Result},
    os::{OsCapabilities, PlatformFamily},
    process::ProcessRunner,
};
use path_absolutize::Absolutize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock, Mutex, PoisonError},
};
use tokio::sync::OnceCell;

/// Oldest Excelsior JET release the pipeline drives (11.0).
pub const MIN_SUPPORTED_VERSION: i32 = 1100;

/// Property consulted after the explicit path.
pub const JET_HOME_PROPERTY: &str = "jet.home";

/// Environment variable consulted after the property.
pub const JET_HOME_ENV: &str = "JET_HOME";

pub const COMPILER: &str = "jc";
pub const PACKAGER: &str = "xpack";
pub const LAUNCHER: &str = "xjava";

const BIN_DIR: &str = "bin";
const CONFIG_MARKER: &str = "jet.config";

const ORIGIN_EXPLICIT: &str = "explicit parameter";
const ORIGIN_PROPERTY: &str = "system property";
const ORIGIN_ENVIRONMENT: &str = "environment variable";

const VERSION_MARKER_PREFIX: &str = "jet";
const VERSION_MARKER_SUFFIX: &str = ".home";

type CacheKey = (PathBuf, PlatformFamily);

static INSTALLATIONS: LazyLock<Mutex<HashMap<CacheKey, Arc<ToolInstallation>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// A validated Excelsior JET installation.
#[derive(Debug)]
pub struct ToolInstallation {
    root: PathBuf,
    version: i32,
    os: OsCapabilities,
    capabilities: OnceCell<Capabilities>,
}

impl ToolInstallation {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Four digit version, e.g. `1150` for 11.5.
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    pub fn compiler(&self) -> PathBuf {
        self.bin_dir().join(self.os.exe_name(COMPILER))
    }

    pub fn packager(&self) -> PathBuf {
        self.bin_dir().join(self.os.exe_name(PACKAGER))
    }

    pub fn launcher(&self) -> PathBuf {
        self.bin_dir().join(self.os.exe_name(LAUNCHER))
    }

    /// Edition and bitness, detected on first use by running the compiler with no
    /// arguments and memoized afterwards.
    pub async fn capabilities(&self, ctx: &Context) -> Result<Capabilities> {
        self.capabilities
            .get_or_try_init(|| self.detect_capabilities(ctx))
            .await
            .copied()
    }

    pub async fn edition(&self, ctx: &Context) -> Result<Edition> {
        Ok(self.capabilities(ctx).await?.edition)
    }

    pub async fn is_64_bit(&self, ctx: &Context) -> Result<bool> {
        Ok(self.capabilities(ctx).await?.is_64_bit)
    }

    /// Everything the capability gates need to know.
    pub async fn facts(&self, ctx: &Context) -> Result<ToolFacts> {
        let caps = self.capabilities(ctx).await?;
        Ok(ToolFacts {
            version: self.version,
            edition: caps.edition,
            is_64_bit: caps.is_64_bit,
        })
    }

    async fn detect_capabilities(&self, ctx: &Context) -> Result<Capabilities> {
        let banner = Arc::new(CollectingSink::new());
        let probe = ctx.with_sink(banner.clone());

        let code = ProcessRunner::new(self.compiler()).execute(&probe).await?;
        if code != 0 {
            return Err(ResolutionError::EditionUndetected {
                reason: format!("{COMPILER} exited with code {code}"),
            }
            .into());
        }

        let lines = banner.lines_at(Level::Info);
        let caps = parse_banner(lines.iter().map(String::as_str)).ok_or_else(|| {
            ResolutionError::EditionUndetected {
                reason: format!("no edition found in {COMPILER} output"),
            }
        })?;

        log::info!(
            "Excelsior JET {} {}{}",
            self.version,
            caps.edition,
            if caps.is_64_bit { " (64-bit)" } else { "" }
        );
        Ok(caps)
    }
}

/// Locate and validate the toolchain.
pub fn resolve(explicit: Option<&str>, ctx: &Context) -> Result<Arc<ToolInstallation>> {
    if let Some(path) = explicit.filter(|p| !p.trim().is_empty()) {
        return validate(ORIGIN_EXPLICIT, path, ctx);
    }
    if let Some(path) = ctx.property(JET_HOME_PROPERTY) {
        return validate(ORIGIN_PROPERTY, path, ctx);
    }
    if let Some(path) = ctx.var(JET_HOME_ENV) {
        return validate(ORIGIN_ENVIRONMENT, path, ctx);
    }

    let os = ctx.os();
    if let Some(search_path) = ctx.var("PATH") {
        for entry in os.split_paths(search_path) {
            let Ok(bin) = Path::new(entry).absolutize() else {
                continue;
            };
            if !is_bin_dir(&bin, os) {
                continue;
            }
            let Some(root) = bin.parent() else {
                continue;
            };
            if let Some(cached) = cached(root, os) {
                return Ok(cached);
            }
            let version = detect_version(&bin);
            if version >= MIN_SUPPORTED_VERSION {
                log::debug!("Found Excelsior JET {version} on PATH at {}", root.display());
                return Ok(remember(root.to_path_buf(), version, os));
            }
            log::debug!(
                "Skipping Excelsior JET at {} on PATH: version {version} is not supported",
                root.display()
            );
        }
    }

    Err(ResolutionError::NotFound.into())
}

fn validate(origin: &'static str, raw: &str, ctx: &Context) -> Result<Arc<ToolInstallation>> {
    let os = ctx.os();
    let expanded = expand_home(raw.trim(), ctx);
    let root = expanded
        .absolutize()
        .fs_context("resolving Excelsior JET home", &expanded)?
        .into_owned();

    if let Some(cached) = cached(&root, os) {
        return Ok(cached);
    }

    let bin = root.join(BIN_DIR);
    if !is_bin_dir(&bin, os) {
        return Err(ResolutionError::NotJetHome { origin, path: root }.into());
    }

    let version = detect_version(&bin);
    if version < MIN_SUPPORTED_VERSION {
        return Err(ResolutionError::UnsupportedVersion {
            origin,
            path: root,
            version,
            minimum: MIN_SUPPORTED_VERSION,
        }
        .into());
    }

    log::debug!("Using Excelsior JET {version} at {} ({origin})", root.display());
    Ok(remember(root, version, os))
}

/// Expand a leading `~/` on Unix-like systems.
fn expand_home(raw: &str, ctx: &Context) -> PathBuf {
    if ctx.os().is_unix() {
        if let Some(rest) = raw.strip_prefix("~/") {
            if let Some(home) = ctx.home_dir() {
                return home.join(rest);
            }
        } else if raw == "~" {
            if let Some(home) = ctx.home_dir() {
                return home;
            }
        }
    }
    PathBuf::from(raw)
}

/// True when `dir` holds the config marker and both required executables.
pub fn is_bin_dir(dir: &Path, os: OsCapabilities) -> bool {
    dir.join(CONFIG_MARKER).is_file()
        && dir.join(os.exe_name(COMPILER)).is_file()
        && dir.join(os.exe_name(PACKAGER)).is_file()
}

/// Version encoded in a `jet<N>.home` marker file, `-1` when absent or malformed.
pub fn detect_version(bin_dir: &Path) -> i32 {
    let Ok(entries) = std::fs::read_dir(bin_dir) else {
        return -1;
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            parse_version_marker(name.to_str()?)
        })
        .max()
        .unwrap_or(-1)
}

fn parse_version_marker(name: &str) -> Option<i32> {
    let digits = name
        .strip_prefix(VERSION_MARKER_PREFIX)?
        .strip_suffix(VERSION_MARKER_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn cached(root: &Path, os: OsCapabilities) -> Option<Arc<ToolInstallation>> {
    let cache = INSTALLATIONS.lock().unwrap_or_else(PoisonError::into_inner);
    cache.get(&(root.to_path_buf(), os.family())).cloned()
}

fn remember(root: PathBuf, version: i32, os: OsCapabilities) -> Arc<ToolInstallation> {
    let mut cache = INSTALLATIONS.lock().unwrap_or_else(PoisonError::into_inner);
    cache
        .entry((root.clone(), os.family()))
        .or_insert_with(|| {
            Arc::new(ToolInstallation {
                root,
                version,
                os,
                capabilities: OnceCell::new(),
            })
        })
        .clone()
}
