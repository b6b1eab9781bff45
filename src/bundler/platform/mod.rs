//! Packaging of the assembled application image.
//!
//! The `app/` directory produced by the Assemble stage is turned into the final
//! artifact according to the effective packaging format:
//!
//! - none: `app/` itself
//! - zip: `<outputRoot>/<finalName>.zip`
//! - installer: an Excelsior Installer executable built by `xpack`
//! - app-bundle: a signed-on-request macOS `.app` (plus `.pkg`)

pub mod installer;
pub mod macos;
pub mod zip;

use crate::bundler::{
    builder::OutputLayout,
    capability::Features,
    context::Context,
    error::Result,
    settings::{
        DEVELOPER_ID_ENV, DEVELOPER_ID_PROPERTY, EulaEncoding, PUBLISHER_ID_ENV,
        PUBLISHER_ID_PROPERTY, Packaging, Settings,
    },
    toolchain::ToolInstallation,
};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Kind of artifact a build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageType {
    /// Plain application directory.
    Directory,
    Zip,
    /// Excelsior Installer executable.
    Installer,
    /// macOS `.app` bundle.
    AppBundle,
}

impl PackageType {
    pub fn from_packaging(packaging: Packaging) -> Self {
        match packaging {
            Packaging::None => PackageType::Directory,
            Packaging::Zip => PackageType::Zip,
            Packaging::ExcelsiorInstaller => PackageType::Installer,
            Packaging::OsxAppBundle | Packaging::NativeBundle => PackageType::AppBundle,
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackageType::Directory => "directory",
            PackageType::Zip => "zip",
            PackageType::Installer => "installer",
            PackageType::AppBundle => "app-bundle",
        })
    }
}

/// Signing identity and whether it was set explicitly in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningIdentity {
    pub value: String,
    /// Failures with an explicit identity are fatal; otherwise they are warnings.
    pub explicit: bool,
}

/// Options of the installer backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerOptions {
    pub vendor: String,
    pub product: String,
    pub version: String,
    pub eula: Option<(PathBuf, EulaEncoding)>,
    pub splash: Option<PathBuf>,
}

/// Options of the macOS application bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBundleOptions {
    pub bundle_name: String,
    pub identifier: String,
    pub short_version: String,
    pub version: String,
    pub icon: Option<PathBuf>,
    pub high_resolution_capable: bool,
    pub developer_id: Option<SigningIdentity>,
    pub publisher_id: Option<SigningIdentity>,
    pub install_path: String,
}

/// Everything a packager needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingRequest {
    pub package_type: PackageType,
    /// The assembled application image.
    pub source_dir: PathBuf,
    /// Working directory for `xpack`.
    pub build_dir: PathBuf,
    /// Where the artifact is written.
    pub target: PathBuf,
    /// File name of the compiled executable inside `build/`.
    pub executable: String,
    /// `xpack` arguments describing the image contents, without the target.
    pub contents: Vec<String>,
    pub installer: Option<InstallerOptions>,
    pub app_bundle: Option<AppBundleOptions>,
}

impl PackagingRequest {
    pub fn new(
        settings: &Settings,
        features: &Features,
        layout: &OutputLayout,
        executable: &str,
        ctx: &Context,
    ) -> Self {
        let package_type = PackageType::from_packaging(features.packaging);
        let final_name = settings.project.final_name();
        let root = layout.root();

        let target = match package_type {
            PackageType::Directory => layout.app_dir(),
            PackageType::Zip => root.join(format!("{final_name}.zip")),
            PackageType::Installer => root.join(ctx.os().exe_name(final_name)),
            PackageType::AppBundle => root.join(format!("{}.app", settings.bundle_file_name())),
        };

        let installer = (package_type == PackageType::Installer).then(|| InstallerOptions {
            vendor: settings.project.vendor(),
            product: settings.project.product().to_string(),
            version: settings.project.version().to_string(),
            eula: settings
                .installer
                .eula
                .clone()
                .map(|eula| (eula, settings.installer.eula_encoding)),
            splash: settings
                .installer
                .splash
                .clone()
                .filter(|_| ctx.os().is_windows()),
        });

        let app_bundle = (package_type == PackageType::AppBundle).then(|| AppBundleOptions {
            bundle_name: settings.bundle_name().to_string(),
            identifier: settings.bundle_identifier(),
            short_version: settings.bundle_short_version().to_string(),
            version: settings.bundle_version().to_string(),
            icon: settings.app_bundle.icon.clone(),
            high_resolution_capable: settings.app_bundle.high_resolution_capable,
            developer_id: signing_identity(
                settings.app_bundle.developer_id.as_deref(),
                DEVELOPER_ID_PROPERTY,
                DEVELOPER_ID_ENV,
                ctx,
            ),
            publisher_id: signing_identity(
                settings.app_bundle.publisher_id.as_deref(),
                PUBLISHER_ID_PROPERTY,
                PUBLISHER_ID_ENV,
                ctx,
            ),
            install_path: settings.app_bundle.install_path.clone(),
        });

        Self {
            package_type,
            source_dir: layout.app_dir(),
            build_dir: layout.build_dir(),
            target,
            executable: executable.to_string(),
            contents: contents_args(settings, features, executable, root),
            installer,
            app_bundle,
        }
    }
}

/// `xpack` arguments shared by every image: the executable, package files,
/// optional runtime components and the detached slim-down package.
pub fn contents_args(
    settings: &Settings,
    features: &Features,
    executable: &str,
    output_root: &Path,
) -> Vec<String> {
    let mut args = vec!["-add-file".to_string(), executable.to_string(), "/".to_string()];

    if let Some(dir) = settings.package_files_dir() {
        args.push("-source".to_string());
        args.push(dir.display().to_string());
    }

    let components = &settings.runtime.components;
    if !components.is_empty() {
        args.push("-add-opt-rt-files".to_string());
        args.push(components.join(","));
    }

    if features.slim_down
        && let Some(slim_down) = &settings.runtime.slim_down
    {
        let detached = if slim_down.detach_components.is_empty() {
            "auto".to_string()
        } else {
            slim_down.detach_components.join(",")
        };
        let package = slim_down
            .detached_package
            .clone()
            .unwrap_or_else(|| format!("{}.pkl", settings.project.final_name()));
        args.extend([
            "-detached-base-url".to_string(),
            slim_down.detached_base_url.clone().unwrap_or_default(),
            "-detach-components".to_string(),
            detached,
            "-detached-package".to_string(),
            output_root.join(package).display().to_string(),
        ]);
    }
    args
}

fn signing_identity(
    configured: Option<&str>,
    property: &str,
    env: &str,
    ctx: &Context,
) -> Option<SigningIdentity> {
    if let Some(value) = configured.filter(|v| !v.trim().is_empty()) {
        return Some(SigningIdentity {
            value: value.to_string(),
            explicit: true,
        });
    }
    ctx.property(property)
        .or_else(|| ctx.var(env))
        .map(|value| SigningIdentity {
            value: value.to_string(),
            explicit: false,
        })
}

/// Produce the final artifact. Returns the paths it consists of, main path first.
pub async fn package(
    request: &PackagingRequest,
    tool: &ToolInstallation,
    ctx: &Context,
) -> Result<Vec<PathBuf>> {
    match request.package_type {
        PackageType::Directory => Ok(vec![request.source_dir.clone()]),
        PackageType::Zip => {
            log::info!("Creating {}", request.target.display());
            zip::create_zip(&request.source_dir, &request.target).await?;
            Ok(vec![request.target.clone()])
        }
        PackageType::Installer => installer::bundle_project(request, tool, ctx).await,
        PackageType::AppBundle => macos::bundle_project(request, tool, ctx).await,
    }
}
