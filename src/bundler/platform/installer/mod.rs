//! Excelsior Installer packaging.
//!
//! `xpack` builds a self-extracting installer from the same contents as the
//! application image, with the `excelsior-installer` backend.

pub mod encoding;

use super::{InstallerOptions, PackagingRequest};
use crate::bundler::{
    context::Context,
    error::{Error, Result},
    process::ProcessRunner,
    toolchain::ToolInstallation,
};
use std::path::PathBuf;

/// Build the installer and return its path.
pub async fn bundle_project(
    request: &PackagingRequest,
    tool: &ToolInstallation,
    ctx: &Context,
) -> Result<Vec<PathBuf>> {
    let options = request
        .installer
        .as_ref()
        .ok_or_else(|| Error::GenericError("installer options missing".into()))?;

    let args = installer_args(request, options).await?;
    log::info!("Creating installer {}", request.target.display());
    ProcessRunner::new(tool.packager())
        .args(args)
        .current_dir(&request.build_dir)
        .execute_checked(ctx, "packaging failed")
        .await?;
    Ok(vec![request.target.clone()])
}

/// Full `xpack` argument list for the installer backend.
pub async fn installer_args(
    request: &PackagingRequest,
    options: &InstallerOptions,
) -> Result<Vec<String>> {
    let mut args = request.contents.clone();
    args.extend([
        "-backend".to_string(),
        "excelsior-installer".to_string(),
        "-company".to_string(),
        options.vendor.clone(),
        "-product".to_string(),
        options.product.clone(),
        "-version".to_string(),
        options.version.clone(),
    ]);

    if let Some((eula, declared)) = &options.eula {
        let detected = encoding::detect_file(eula).await?;
        let flag = encoding::eula_flag(*declared, detected)?;
        args.push(flag.to_string());
        args.push(eula.display().to_string());
    }
    if let Some(splash) = &options.splash {
        args.push("-splash".to_string());
        args.push(splash.display().to_string());
    }

    args.push("-target".to_string());
    args.push(request.target.display().to_string());
    Ok(args)
}
