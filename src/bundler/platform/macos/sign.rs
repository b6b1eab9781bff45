//! Code signing and installer package creation for application bundles.
//!
//! Identities set in the configuration make failures fatal; identities picked up
//! from properties or the environment only produce a warning.

use crate::bundler::{
    context::Context,
    error::{Error, Result},
    platform::SigningIdentity,
    process::ProcessRunner,
};
use std::path::{Path, PathBuf};

pub const CODESIGN: &str = "codesign";
pub const PRODUCTBUILD: &str = "productbuild";

/// Locate a tool on the `PATH` of the run's environment. Relative entries resolve
/// against `dir`.
pub fn find_tool(name: &str, ctx: &Context, dir: &Path) -> Result<PathBuf> {
    which::which_in(name, ctx.var("PATH"), dir)
        .map_err(|e| Error::GenericError(format!("`{name}` not found on PATH: {e}")))
}

/// `codesign --verbose --force --deep --sign <identity> <bundle>`.
///
/// Returns whether the bundle was signed.
pub async fn sign_bundle(bundle: &Path, identity: &SigningIdentity, ctx: &Context) -> Result<bool> {
    log::info!("Signing {} as {}", bundle.display(), identity.value);
    let outcome = codesign(bundle, identity, ctx).await;
    settle(outcome, identity, ctx)
}

async fn codesign(bundle: &Path, identity: &SigningIdentity, ctx: &Context) -> Result<()> {
    let dir = working_dir(bundle);
    ProcessRunner::new(find_tool(CODESIGN, ctx, dir)?)
        .current_dir(dir)
        .args(["--verbose", "--force", "--deep", "--sign", identity.value.as_str()])
        .arg(bundle)
        .execute_checked(ctx, "signing failed")
        .await
}

/// `productbuild --sign <identity> --component <bundle> <installPath> <pkg>`.
///
/// Returns whether the package was created.
pub async fn build_pkg(
    bundle: &Path,
    install_path: &str,
    pkg: &Path,
    identity: &SigningIdentity,
    ctx: &Context,
) -> Result<bool> {
    log::info!("Creating installer package {}", pkg.display());
    let outcome = productbuild(bundle, install_path, pkg, identity, ctx).await;
    settle(outcome, identity, ctx)
}

async fn productbuild(
    bundle: &Path,
    install_path: &str,
    pkg: &Path,
    identity: &SigningIdentity,
    ctx: &Context,
) -> Result<()> {
    let dir = working_dir(pkg);
    ProcessRunner::new(find_tool(PRODUCTBUILD, ctx, dir)?)
        .current_dir(dir)
        .args(["--sign", identity.value.as_str(), "--component"])
        .arg(bundle)
        .arg(install_path)
        .arg(pkg)
        .execute_checked(ctx, "installer package creation failed")
        .await
}

fn working_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}

fn settle(outcome: Result<()>, identity: &SigningIdentity, ctx: &Context) -> Result<bool> {
    match outcome {
        Ok(()) => Ok(true),
        Err(e) if identity.explicit => Err(e),
        Err(e) => {
            ctx.warn(format!("{e}; continuing without it"));
            Ok(false)
        }
    }
}
