//! Test run: execute the application on the JET JVM to record execution profiles.
//!
//! The startup profile speeds up application start; the usage profile is what the
//! Global Optimizer needs. Both are written to the exec-profiles directory.

use super::{
    layout::OutputLayout,
    orchestrator::prepare,
    staging::stage_dependencies,
};
use crate::bundler::{
    context::Context,
    error::{Error, Result},
    os::OsCapabilities,
    process::ProcessRunner,
    settings::{AppType, Settings},
    toolchain::Dependency,
    utils::fs::{copy_dir_if_changed, create_dir_all},
};
use std::path::Path;

/// Placeholder in JVM arguments replaced by the build directory.
pub const ROOT_PLACEHOLDER: &str = "$(Root)";

/// Stages the application and runs it with `xjava`. Returns the exit code; a
/// non-zero exit is reported as a warning.
pub async fn test_run(settings: &Settings, ctx: &Context) -> Result<i32> {
    if settings.build.app_type == AppType::Tomcat {
        return Err(Error::Config(
            "test runs are supported for plain applications only".into(),
        ));
    }

    let layout = OutputLayout::new(settings.output_dir());
    let build_dir = layout.build_dir();
    create_dir_all(&build_dir, false).await?;

    let prepared = prepare(settings, ctx).await?;
    let staging = stage_dependencies(settings, &layout, ctx).await?;

    if let Some(package_files) = settings.package_files_dir() {
        let copied = copy_dir_if_changed(&package_files, &build_dir).await?;
        log::debug!("Copied {copied} package files into {}", build_dir.display());
    }

    create_dir_all(&settings.exec_profiles_dir(), false).await?;

    let args = launcher_args(
        settings,
        &staging.dependencies,
        prepared.facts.is_64_bit,
        ctx.os(),
        &build_dir,
    );
    let runner = ProcessRunner::new(prepared.tool.launcher())
        .args(args)
        .current_dir(&build_dir);
    log::info!("Starting test run: {}", runner.command_line());

    let code = runner.execute(ctx).await?;
    if code == 0 {
        log::info!("Test run finished with exit code 0");
    } else {
        ctx.warn(format!("Test run finished with exit code {code}"));
    }
    Ok(code)
}

/// `xjava` arguments: profile outputs, JVM arguments with `$(Root)` expanded, the
/// classpath and the main class. The usage list is only recorded on 32-bit
/// toolchains since the Global Optimizer does not exist elsewhere.
pub fn launcher_args(
    settings: &Settings,
    dependencies: &[Dependency],
    is_64_bit: bool,
    os: OsCapabilities,
    build_dir: &Path,
) -> Vec<String> {
    let mut args = vec![format!(
        "-Djet.jit.profile.startup={}",
        settings.startup_profile().display()
    )];
    if !is_64_bit {
        args.push(format!("-Djet.usage.list={}", settings.usage_profile().display()));
    }

    let root = build_dir.display().to_string();
    args.extend(
        settings
            .build
            .jvm_args
            .iter()
            .map(|arg| arg.replace(ROOT_PLACEHOLDER, &root)),
    );

    let classpath = dependencies
        .iter()
        .map(|d| d.path.display().to_string())
        .collect::<Vec<_>>()
        .join(&os.path_separator().to_string());
    args.push("-cp".to_string());
    args.push(classpath);
    args.push(
        settings
            .build
            .main_class
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string(),
    );
    args
}
