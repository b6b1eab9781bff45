//! Main build orchestration.
//!
//! [`BuildPipeline`] drives one build through its stages in a fixed order:
//!
//! `Validate → StageDependencies → BuildInvocation → Compile → Assemble → Package → Report`
//!
//! Nothing but directory creation happens before validation has passed, and a failing
//! stage ends the run.

use super::{
    checksum::{artifact_size, calculate_sha256},
    invocation::CompilerInvocation,
    layout::OutputLayout,
    staging::{StagingReport, resolve_tomcat_home, stage_dependencies, stage_tomcat},
};
use crate::bundler::{
    capability::{self, Features, ToolFacts},
    context::Context,
    error::{Error, Result},
    platform::{self, PackageType, PackagingRequest},
    process::ProcessRunner,
    settings::{AppType, Settings},
    toolchain::{self, ToolInstallation},
    utils::fs::{create_dir_all, remove_dir_all},
};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Validate,
    StageDependencies,
    BuildInvocation,
    Compile,
    Assemble,
    Package,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Validate => "validate",
            Stage::StageDependencies => "stage dependencies",
            Stage::BuildInvocation => "build invocation",
            Stage::Compile => "compile",
            Stage::Assemble => "assemble",
            Stage::Package => "package",
            Stage::Report => "report",
        })
    }
}

/// Information about a produced artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    pub package_type: PackageType,
    /// Main path first (the archive, installer or bundle), extras after it.
    pub paths: Vec<PathBuf>,
    /// Size in bytes of the main path.
    pub size: u64,
    /// SHA-256 of the main path, absent when it could not be computed.
    pub checksum: Option<String>,
}

/// Toolchain and inputs checked before anything is built.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub tool: Arc<ToolInstallation>,
    pub facts: ToolFacts,
    pub tomcat_home: Option<PathBuf>,
}

/// Check the inputs and resolve the toolchain. Shared by build and test run.
pub(crate) async fn prepare(settings: &Settings, ctx: &Context) -> Result<Prepared> {
    let main_jar = &settings.build.main_jar;
    if !main_jar.is_file() {
        return Err(Error::Config(format!(
            "main artifact {} not found, build the application first",
            main_jar.display()
        )));
    }

    let tomcat_home = match settings.build.app_type {
        AppType::Tomcat => Some(resolve_tomcat_home(settings, ctx)?),
        AppType::Plain => {
            if settings
                .build
                .main_class
                .as_deref()
                .is_none_or(|c| c.trim().is_empty())
            {
                return Err(Error::Config("`build.main_class` is required".into()));
            }
            None
        }
    };

    let tool = toolchain::resolve(settings.build.jet_home.as_deref(), ctx)?;
    let facts = tool.facts(ctx).await?;
    Ok(Prepared {
        tool,
        facts,
        tomcat_home,
    })
}

/// Runs one build.
///
/// # Examples
///
/// ```no_run
/// use jet_bundler::bundler::{BuildPipeline, Context, SettingsBuilder};
///
/// # async fn example() -> jet_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new().config_file("jet-bundler.toml").build()?;
/// let artifact = BuildPipeline::new(settings, Context::host()).run().await?;
/// println!("{} ({} bytes)", artifact.paths[0].display(), artifact.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BuildPipeline {
    settings: Settings,
    ctx: Context,
    layout: OutputLayout,
}

impl BuildPipeline {
    pub fn new(settings: Settings, ctx: Context) -> Self {
        let layout = OutputLayout::new(settings.output_dir());
        Self {
            settings,
            ctx,
            layout,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Run every stage and return the final artifact.
    pub async fn run(&self) -> Result<BundledArtifact> {
        let ctx = &self.ctx;
        let build_dir = self.layout.build_dir();

        self.enter(Stage::Validate);
        create_dir_all(&build_dir, false).await?;
        let prepared = prepare(&self.settings, ctx).await?;
        let features = capability::apply(&self.settings, &prepared.facts, ctx)?;

        self.enter(Stage::StageDependencies);
        let staging = self.stage(&prepared).await?;

        self.enter(Stage::BuildInvocation);
        let invocation =
            CompilerInvocation::assemble(&self.settings, &features, staging.dependencies, ctx)?;
        invocation.write_project_file(&self.layout).await?;
        let executable = ctx.os().exe_name(&invocation.output_name);

        self.enter(Stage::Compile);
        ProcessRunner::new(prepared.tool.compiler())
            .args(invocation.compiler_args())
            .current_dir(&build_dir)
            .execute_checked(ctx, "build failed")
            .await?;
        if !build_dir.join(&executable).is_file() {
            return Err(Error::GenericError(format!(
                "build failed: {} was not produced",
                build_dir.join(&executable).display()
            )));
        }

        self.enter(Stage::Assemble);
        let request = PackagingRequest::new(&self.settings, &features, &self.layout, &executable, ctx);
        self.assemble(&prepared.tool, &request).await?;

        self.enter(Stage::Package);
        let paths = platform::package(&request, &prepared.tool, ctx).await?;

        self.enter(Stage::Report);
        Ok(self.report(request.package_type, paths, &features).await)
    }

    fn enter(&self, stage: Stage) {
        log::info!("[{stage}]");
    }

    async fn stage(&self, prepared: &Prepared) -> Result<StagingReport> {
        match &prepared.tomcat_home {
            Some(home) => stage_tomcat(&self.settings, home, &self.layout).await,
            None => stage_dependencies(&self.settings, &self.layout, &self.ctx).await,
        }
    }

    /// `xpack <contents> -target app/`, with `app/` removed first.
    async fn assemble(&self, tool: &ToolInstallation, request: &PackagingRequest) -> Result<()> {
        let app_dir = self.layout.app_dir();
        remove_dir_all(&app_dir).await?;
        ProcessRunner::new(tool.packager())
            .args(&request.contents)
            .arg("-target")
            .arg(&app_dir)
            .current_dir(&request.build_dir)
            .execute_checked(&self.ctx, "packaging failed")
            .await
    }

    /// Log where the artifact is. Size or checksum failures only warn.
    async fn report(
        &self,
        package_type: PackageType,
        paths: Vec<PathBuf>,
        features: &Features,
    ) -> BundledArtifact {
        let main = paths.first().cloned().unwrap_or_else(|| self.layout.app_dir());

        let size = match artifact_size(&main).await {
            Ok(size) => size,
            Err(e) => {
                self.ctx.warn(format!("Cannot determine the size of {}: {e}", main.display()));
                0
            }
        };
        let checksum = match calculate_sha256(&main).await {
            Ok(sum) => Some(sum),
            Err(e) => {
                self.ctx.warn(format!("Cannot compute the checksum of {}: {e}", main.display()));
                None
            }
        };

        log::info!("Build successful");
        log::info!("{package_type}: {} ({size} bytes)", main.display());
        if let Some(sum) = &checksum {
            log::info!("SHA-256: {sum}");
        }
        for extra in paths.iter().skip(1) {
            log::info!("Also created {}", extra.display());
        }
        if features.slim_down
            && let Some(pkl) = self.detached_package()
        {
            log::info!(
                "Upload {} to {}",
                pkl.display(),
                self.settings
                    .runtime
                    .slim_down
                    .as_ref()
                    .and_then(|s| s.detached_base_url.as_deref())
                    .unwrap_or_default()
            );
        }

        BundledArtifact {
            package_type,
            paths,
            size,
            checksum,
        }
    }

    fn detached_package(&self) -> Option<PathBuf> {
        let slim_down = self.settings.runtime.slim_down.as_ref()?;
        let name = slim_down
            .detached_package
            .clone()
            .unwrap_or_else(|| format!("{}.pkl", self.settings.project.final_name()));
        Some(self.layout.root().join(name))
    }
}

/// Remove `build/` and `app/` under the output root. Missing directories are fine.
pub async fn clean(output_dir: &Path) -> Result<()> {
    let layout = OutputLayout::new(output_dir);
    remove_dir_all(&layout.build_dir()).await?;
    remove_dir_all(&layout.app_dir()).await?;
    log::info!("Cleaned {}", output_dir.display());
    Ok(())
}
