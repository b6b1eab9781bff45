//! Build orchestration.
//!
//! [`BuildPipeline`] stages the application, drives `jc` and `xpack`, and hands the
//! assembled image to the platform packagers. [`test_run`] shares the validation
//! and staging steps to record execution profiles with `xjava`.
//!
//! # Example
//!
//! ```no_run
//! use jet_bundler::bundler::{BuildPipeline, Context, Packaging, SettingsBuilder};
//!
//! # async fn example() -> jet_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .config_file("jet-bundler.toml")
//!     .packaging(Packaging::Zip)
//!     .build()?;
//!
//! let artifact = BuildPipeline::new(settings, Context::host()).run().await?;
//! println!("Created: {} ({} bytes)", artifact.paths[0].display(), artifact.size);
//! if let Some(sum) = &artifact.checksum {
//!     println!("SHA256: {sum}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`layout`] - Output directory layout
//! - [`staging`] - Copying the main jar, dependencies and Tomcat into `build/`
//! - [`invocation`] - Compiler flags and the `.prj` project file
//! - [`checksum`] - SHA-256 and size of the produced artifact
//! - `orchestrator` - The [`BuildPipeline`] stages and `clean`
//! - `test_run` - Profiling runs on the JET JVM

pub mod checksum;
pub mod invocation;
pub mod layout;
mod orchestrator;
pub mod staging;
mod test_run;

pub use checksum::calculate_sha256;
pub use invocation::{CompilerInvocation, Launch};
pub use layout::OutputLayout;
pub use orchestrator::{BuildPipeline, BundledArtifact, Stage, clean};
pub use staging::{StagingReport, stage_dependencies};
pub use test_run::{ROOT_PLACEHOLDER, launcher_args, test_run};
