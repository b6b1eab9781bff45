//! Native executable builds with the Excelsior JET toolchain.
//!
//! The bundler resolves a JET installation, stages a Java application, compiles it
//! with `jc`, assembles the runnable image with `xpack` and packages the result as a
//! directory, a zip archive, an Excelsior Installer or a macOS application bundle.
//!
//! # Example
//!
//! ```no_run
//! use jet_bundler::bundler::{BuildPipeline, Context, Packaging, SettingsBuilder};
//!
//! # async fn example() -> jet_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .config_file("jet-bundler.toml")
//!     .packaging(Packaging::ExcelsiorInstaller)
//!     .build()?;
//! let artifact = BuildPipeline::new(settings, Context::host()).run().await?;
//! println!("{}: {}", artifact.package_type, artifact.paths[0].display());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod capability;
pub mod context;
pub mod error;
pub mod os;
pub mod platform;
pub mod process;
pub mod settings;
pub mod toolchain;
pub mod utils;

pub use builder::{BuildPipeline, BundledArtifact, OutputLayout, Stage, clean, test_run};
pub use capability::{Features, GateOutcome, ToolFacts};
pub use context::{CollectingSink, Context, Environment, Level, LogSink, OutputSink};
pub use error::{Error, ErrorExt, ResolutionError, Result};
pub use os::{OsCapabilities, PlatformFamily};
pub use platform::PackageType;
pub use process::ProcessRunner;
pub use settings::{AppType, Packaging, Settings, SettingsBuilder};
pub use toolchain::{Edition, ToolInstallation};
