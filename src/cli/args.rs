//! Command line argument parsing and validation.
//!
//! Global options select the configuration file and carry overrides; the subcommand
//! picks the operation.

use crate::bundler::{Packaging, settings::DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Native executable builder driving the Excelsior JET toolchain
#[derive(Parser, Debug)]
#[command(
    name = "jet-bundler",
    version,
    about = "Build native executables and installers with Excelsior JET",
    long_about = "Compiles a Java application to a native executable with Excelsior JET and \
packages the result as a directory, zip archive, Excelsior Installer or macOS app bundle.

Usage:
  jet-bundler build
  jet-bundler -c app/jet-bundler.toml --packaging excelsior-installer build
  jet-bundler -D jet.home=/opt/jet15 test-run
  jet-bundler clean

Exit code 0 = the requested operation completed."
)]
pub struct Args {
    /// Configuration file
    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILE,
        global = true
    )]
    pub config: PathBuf,

    /// Property in key=value form (jet.home, tomcat.home, osx.developer.id, osx.publisher.id)
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property, global = true)]
    pub properties: Vec<(String, String)>,

    /// Excelsior JET installation, overrides `build.jet_home`
    #[arg(long, value_name = "DIR", global = true)]
    pub jet_home: Option<String>,

    /// Packaging format: none, zip, excelsior-installer, osx-app-bundle, native-bundle
    #[arg(long, value_name = "FORMAT", global = true)]
    pub packaging: Option<Packaging>,

    /// Root of generated files, overrides `build.output_dir`
    #[arg(long, value_name = "DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operation to perform.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compile and package the application
    Build,
    /// Run the application on the JET JVM to record execution profiles
    TestRun,
    /// Remove the build and app directories
    Clean,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.config.as_os_str().is_empty() {
            return Err("Configuration file path cannot be empty".to_string());
        }
        if let Some(home) = &self.jet_home
            && home.trim().is_empty()
        {
            return Err("--jet-home cannot be empty".to_string());
        }
        if self.command == Command::TestRun
            && let Some(packaging) = self.packaging
        {
            return Err(format!(
                "--packaging {packaging} has no effect on test-run"
            ));
        }
        Ok(())
    }
}

/// Split `key=value`. The value may be empty and may contain `=`.
fn parse_property(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing property name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
