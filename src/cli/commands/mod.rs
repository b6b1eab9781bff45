//! Subcommand implementations.
//!
//! Each command loads what it needs from the [`Args`](super::Args), runs one
//! library operation and returns the process exit code.

mod build;
mod clean;
mod test_run;

pub use build::execute as build;
pub use clean::execute as clean;
pub use test_run::execute as test_run;

use super::Args;
use crate::{
    bundler::{Settings, SettingsBuilder},
    error::Result,
};

/// Load `jet-bundler.toml` with the command line overrides applied.
pub fn load_settings(args: &Args) -> Result<Settings> {
    let mut builder = SettingsBuilder::new().config_file(&args.config);
    if let Some(jet_home) = &args.jet_home {
        builder = builder.jet_home(jet_home.clone());
    }
    if let Some(packaging) = args.packaging {
        builder = builder.packaging(packaging);
    }
    if let Some(output_dir) = &args.output_dir {
        builder = builder.output_dir(output_dir);
    }
    Ok(builder.build()?)
}
