//! `jet-bundler clean`

use super::load_settings;
use crate::{bundler::clean, cli::Args, error::Result};

/// Remove `build/` and `app/`. With `--output-dir` the configuration file is not read.
pub async fn execute(args: &Args) -> Result<i32> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => load_settings(args)?.output_dir().to_path_buf(),
    };
    clean(&output_dir).await?;
    Ok(0)
}
