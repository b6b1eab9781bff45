//! `jet-bundler build`

use super::load_settings;
use crate::{
    bundler::{BuildPipeline, Context},
    cli::Args,
    error::Result,
};

/// Run the full pipeline and print where the artifact went.
pub async fn execute(args: &Args, ctx: Context) -> Result<i32> {
    let settings = load_settings(args)?;
    let artifact = BuildPipeline::new(settings, ctx).run().await?;

    for path in &artifact.paths {
        println!("{}", path.display());
    }
    Ok(0)
}
