//! `jet-bundler test-run`

use super::load_settings;
use crate::{
    bundler::{Context, test_run},
    cli::Args,
    error::Result,
};

/// Run the application once to record execution profiles.
///
/// The application's own exit code is logged by the library and does not fail the
/// command: the profiles are usable either way.
pub async fn execute(args: &Args, ctx: Context) -> Result<i32> {
    let settings = load_settings(args)?;
    let code = test_run(&settings, &ctx).await?;
    log::debug!("Application exited with {code}");
    Ok(0)
}
