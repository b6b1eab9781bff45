//! Command line interface for jet-bundler.
//!
//! Parses arguments, builds the run [`Context`] from the inherited environment and
//! the `-D` properties, and dispatches to the subcommand.

mod args;
pub mod commands;

pub use args::{Args, Command};

use crate::{
    bundler::{Context, Environment, LogSink, OsCapabilities},
    error::{CliError, Result},
};
use std::sync::Arc;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Execute already parsed arguments.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let ctx = create_context(&args);
    match args.command {
        Command::Build => commands::build(&args, ctx).await,
        Command::TestRun => commands::test_run(&args, ctx).await,
        Command::Clean => commands::clean(&args).await,
    }
}

/// Context for one invocation: log sink, host platform, inherited environment plus
/// the `-D` properties.
pub fn create_context(args: &Args) -> Context {
    let env = args
        .properties
        .iter()
        .fold(Environment::inherit(), |env, (key, value)| {
            env.with_property(key.clone(), value.clone())
        });
    Context::new(Arc::new(LogSink), OsCapabilities::host(), env)
}
