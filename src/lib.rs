//! Native executable builder for Java applications on top of Excelsior JET.
//!
//! The [`bundler`] module holds the toolchain orchestration and packaging pipeline;
//! [`cli`] is the `jet-bundler` command line front end built on it.

pub mod bundler;
pub mod cli;
pub mod error;

pub use error::{BundlerError, CliError, Result};
