//! Top-level error types for the command line tool.
//!
//! Library failures arrive as [`crate::bundler::Error`] and are wrapped here together
//! with argument problems, so `main` has one type to report and map to an exit code.

use crate::bundler::{Error as PipelineError, ResolutionError};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the command line tool
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline errors
    #[error("{0}")]
    Bundler(#[from] PipelineError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Actionable hints printed after the error message.
    pub fn recovery_suggestions(&self) -> Vec<String> {
        let BundlerError::Bundler(error) = self else {
            return match self {
                BundlerError::Cli(CliError::InvalidArguments { .. }) => {
                    vec!["Run `jet-bundler --help` for usage".to_string()]
                }
                _ => Vec::new(),
            };
        };

        if error.is_launch_failure() {
            return vec![
                "Check that jet.home, JET_HOME or PATH points at a complete Excelsior JET \
                 installation"
                    .to_string(),
            ];
        }

        match root_cause(error) {
            PipelineError::Resolution(ResolutionError::NotFound) => vec![
                "Pass -D jet.home=<dir> or --jet-home <dir>".to_string(),
                "Or set the JET_HOME environment variable".to_string(),
            ],
            PipelineError::Resolution(ResolutionError::UnsupportedVersion { .. }) => {
                vec!["Install a newer Excelsior JET release".to_string()]
            }
            PipelineError::CapabilityRejected(_) => {
                vec!["Disable the feature in the configuration or use another edition".to_string()]
            }
            PipelineError::Config(_) | PipelineError::Toml(_) => {
                vec!["Check the configuration file".to_string()]
            }
            PipelineError::CommandExit { .. } => {
                vec!["See the tool output above for details".to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

fn root_cause(error: &PipelineError) -> &PipelineError {
    match error {
        PipelineError::Context { source, .. } => root_cause(source),
        other => other,
    }
}
