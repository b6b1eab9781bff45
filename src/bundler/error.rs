//! Error types for toolchain orchestration and packaging.
//!
//! Every pipeline failure maps onto one of the variants below. Nothing is retried and
//! nothing is swallowed: a stage either completes or the whole run aborts with one of
//! these errors.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to locate or validate an Excelsior JET installation.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The directory does not contain `bin/jet.config`, `bin/jc` and `bin/xpack`.
    #[error("{origin}: {} is not an Excelsior JET home directory", .path.display())]
    NotJetHome {
        /// Where the candidate came from ("explicit parameter", "system property", ...)
        origin: &'static str,
        /// Candidate home directory
        path: PathBuf,
    },

    /// The installation is older than the minimum supported version.
    #[error(
        "{origin}: Excelsior JET at {} is not supported (version {version}, minimum is {minimum})",
        .path.display()
    )]
    UnsupportedVersion {
        /// Where the candidate came from
        origin: &'static str,
        /// Candidate home directory
        path: PathBuf,
        /// Detected version, -1 if the version marker is absent or malformed
        version: i32,
        /// Minimum supported version
        minimum: i32,
    },

    /// Nothing usable in the explicit parameter, the property, the environment or PATH.
    #[error(
        "Excelsior JET installation not found: set the jet.home property, the JET_HOME \
         environment variable, or add the Excelsior JET bin directory to PATH"
    )]
    NotFound,

    /// The compiler banner could not be classified.
    #[error("unable to detect the Excelsior JET edition: {reason}")]
    EditionUndetected {
        /// What went wrong while probing the compiler
        reason: String,
    },
}

/// Main error type for all bundler operations
#[derive(Debug, Error)]
pub enum Error {
    /// Toolchain resolution or capability detection failed
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A requested feature cannot be honoured by the detected toolchain
    #[error("{0}")]
    CapabilityRejected(String),

    /// Invalid or inconsistent configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// External program could not be launched or awaited
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Program that failed to launch
        command: String,
        /// Underlying launch error
        error: io::Error,
    },

    /// External program ran and exited with a non-zero code
    #[error("{context}: `{command}` exited with code {code}")]
    CommandExit {
        /// Short pipeline-level description ("build failed", "packaging failed")
        context: String,
        /// Program that failed
        command: String,
        /// Exit code, -1 when terminated by a signal
        code: i32,
    },

    /// Filesystem operation failed on a known path
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// Operation being performed
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        error: io::Error,
    },

    /// IO errors without path information
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Zip archive creation errors
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Info.plist serialization errors
    #[error("plist error: {0}")]
    Plist(#[from] plist::Error),

    /// Configuration file parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Directory traversal errors
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Path prefix stripping errors
    #[error("path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Error wrapped with additional context
    #[error("{context}: {source}")]
    Context {
        /// Description of what was being attempted
        context: String,
        /// Original error
        source: Box<Error>,
    },

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// True when the failure is a tool that could not be started at all, as opposed to a
    /// tool that ran and failed.
    pub fn is_launch_failure(&self) -> bool {
        match self {
            Error::CommandFailed { .. } => true,
            Error::Context { source, .. } => source.is_launch_failure(),
            _ => false,
        }
    }
}

/// Attach a human readable context to errors and missing values.
pub trait Context<T> {
    /// Wrap the error (or `None`) with a static description.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Wrap the error (or `None`) with a lazily built description.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context {
            context: context.to_string(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context {
            context: f().to_string(),
            source: Box::new(e.into()),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Attach the path of a failed filesystem operation to an `io::Error`.
pub trait ErrorExt<T> {
    /// Convert into [`Error::Fs`] naming the operation and the path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
