//! Configuration structures for a build.
//!
//! One versioned struct ([`Settings`]) holds every table of `jet-bundler.toml`.
//! Deprecated keys are mapped onto canonical ones by an explicit migration table
//! before deserialization.

mod build;
mod builder;
mod core;
mod installer;
mod macos;
pub mod migration;
mod package;
mod runtime;
mod windows;

pub use build::{
    AppType, BuildSettings, DependencySettings, InlineExpansion, Packaging, StackTraceSupport,
};
pub use builder::SettingsBuilder;
pub use core::{CONFIG_VERSION, DEFAULT_CONFIG_FILE, EXPIRE_DATE_FORMAT, Settings};
pub use installer::{EulaEncoding, InstallerSettings};
pub use macos::{
    AppBundleSettings, DEVELOPER_ID_ENV, DEVELOPER_ID_PROPERTY, PUBLISHER_ID_ENV,
    PUBLISHER_ID_PROPERTY,
};
pub use package::PackageSettings;
pub use runtime::{
    CompactProfile, DiskFootprintReduction, RuntimeFlavor, RuntimeSettings, SlimDownSettings,
    TomcatSettings, TrialVersionSettings,
};
pub use windows::WindowsVersionInfo;
