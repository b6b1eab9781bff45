//! The Excelsior JET toolchain: installation discovery, edition detection and the
//! compiler project file format.

pub mod edition;
pub mod home;
pub mod project_file;

pub use edition::{Capabilities, Edition};
pub use home::{MIN_SUPPORTED_VERSION, ToolInstallation, resolve};
pub use project_file::Dependency;
