//! macOS application bundles.

pub mod app;
pub mod sign;

pub use app::bundle_project;
