//! Windows version-information resource settings.

use serde::Deserialize;

/// Version-information resource embedded into Windows executables.
///
/// Maps to the `[windows_version_info]` table. Ignored on other platforms.
///
/// # Examples
///
/// ```toml
/// [windows_version_info]
/// version = "2.1.0.0"
/// description = "Hello World application"
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsVersionInfo {
    /// Add the resource at all.
    ///
    /// Default: true
    pub enabled: bool,

    /// Product version in `v1.v2.v3.v4` form. Other forms are coerced with a warning.
    ///
    /// Default: the project version
    pub version: Option<String>,

    /// Legal copyright notice.
    ///
    /// Default: `Copyright \x00a9 [inception_year,]<current year> <vendor>`
    pub copyright: Option<String>,

    /// File description.
    ///
    /// Default: the product name
    pub description: Option<String>,
}

impl Default for WindowsVersionInfo {
    fn default() -> Self {
        Self {
            enabled: true,
            version: None,
            copyright: None,
            description: None,
        }
    }
}
