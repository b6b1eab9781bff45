//! macOS application bundle settings.

use serde::Deserialize;
use std::path::PathBuf;

/// Property naming the code signing identity.
pub const DEVELOPER_ID_PROPERTY: &str = "osx.developer.id";
/// Property naming the installer signing identity.
pub const PUBLISHER_ID_PROPERTY: &str = "osx.publisher.id";
pub const DEVELOPER_ID_ENV: &str = "OSX_DEVELOPER_ID";
pub const PUBLISHER_ID_ENV: &str = "OSX_PUBLISHER_ID";

/// macOS application bundle (`.app`) configuration.
///
/// Maps to the `[app_bundle]` table.
///
/// # Configuration
///
/// ```toml
/// [app_bundle]
/// identifier = "com.example.hello"
/// icon = "src/main/jetresources/hello.icns"
/// developer_id = "Developer ID Application: Example Inc (ABCDE12345)"
/// publisher_id = "Developer ID Installer: Example Inc (ABCDE12345)"
/// ```
///
/// # Code Signing
///
/// Signing identities may also come from the `osx.developer.id` /
/// `osx.publisher.id` properties or the `OSX_DEVELOPER_ID` / `OSX_PUBLISHER_ID`
/// environment variables. A failed signing step aborts the build only when the
/// identity was set in this table; otherwise it is reported as a warning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppBundleSettings {
    /// Bundle directory name without `.app`.
    ///
    /// Default: the project name
    pub file_name: Option<String>,

    /// CFBundleName.
    ///
    /// Default: the project name
    pub bundle_name: Option<String>,

    /// CFBundleIdentifier.
    ///
    /// Default: `<group_id>.<artifact_id>`
    pub identifier: Option<String>,

    /// CFBundleShortVersionString.
    ///
    /// Default: the project version
    pub short_version: Option<String>,

    /// CFBundleVersion.
    ///
    /// Default: the short version
    pub version: Option<String>,

    /// `.icns` file copied to `Contents/Resources`.
    ///
    /// Default: None
    pub icon: Option<PathBuf>,

    /// NSHighResolutionCapable.
    ///
    /// Default: true
    pub high_resolution_capable: bool,

    /// Code signing identity for `codesign`.
    ///
    /// Default: None
    pub developer_id: Option<String>,

    /// Installer signing identity for `productbuild`.
    ///
    /// Default: None
    pub publisher_id: Option<String>,

    /// Install location of the `.pkg`.
    ///
    /// Default: `/Applications`
    pub install_path: String,
}

impl Default for AppBundleSettings {
    fn default() -> Self {
        Self {
            file_name: None,
            bundle_name: None,
            identifier: None,
            short_version: None,
            version: None,
            icon: None,
            high_resolution_capable: true,
            developer_id: None,
            publisher_id: None,
            install_path: "/Applications".to_string(),
        }
    }
}
