//! Excelsior Installer settings.

use serde::Deserialize;
use std::path::PathBuf;

/// Declared text encoding of the end-user license agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum EulaEncoding {
    #[serde(rename = "US-ASCII")]
    UsAscii,
    #[serde(rename = "UTF-16LE")]
    Utf16Le,
    /// Detect from the byte-order mark.
    #[default]
    #[serde(rename = "autodetect")]
    Autodetect,
}

impl EulaEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            EulaEncoding::UsAscii => "US-ASCII",
            EulaEncoding::Utf16Le => "UTF-16LE",
            EulaEncoding::Autodetect => "autodetect",
        }
    }
}

/// Excelsior Installer backend options.
///
/// Maps to the `[installer]` table.
///
/// # Examples
///
/// ```toml
/// [installer]
/// eula = "src/main/jetresources/eula.txt"
/// eula_encoding = "UTF-16LE"
/// splash = "src/main/jetresources/splash.bmp"
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerSettings {
    /// License agreement shown by the installer.
    ///
    /// Default: None
    pub eula: Option<PathBuf>,

    /// Encoding of `eula`: `US-ASCII`, `UTF-16LE` or `autodetect`.
    ///
    /// Default: `autodetect`
    pub eula_encoding: EulaEncoding,

    /// (Windows) BMP splash image shown while the installer unpacks.
    ///
    /// Default: None
    pub splash: Option<PathBuf>,
}
