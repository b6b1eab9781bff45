//! Host platform facts.
//!
//! Everything the pipeline needs to know about the operating system lives here:
//! executable suffix, platform family, search-path separator and whether environment
//! keys compare case-insensitively. The type is a plain value so tests can simulate
//! another platform by constructing it explicitly.

use std::fmt;

/// Operating system family the toolchain runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    Windows,
    MacOs,
    Linux,
    /// Any other Unix-like system
    Other,
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformFamily::Windows => "Windows",
            PlatformFamily::MacOs => "OS X",
            PlatformFamily::Linux => "Linux",
            PlatformFamily::Other => "Unix",
        };
        f.write_str(name)
    }
}

/// Stateless view of platform conventions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OsCapabilities {
    family: PlatformFamily,
}

impl OsCapabilities {
    /// Capabilities of the platform this binary was compiled for.
    pub const fn host() -> Self {
        let family = if cfg!(windows) {
            PlatformFamily::Windows
        } else if cfg!(target_os = "macos") {
            PlatformFamily::MacOs
        } else if cfg!(target_os = "linux") {
            PlatformFamily::Linux
        } else {
            PlatformFamily::Other
        };
        Self { family }
    }

    /// Capabilities of an explicitly chosen platform family.
    pub const fn new(family: PlatformFamily) -> Self {
        Self { family }
    }

    pub const fn family(&self) -> PlatformFamily {
        self.family
    }

    pub const fn is_windows(&self) -> bool {
        matches!(self.family, PlatformFamily::Windows)
    }

    pub const fn is_macos(&self) -> bool {
        matches!(self.family, PlatformFamily::MacOs)
    }

    /// Unix-like platforms expand `~/` and mark executables with permission bits.
    pub const fn is_unix(&self) -> bool {
        !self.is_windows()
    }

    /// Executable file suffix including the dot, empty on Unix-like systems.
    pub const fn exe_suffix(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Append the executable suffix to a bare program name.
    pub fn exe_name(&self, base: &str) -> String {
        format!("{base}{}", self.exe_suffix())
    }

    /// Separator between entries of `PATH` and classpath lists.
    pub const fn path_separator(&self) -> char {
        if self.is_windows() { ';' } else { ':' }
    }

    /// Split a search-path value into its non-empty entries.
    pub fn split_paths<'a>(&self, value: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        value
            .split(self.path_separator())
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
    }

    /// Environment variable names are case-insensitive on Windows.
    pub const fn env_case_insensitive(&self) -> bool {
        self.is_windows()
    }
}

impl Default for OsCapabilities {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exe_names_follow_family() {
        let windows = OsCapabilities::new(PlatformFamily::Windows);
        let linux = OsCapabilities::new(PlatformFamily::Linux);
        assert_eq!(windows.exe_name("jc"), "jc.exe");
        assert_eq!(linux.exe_name("jc"), "jc");
        assert!(windows.env_case_insensitive());
        assert!(!linux.env_case_insensitive());
    }

    #[test]
    fn split_paths_skips_empty_entries() {
        let windows = OsCapabilities::new(PlatformFamily::Windows);
        let entries: Vec<_> = windows
            .split_paths(r"C:\jet\bin;;C:\Windows;")
            .collect();
        assert_eq!(entries, vec![r"C:\jet\bin", r"C:\Windows"]);

        let mac = OsCapabilities::new(PlatformFamily::MacOs);
        let entries: Vec<_> = mac.split_paths("/usr/bin::/opt/jet/bin").collect();
        assert_eq!(entries, vec!["/usr/bin", "/opt/jet/bin"]);
        assert!(mac.is_unix());
    }
}
