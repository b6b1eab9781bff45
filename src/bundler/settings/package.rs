//! Project metadata: the `[project]` table.

use serde::Deserialize;

/// Project coordinates and product metadata.
///
/// Maps to the `[project]` table of `jet-bundler.toml`.
///
/// # Examples
///
/// ```toml
/// [project]
/// group_id = "com.example"
/// artifact_id = "hello"
/// version = "1.2.0-SNAPSHOT"
/// inception_year = "2019"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSettings {
    /// Group identifier, e.g. `com.example`.
    ///
    /// Dependencies from a different group are treated as libraries and the vendor
    /// name defaults to its second segment.
    pub group_id: String,

    /// Artifact identifier.
    ///
    /// Required. Default for the product name, the final name and the execution
    /// profile name.
    pub artifact_id: String,

    /// Human readable project name.
    ///
    /// Default: the artifact id
    pub name: Option<String>,

    /// Project version passed to the installer backend.
    ///
    /// Default: `"1.0"`
    pub version: Option<String>,

    /// Base name of the produced archive or installer.
    ///
    /// Default: the artifact id
    pub final_name: Option<String>,

    /// First year of the copyright notice.
    ///
    /// Default: None (only the current year is used)
    pub inception_year: Option<String>,

    /// Organization name, used as vendor when `vendor` is not set.
    pub organization: Option<String>,

    /// Company name embedded in installers and version information.
    ///
    /// Default: the organization, else the second segment of the group id, capitalized
    pub vendor: Option<String>,

    /// Product name embedded in installers and version information.
    ///
    /// Default: the artifact id
    pub product: Option<String>,
}

const DEFAULT_VERSION: &str = "1.0";

impl PackageSettings {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.artifact_id)
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    pub fn final_name(&self) -> &str {
        self.final_name.as_deref().unwrap_or(&self.artifact_id)
    }

    pub fn product(&self) -> &str {
        self.product.as_deref().unwrap_or(&self.artifact_id)
    }

    /// Vendor name, derived from the group id when not configured.
    pub fn vendor(&self) -> String {
        if let Some(vendor) = self.vendor.as_deref().or(self.organization.as_deref()) {
            return vendor.to_string();
        }
        let segments: Vec<&str> = self.group_id.split('.').collect();
        let base = match segments.as_slice() {
            [_, second, ..] if !second.is_empty() => *second,
            [first, ..] if !first.is_empty() => *first,
            _ => self.artifact_id.as_str(),
        };
        capitalize(base)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(group_id: &str) -> PackageSettings {
        PackageSettings {
            group_id: group_id.into(),
            artifact_id: "hello".into(),
            ..Default::default()
        }
    }

    #[test]
    fn vendor_from_group_id() {
        assert_eq!(project("com.excelsiorjet.samples").vendor(), "Excelsiorjet");
        assert_eq!(project("acme").vendor(), "Acme");
        assert_eq!(project("").vendor(), "Hello");
    }

    #[test]
    fn explicit_vendor_wins() {
        let mut p = project("com.example");
        p.organization = Some("Example Org".into());
        assert_eq!(p.vendor(), "Example Org");
        p.vendor = Some("ACME".into());
        assert_eq!(p.vendor(), "ACME");
    }

    #[test]
    fn defaults_come_from_artifact_id() {
        let p = project("com.example");
        assert_eq!(p.final_name(), "hello");
        assert_eq!(p.product(), "hello");
        assert_eq!(p.name(), "hello");
        assert_eq!(p.version(), "1.0");
    }
}
