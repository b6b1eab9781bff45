//! Builder for constructing Settings.

use super::{Packaging, Settings, migration::migrate};
use crate::bundler::error::{Context, Error, ErrorExt, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Loads `jet-bundler.toml` (or an in-memory source), migrates deprecated keys,
/// applies command line overrides, resolves relative paths and validates.
///
/// # Examples
///
/// ```no_run
/// use jet_bundler::bundler::{Packaging, SettingsBuilder};
///
/// # fn example() -> jet_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .config_file("jet-bundler.toml")
///     .packaging(Packaging::ExcelsiorInstaller)
///     .jet_home("/opt/jet11.3")
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Settings`] - The built settings struct
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    config_file: Option<PathBuf>,
    source: Option<String>,
    base_dir: Option<PathBuf>,
    jet_home: Option<String>,
    packaging: Option<Packaging>,
    output_dir: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads the configuration from a file. Relative paths in it are resolved against
    /// the file's directory unless [`base_dir`](Self::base_dir) is set.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses an in-memory TOML document instead of a file.
    pub fn source(mut self, toml: impl Into<String>) -> Self {
        self.source = Some(toml.into());
        self
    }

    /// Directory relative paths are resolved against.
    ///
    /// Default: the configuration file's directory, else the current directory
    pub fn base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Overrides `build.jet_home`.
    pub fn jet_home(mut self, jet_home: impl Into<String>) -> Self {
        self.jet_home = Some(jet_home.into());
        self
    }

    /// Overrides `build.packaging`.
    pub fn packaging(mut self, packaging: Packaging) -> Self {
        self.packaging = Some(packaging);
        self
    }

    /// Overrides `build.output_dir`.
    pub fn output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - neither a file nor a source was given, or the file cannot be read
    /// - the document is not valid TOML or has unknown keys
    /// - a deprecated key conflicts with its replacement
    /// - structural validation fails (missing artifact id or main jar, bad trial dates)
    pub fn build(self) -> Result<Settings> {
        let (source, default_base) = match (self.source, &self.config_file) {
            (Some(source), _) => (source, None),
            (None, Some(path)) => {
                let source = std::fs::read_to_string(path)
                    .fs_context("reading configuration", path)?;
                (source, path.parent().map(Path::to_path_buf))
            }
            (None, None) => {
                return Err(Error::Config(
                    "no configuration file or source given".into(),
                ));
            }
        };

        let base_dir = match self.base_dir.or(default_base) {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => std::env::current_dir().context("determining the current directory")?,
        };
        let base_dir = base_dir
            .absolutize()
            .fs_context("resolving configuration directory", &base_dir)?
            .into_owned();

        let mut table: toml::Table = toml::from_str(&source)?;
        let deprecations = migrate(&mut table)?;
        for notice in &deprecations {
            log::warn!("{notice}");
        }

        let mut settings: Settings = toml::Value::Table(table).try_into()?;
        settings.set_base_dir(base_dir, deprecations);

        if let Some(jet_home) = self.jet_home {
            settings.build.jet_home = Some(jet_home);
        }
        if let Some(packaging) = self.packaging {
            settings.build.packaging = packaging;
        }
        if let Some(output_dir) = self.output_dir {
            settings.build.output_dir = output_dir;
        }

        settings.resolve_paths();
        settings.apply_resource_defaults()?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{AppType, EulaEncoding};

    const MINIMAL: &str = r#"
        version = 1

        [project]
        group_id = "com.example"
        artifact_id = "hello"

        [build]
        main_jar = "target/hello.jar"
        main_class = "com.example.Hello"
    "#;

    #[test]
    fn minimal_configuration_gets_defaults() {
        let settings = SettingsBuilder::new()
            .source(MINIMAL)
            .base_dir("/work/hello")
            .build()
            .unwrap();
        assert_eq!(settings.build.packaging, Packaging::Zip);
        assert_eq!(settings.build.app_type, AppType::Plain);
        assert_eq!(
            settings.build.main_jar,
            PathBuf::from("/work/hello/target/hello.jar")
        );
        assert_eq!(settings.output_dir(), Path::new("/work/hello/target/jet"));
        assert_eq!(
            settings.usage_profile(),
            PathBuf::from("/work/hello/jetresources/hello.usg")
        );
        assert!(settings.windows_version_info.enabled);
        assert!(settings.app_bundle.high_resolution_capable);
        assert_eq!(settings.installer.eula_encoding, EulaEncoding::Autodetect);
        assert!(settings.deprecations().is_empty());
    }

    #[test]
    fn overrides_replace_file_values() {
        let settings = SettingsBuilder::new()
            .source(MINIMAL)
            .base_dir("/work/hello")
            .packaging(Packaging::None)
            .jet_home("/opt/jet")
            .output_dir("/tmp/out")
            .build()
            .unwrap();
        assert_eq!(settings.build.packaging, Packaging::None);
        assert_eq!(settings.build.jet_home.as_deref(), Some("/opt/jet"));
        assert_eq!(settings.output_dir(), Path::new("/tmp/out"));
    }

    #[test]
    fn deprecated_keys_are_migrated_and_reported() {
        let source = format!("{MINIMAL}\nwin_vi_description = \"Hello tool\"\n");
        let settings = SettingsBuilder::new()
            .source(source)
            .base_dir("/work")
            .build()
            .unwrap();
        assert_eq!(
            settings.windows_version_info.description.as_deref(),
            Some("Hello tool")
        );
        assert_eq!(settings.deprecations().len(), 1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let source = format!("{MINIMAL}\nno_such_option = true\n");
        assert!(
            SettingsBuilder::new()
                .source(source)
                .base_dir("/work")
                .build()
                .is_err()
        );
    }

    #[test]
    fn unknown_packaging_is_rejected() {
        let source = format!("{MINIMAL}\npackaging = \"tarball\"\n");
        assert!(
            SettingsBuilder::new()
                .source(source)
                .base_dir("/work")
                .build()
                .is_err()
        );
    }

    #[test]
    fn trial_version_is_validated() {
        let build = |trial: &str| {
            SettingsBuilder::new()
                .source(format!("{MINIMAL}\n[trial_version]\n{trial}\n"))
                .base_dir("/work")
                .build()
        };
        assert!(build("expire_in_days = 30\nexpire_message = \"expired\"").is_ok());
        assert!(build("expire_date = \"15Sep2025\"\nexpire_message = \"expired\"").is_ok());
        assert!(build("expire_date = \"2025-09-15\"\nexpire_message = \"expired\"").is_err());
        assert!(build("expire_in_days = 30").is_err());
        assert!(
            build("expire_in_days = 30\nexpire_date = \"15Sep2025\"\nexpire_message = \"x\"")
                .is_err()
        );
    }

    #[test]
    fn newer_format_is_rejected() {
        let source = MINIMAL.replace("version = 1", "version = 2");
        let err = SettingsBuilder::new()
            .source(source)
            .base_dir("/work")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("newer"), "{err}");
    }

    #[test]
    fn missing_main_jar_is_rejected() {
        let source = MINIMAL.replace("main_jar = \"target/hello.jar\"", "");
        assert!(
            SettingsBuilder::new()
                .source(source)
                .base_dir("/work")
                .build()
                .is_err()
        );
    }

    #[test]
    fn conventional_resources_are_picked_up_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("jetresources");
        std::fs::create_dir(&resources).unwrap();
        std::fs::write(resources.join("unicodeEula.txt"), [0xFF, 0xFE]).unwrap();
        std::fs::write(resources.join("icon.icns"), b"icns").unwrap();

        let settings = SettingsBuilder::new()
            .source(MINIMAL)
            .base_dir(dir.path())
            .build()
            .unwrap();
        assert_eq!(settings.installer.eula, Some(resources.join("unicodeEula.txt")));
        assert_eq!(settings.app_bundle.icon, Some(resources.join("icon.icns")));
        assert!(settings.installer.splash.is_none());
        assert!(settings.build.icon.is_none());

        let explicit = SettingsBuilder::new()
            .source(format!("{MINIMAL}\n[installer]\neula = \"license.txt\"\n"))
            .base_dir(dir.path())
            .build()
            .unwrap();
        assert_eq!(explicit.installer.eula, Some(dir.path().join("license.txt")));
    }

    #[test]
    fn two_conventional_eulas_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("jetresources");
        std::fs::create_dir(&resources).unwrap();
        std::fs::write(resources.join("eula.txt"), b"terms").unwrap();
        std::fs::write(resources.join("unicodeEula.txt"), [0xFF, 0xFE]).unwrap();

        let err = SettingsBuilder::new()
            .source(MINIMAL)
            .base_dir(dir.path())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unicodeEula.txt"), "{err}");
    }
}
