//! Deprecated configuration keys.
//!
//! Older configurations kept every option flat in `[build]`. Each deprecated key is
//! moved to its canonical location before deserialization. Setting both the
//! deprecated and the canonical key is an error.

use crate::bundler::error::{Error, Result};
use toml::{Table, Value};

/// One deprecated key and where its value now lives. Keys are dotted table paths.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub deprecated: &'static str,
    pub canonical: &'static str,
}

const fn moved(deprecated: &'static str, canonical: &'static str) -> Migration {
    Migration {
        deprecated,
        canonical,
    }
}

pub const MIGRATIONS: &[Migration] = &[
    moved("build.jet_output_dir", "build.output_dir"),
    moved("build.add_windows_version_info", "windows_version_info.enabled"),
    moved("build.win_vi_version", "windows_version_info.version"),
    moved("build.win_vi_copyright", "windows_version_info.copyright"),
    moved("build.win_vi_description", "windows_version_info.description"),
    moved("build.vendor", "project.vendor"),
    moved("build.product", "project.product"),
    moved("build.eula", "installer.eula"),
    moved("build.installer_splash", "installer.splash"),
    moved("build.osx_bundle_file_name", "app_bundle.file_name"),
    moved("build.osx_bundle_name", "app_bundle.bundle_name"),
    moved("build.osx_bundle_identifier", "app_bundle.identifier"),
    moved("build.osx_bundle_short_version", "app_bundle.short_version"),
    moved("build.osx_bundle_version", "app_bundle.version"),
    moved("build.osx_bundle_icon", "app_bundle.icon"),
    moved("build.osx_developer_id", "app_bundle.developer_id"),
    moved("build.osx_publisher_id", "app_bundle.publisher_id"),
    moved("build.detach_components", "runtime.slim_down.detach_components"),
    moved("build.detached_base_url", "runtime.slim_down.detached_base_url"),
    moved("build.detached_package", "runtime.slim_down.detached_package"),
    moved("build.tomcat_home", "tomcat.tomcat_home"),
];

const UNICODE_EULA: &str = "installer.unicode_eula";
const EULA: &str = "installer.eula";
const EULA_ENCODING: &str = "installer.eula_encoding";
const UTF_16LE: &str = "UTF-16LE";

/// Move deprecated keys to their canonical place.
///
/// Returns one deprecation notice per migrated key.
pub fn migrate(table: &mut Table) -> Result<Vec<String>> {
    let mut notices = Vec::new();

    for migration in MIGRATIONS {
        let Some(value) = take(table, migration.deprecated) else {
            continue;
        };
        if get(table, migration.canonical).is_some() {
            return Err(Error::Config(format!(
                "both `{}` and `{}` are set, remove the deprecated `{}`",
                migration.deprecated, migration.canonical, migration.deprecated
            )));
        }
        insert(table, migration.canonical, value)?;
        notices.push(format!(
            "`{}` is deprecated, use `{}`",
            migration.deprecated, migration.canonical
        ));
    }

    if let Some(value) = take(table, UNICODE_EULA) {
        if get(table, EULA).is_some() {
            return Err(Error::Config(
                "both `installer.eula` and `installer.unicode_eula` are set".to_string(),
            ));
        }
        if let Some(encoding) = get(table, EULA_ENCODING)
            && encoding.as_str() != Some(UTF_16LE)
        {
            return Err(Error::Config(format!(
                "`installer.unicode_eula` conflicts with `installer.eula_encoding = {encoding}`"
            )));
        }
        insert(table, EULA, value)?;
        insert(table, EULA_ENCODING, Value::String(UTF_16LE.to_string()))?;
        notices.push(format!(
            "`{UNICODE_EULA}` is deprecated, use `{EULA}` with `eula_encoding = \"{UTF_16LE}\"`"
        ));
    }

    Ok(notices)
}

fn get<'a>(table: &'a Table, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.').peekable();
    let mut current = table;
    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(value);
        }
        current = value.as_table()?;
    }
    None
}

fn take(table: &mut Table, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => table.remove(path),
        Some((head, rest)) => take(table.get_mut(head)?.as_table_mut()?, rest),
    }
}

fn insert(table: &mut Table, path: &str, value: Value) -> Result<()> {
    match path.split_once('.') {
        None => {
            table.insert(path.to_string(), value);
            Ok(())
        }
        Some((head, rest)) => {
            let child = table
                .entry(head.to_string())
                .or_insert(Value::Table(Table::new()));
            match child.as_table_mut() {
                Some(child) => insert(child, rest, value),
                None => Err(Error::Config(format!("`{head}` must be a table"))),
            }
        }
    }
}
