//! `.app` bundle creation.
//!
//! Layout:
//!
//! ```text
//! <fileName>.app/
//!   Contents/
//!     Info.plist
//!     MacOS/        application image written by xpack
//!     Resources/    icon
//! ```

use super::sign;
use crate::bundler::{
    context::Context,
    error::{Error, ErrorExt, Result},
    platform::{AppBundleOptions, PackagingRequest},
    process::ProcessRunner,
    toolchain::ToolInstallation,
    utils::fs::{copy_file_if_changed, create_dir_all, remove_dir_all},
};
use std::path::{Path, PathBuf};

/// Build the bundle, then sign it and wrap it in a `.pkg` when identities are known.
pub async fn bundle_project(
    request: &PackagingRequest,
    tool: &ToolInstallation,
    ctx: &Context,
) -> Result<Vec<PathBuf>> {
    let options = request
        .app_bundle
        .as_ref()
        .ok_or_else(|| Error::GenericError("application bundle options missing".into()))?;

    let bundle = &request.target;
    let contents = bundle.join("Contents");
    let macos_dir = contents.join("MacOS");
    let resources_dir = contents.join("Resources");

    log::info!("Creating application bundle {}", bundle.display());
    remove_dir_all(bundle).await?;
    create_dir_all(&resources_dir, false).await?;

    ProcessRunner::new(tool.packager())
        .args(&request.contents)
        .arg("-target")
        .arg(&macos_dir)
        .current_dir(&request.build_dir)
        .execute_checked(ctx, "packaging failed")
        .await?;

    let icon_file = match &options.icon {
        Some(icon) if icon.is_file() => {
            let name = icon
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| Error::Config(format!("{} has no file name", icon.display())))?;
            copy_file_if_changed(icon, &resources_dir.join(&name)).await?;
            Some(name)
        }
        Some(icon) => {
            ctx.warn(format!("Icon {} not found, bundle has no icon", icon.display()));
            None
        }
        None => None,
    };

    write_info_plist(&contents, &request.executable, options, icon_file.as_deref())?;

    let mut paths = vec![bundle.clone()];
    if let Some(developer_id) = &options.developer_id {
        sign::sign_bundle(bundle, developer_id, ctx).await?;
    }
    if let Some(publisher_id) = &options.publisher_id {
        let pkg = bundle.with_extension("pkg");
        if sign::build_pkg(bundle, &options.install_path, &pkg, publisher_id, ctx).await? {
            paths.push(pkg);
        }
    }
    Ok(paths)
}

/// Write `Contents/Info.plist`.
pub fn write_info_plist(
    contents: &Path,
    executable: &str,
    options: &AppBundleOptions,
    icon_file: Option<&str>,
) -> Result<()> {
    let mut dict = plist::Dictionary::new();
    dict.insert("CFBundleExecutable".into(), executable.into());
    dict.insert("CFBundleName".into(), options.bundle_name.as_str().into());
    dict.insert("CFBundleIdentifier".into(), options.identifier.as_str().into());
    dict.insert(
        "CFBundleShortVersionString".into(),
        options.short_version.as_str().into(),
    );
    dict.insert("CFBundleVersion".into(), options.version.as_str().into());
    dict.insert("CFBundlePackageType".into(), "APPL".into());
    if let Some(icon) = icon_file {
        dict.insert("CFBundleIconFile".into(), icon.into());
    }
    if options.high_resolution_capable {
        dict.insert("NSHighResolutionCapable".into(), true.into());
    }

    let path = contents.join("Info.plist");
    std::fs::create_dir_all(contents).fs_context("creating directory", contents)?;
    plist::Value::Dictionary(dict).to_file_xml(&path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AppBundleOptions {
        AppBundleOptions {
            bundle_name: "Hello".into(),
            identifier: "com.example.hello".into(),
            short_version: "1.0".into(),
            version: "1.0.7".into(),
            icon: None,
            high_resolution_capable: true,
            developer_id: None,
            publisher_id: None,
            install_path: "/Applications".into(),
        }
    }

    #[test]
    fn info_plist_has_bundle_keys() {
        let dir = tempfile::tempdir().unwrap();
        let contents = dir.path().join("Hello.app/Contents");
        write_info_plist(&contents, "Hello", &options(), Some("hello.icns")).unwrap();

        let value = plist::Value::from_file(contents.join("Info.plist")).unwrap();
        let dict = value.as_dictionary().unwrap();
        let string = |key: &str| dict.get(key).and_then(plist::Value::as_string).unwrap();
        assert_eq!(string("CFBundleExecutable"), "Hello");
        assert_eq!(string("CFBundleIdentifier"), "com.example.hello");
        assert_eq!(string("CFBundleShortVersionString"), "1.0");
        assert_eq!(string("CFBundleVersion"), "1.0.7");
        assert_eq!(string("CFBundleIconFile"), "hello.icns");
        assert_eq!(
            dict.get("NSHighResolutionCapable").and_then(plist::Value::as_boolean),
            Some(true)
        );
    }

    #[test]
    fn optional_keys_are_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let contents = dir.path().join("Contents");
        let options = AppBundleOptions {
            high_resolution_capable: false,
            ..options()
        };
        write_info_plist(&contents, "Hello", &options, None).unwrap();

        let value = plist::Value::from_file(contents.join("Info.plist")).unwrap();
        let dict = value.as_dictionary().unwrap();
        assert!(dict.get("CFBundleIconFile").is_none());
        assert!(dict.get("NSHighResolutionCapable").is_none());
    }
}
