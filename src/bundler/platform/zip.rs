//! Zip packaging of the application image.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Compress `source_dir` into `target`, paths relative to `source_dir`.
///
/// On Unix each entry carries the file's permission bits so executables stay
/// executable after extraction.
pub async fn create_zip(source_dir: &Path, target: &Path) -> Result<()> {
    let source_dir = source_dir.to_path_buf();
    let target = target.to_path_buf();
    tokio::task::spawn_blocking(move || write_zip(&source_dir, &target))
        .await
        .map_err(|e| Error::GenericError(format!("zip task panicked: {e}")))?
}

fn write_zip(source_dir: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }
    let file = File::create(target).fs_context("creating zip archive", target)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in walkdir::WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source_dir)?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let name = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
            continue;
        }

        zip.start_file(name, options.unix_permissions(unix_mode(&entry.metadata()?)))?;
        let mut input = File::open(entry.path()).fs_context("opening file for zip", entry.path())?;
        std::io::copy(&mut input, &mut zip).fs_context("compressing", entry.path())?;
    }

    let mut writer = zip.finish()?;
    writer.flush().fs_context("writing zip archive", target)?;
    log::debug!("Wrote {}", target.display());
    Ok(())
}

#[cfg(unix)]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn unix_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}
