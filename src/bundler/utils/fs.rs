//! File system utilities for staging and packaging.
//!
//! Copies are incremental: a destination whose modification time equals the
//! source's is left alone, and every copy stamps the source's modification time
//! onto the destination so that the next run finds nothing to do.

use crate::bundler::error::{Error, ErrorExt, Result};
use filetime::FileTime;
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Copies a regular file unless the destination already has the source's
/// modification time. Returns whether a copy happened.
///
/// Fails if the source path is not a file.
pub async fn copy_file_if_changed(from: &Path, to: &Path) -> Result<bool> {
    let from = from.to_path_buf();
    let to = to.to_path_buf();
    tokio::task::spawn_blocking(move || copy_if_changed_blocking(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("file copy task panicked: {e}")))?
}

/// Recursively copies a directory, skipping files that are already up to date.
/// Returns the number of files copied.
///
/// Fails if the source path is not a directory.
pub async fn copy_dir_if_changed(from: &Path, to: &Path) -> Result<usize> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<usize> {
        std::fs::create_dir_all(&to).fs_context("creating directory", &to)?;

        let mut copied = 0;
        for entry in walkdir::WalkDir::new(&from).follow_links(true) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)
                    .fs_context("creating directory", &dest_path)?;
            } else if copy_if_changed_blocking(entry.path(), &dest_path)? {
                copied += 1;
            }
        }
        Ok(copied)
    })
    .await
    .map_err(|e| Error::GenericError(format!("directory copy task panicked: {e}")))?
}

fn copy_if_changed_blocking(from: &Path, to: &Path) -> Result<bool> {
    let source = std::fs::metadata(from).fs_context("reading metadata of", from)?;
    if !source.is_file() {
        return Err(Error::GenericError(format!(
            "{} is not a file",
            from.display()
        )));
    }
    let source_mtime = FileTime::from_last_modification_time(&source);

    if let Ok(existing) = std::fs::metadata(to)
        && existing.is_file()
        && FileTime::from_last_modification_time(&existing) == source_mtime
    {
        return Ok(false);
    }

    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }
    std::fs::copy(from, to).fs_context("copying to", to)?;
    filetime::set_file_mtime(to, source_mtime).fs_context("setting modification time of", to)?;
    Ok(true)
}

/// Lists the regular files under `dir`, relative to it, in sorted order.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.path().strip_prefix(dir)?.to_path_buf());
        }
    }
    Ok(files)
}
