//! Artifact checksums.
//!
//! Files are hashed in 8KB chunks. Directories (the plain `app/` image or a `.app`
//! bundle) are hashed as the sorted sequence of relative path and content of every
//! file they contain, so the result does not depend on traversal order.

use crate::{
    bail,
    bundler::{Result, error::ErrorExt, utils::fs::list_files},
};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Hex-encoded SHA-256 of a file or directory tree.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;

    let mut hasher = Sha256::new();
    if metadata.is_file() {
        hash_file(path, &mut hasher).await?;
    } else if metadata.is_dir() {
        for relative in list_files(path)? {
            hasher.update(relative.to_string_lossy().as_bytes());
            hash_file(&path.join(&relative), &mut hasher).await?;
        }
    } else {
        bail!("{} is neither a file nor a directory", path.display());
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Size in bytes of a file, or the sum over a directory tree.
pub async fn artifact_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut size = 0;
    for entry in walkdir::WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() {
            size += entry.metadata()?.len();
        }
    }
    Ok(size)
}

async fn hash_file(path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; 8192];
    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}
