//! Mutating operations on resolved device paths.
//!
//! Every function takes a path that has already been through
//! [`DevicePath::resolve`]. Nothing here is atomic across calls: the
//! existence checks in [`rename`] and [`delete`] race with concurrent
//! requests, the same way a stat followed by a syscall always does.

use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::dust::device::DevicePath;
use crate::dust::error::{DustError, DustResult};

/// Create a directory and any missing ancestors.
///
/// Succeeds if the directory already exists. Fails with `Io` if something
/// that is not a directory is in the way.
pub async fn create_dir(path: &Path) -> DustResult<()> {
    debug!(path = %path.display(), "create directory");
    fs::create_dir_all(path)
        .await
        .map_err(|e| DustError::io(e, path))
}

/// Write `content` to `path`, creating or truncating the file.
///
/// The parent directory must already exist.
pub async fn store_file(path: &Path, content: &[u8]) -> DustResult<()> {
    debug!(path = %path.display(), size = content.len(), "store file");
    fs::write(path, content)
        .await
        .map_err(|e| DustError::io(e, path))
}

/// Rename the resource at `path` to the base name `new_name` within the
/// same parent directory.
///
/// Returns the resource name of the target. The source is checked before
/// the new name, so a missing source reports `NotFound` even when the new
/// name is also missing. A name that would move the resource (`..`, `.` or
/// anything containing `/`) is a `BadRequest`.
pub async fn rename(device: &DevicePath, path: &Path, new_name: Option<&str>) -> DustResult<String> {
    fs::symlink_metadata(path)
        .await
        .map_err(|e| DustError::from_io(e, path))?;

    let new_name = match new_name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(DustError::bad_request("missing 'name' key in form")),
    };
    if matches!(new_name, "." | "..") || new_name.contains('/') {
        return Err(DustError::bad_request(format!(
            "'{new_name}' is not a base name"
        )));
    }

    let (name, target) = device.resolve_sibling(path, new_name)?;
    debug!(from = %path.display(), to = %target.display(), "rename");

    fs::rename(path, &target)
        .await
        .map_err(|e| DustError::io(e, path))?;
    Ok(name)
}

/// Remove the file or directory tree at `path`.
///
/// A failure part way through a tree leaves whatever was already removed
/// removed.
pub async fn delete(device: &DevicePath, path: &Path) -> DustResult<()> {
    if device.is_root(path) {
        return Err(DustError::invalid_path("cannot delete the data root"));
    }

    let meta = fs::symlink_metadata(path)
        .await
        .map_err(|e| DustError::from_io(e, path))?;

    debug!(path = %path.display(), dir = meta.is_dir(), "delete");
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    removed.map_err(|e| DustError::io(e, path))
}
