//! Directory listing.

use std::path::Path;

use tokio::fs;

use crate::dust::codec::ResourcePath;
use crate::dust::error::{DustError, DustResult};
use crate::dust::types::{Entry, Listing};

/// List the immediate children of the directory at `path`.
///
/// `name` is the resource name of the directory and is echoed back as the
/// listing's `path`. Child URLs come from `resources`, which must already
/// be rooted at this directory (see [`ResourcePath::child`]).
///
/// Entries are returned in the order the filesystem enumerates them.
pub async fn list(path: &Path, name: &str, resources: &ResourcePath) -> DustResult<Listing> {
    let meta = fs::metadata(path)
        .await
        .map_err(|e| DustError::from_io(e, path))?;
    if !meta.is_dir() {
        return Err(DustError::not_a_directory(path.display().to_string()));
    }

    let mut entries = Vec::new();
    let mut dir = fs::read_dir(path)
        .await
        .map_err(|e| DustError::from_io(e, path))?;

    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| DustError::from_io(e, path))?
    {
        let child = entry.file_name().to_string_lossy().into_owned();
        let url = resources.url(&child);

        let file_type = entry
            .file_type()
            .await
            .map_err(|e| DustError::from_io(e, &entry.path()))?;

        entries.push(if file_type.is_dir() {
            Entry::directory(child, url)
        } else {
            Entry::file(child, url)
        });
    }

    Ok(Listing {
        path: name.to_string(),
        url: resources.url(""),
        entries,
    })
}
