//! The dust store: one data root, one URL prefix.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::dust::codec::ResourcePath;
use crate::dust::device::DevicePath;
use crate::dust::error::{DustError, DustResult};
use crate::dust::types::Listing;
use crate::dust::{listing, mutate};

/// What a resource name turned out to be on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// A directory; list it with [`DustStore::list`].
    Directory(PathBuf),
    /// Anything else; the caller streams it from this path.
    File(PathBuf),
}

/// Binds a [`DevicePath`] resolver to a [`ResourcePath`] codec.
///
/// Holds no other state: every call re-resolves the name and re-reads the
/// filesystem, so a `DustStore` can be shared freely between requests.
#[derive(Debug, Clone)]
pub struct DustStore {
    device: DevicePath,
    resources: ResourcePath,
}

impl DustStore {
    pub fn new(data_dir: impl Into<PathBuf>, prefix: impl AsRef<str>) -> Self {
        Self {
            device: DevicePath::new(data_dir),
            resources: ResourcePath::new(prefix),
        }
    }

    pub fn device(&self) -> &DevicePath {
        &self.device
    }

    pub fn resources(&self) -> &ResourcePath {
        &self.resources
    }

    pub fn root(&self) -> &Path {
        self.device.root()
    }

    /// Resolve a resource name to its device path.
    pub fn resolve(&self, name: &str) -> DustResult<PathBuf> {
        self.device.resolve(name)
    }

    /// Resource URL of a resource name.
    pub fn url(&self, name: &str) -> String {
        self.resources.url(name)
    }

    /// List the directory named `name` (`""` for the root).
    pub async fn list(&self, name: &str) -> DustResult<Listing> {
        let name = self.device.normalize(name)?;
        let path = self.device.resolve(&name)?;
        listing::list(&path, &name, &self.resources.child(&name)).await
    }

    /// Find out whether `name` is a directory or a file.
    pub async fn stat(&self, name: &str) -> DustResult<Resource> {
        let path = self.device.resolve(name)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| DustError::from_io(e, &path))?;

        if meta.is_dir() {
            Ok(Resource::Directory(path))
        } else {
            Ok(Resource::File(path))
        }
    }

    pub async fn create_dir(&self, name: &str) -> DustResult<PathBuf> {
        let path = self.device.resolve(name)?;
        mutate::create_dir(&path).await?;
        Ok(path)
    }

    pub async fn store_file(&self, name: &str, content: &[u8]) -> DustResult<PathBuf> {
        let path = self.device.resolve(name)?;
        mutate::store_file(&path, content).await?;
        Ok(path)
    }

    /// Rename `name` within its parent directory and return the new
    /// resource URL.
    pub async fn rename(&self, name: &str, new_name: Option<&str>) -> DustResult<String> {
        let path = self.device.resolve(name)?;
        let renamed = mutate::rename(&self.device, &path, new_name).await?;
        Ok(self.resources.url(&renamed))
    }

    pub async fn delete(&self, name: &str) -> DustResult<PathBuf> {
        let path = self.device.resolve(name)?;
        mutate::delete(&self.device, &path).await?;
        Ok(path)
    }
}
