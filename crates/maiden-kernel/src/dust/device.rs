//! Device path resolution.
//!
//! Turns a client-supplied resource name into an absolute path under the
//! data root. Normalization is structural: the name is split into segments
//! and `..` pops a segment, so containment is decided before any filesystem
//! call is made.

use std::path::{Component, Path, PathBuf};

use crate::dust::error::{DustError, DustResult};

/// Resolver rooted at the data directory.
///
/// For example, if `root` is `/home/we/dust`, then `resolve("code/x.lua")`
/// is `/home/we/dust/code/x.lua` and `resolve("../etc")` is an
/// `InvalidPath` error.
#[derive(Debug, Clone)]
pub struct DevicePath {
    root: PathBuf,
}

impl DevicePath {
    /// Create a resolver for the given data root.
    ///
    /// The root is canonicalized at construction time when it exists, so a
    /// symlinked root (e.g. macOS `/tmp` → `/private/tmp`) still compares
    /// equal to the paths produced from it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        let root = dunce::canonicalize(&root).unwrap_or(root);
        Self { root }
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalize a resource name into its canonical `/`-joined form.
    ///
    /// The empty string denotes the root.
    pub fn normalize(&self, name: &str) -> DustResult<String> {
        Ok(segments(name)?.join("/"))
    }

    /// Resolve a resource name to an absolute path within the root.
    pub fn resolve(&self, name: &str) -> DustResult<PathBuf> {
        let mut path = self.root.clone();
        path.extend(segments(name)?);
        Ok(path)
    }

    /// Resolve the base name `new_name` in the directory containing `path`.
    ///
    /// Returns the resource name and device path of the target. `new_name`
    /// must be a single plain segment; the root itself has no parent to
    /// rename within.
    pub fn resolve_sibling(&self, path: &Path, new_name: &str) -> DustResult<(String, PathBuf)> {
        if new_name.contains('\0') || !is_plain(new_name) {
            return Err(DustError::invalid_path(new_name));
        }

        let current = self.name_of(path)?;
        let Some((parent, _)) = split_last(&current) else {
            return Err(DustError::invalid_path("cannot rename the data root"));
        };

        let name = if parent.is_empty() {
            new_name.to_string()
        } else {
            format!("{parent}/{new_name}")
        };
        let target = self.resolve(&name)?;
        Ok((name, target))
    }

    /// Map a device path under the root back to its resource name.
    pub fn name_of(&self, path: &Path) -> DustResult<String> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| DustError::invalid_path(path.display().to_string()))?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return Err(DustError::invalid_path(path.display().to_string())),
            }
        }
        Ok(parts.join("/"))
    }

    /// Whether `path` is the data root itself.
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }
}

/// Split `name` into plain segments, applying `.` and `..`.
fn segments(name: &str) -> DustResult<Vec<&str>> {
    let mut out: Vec<&str> = Vec::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if out.pop().is_none() {
                    return Err(DustError::invalid_path(format!("{name} escapes the data root")));
                }
            }
            _ => {
                if segment.contains('\0') || !is_plain(segment) {
                    return Err(DustError::invalid_path(name));
                }
                out.push(segment);
            }
        }
    }
    Ok(out)
}

/// A segment must be exactly one normal component on this platform, which
/// rules out `\` separators and drive prefixes on Windows.
fn is_plain(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == segment
    )
}

fn split_last(name: &str) -> Option<(&str, &str)> {
    if name.is_empty() {
        return None;
    }
    Some(name.rsplit_once('/').unwrap_or(("", name)))
}
