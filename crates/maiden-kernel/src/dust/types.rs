//! Listing types.
//!
//! These serialize directly into the JSON bodies of the dust API.

use serde::{Deserialize, Serialize};

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Base name of the child.
    pub name: String,
    /// Resource URL of the child.
    pub url: String,
    /// Present (and empty) for directories: expandable, not yet expanded.
    /// Absent for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Entry>>,
}

impl Entry {
    /// Entry for a regular file.
    pub fn file(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            children: None,
        }
    }

    /// Entry for a directory that has not been expanded.
    pub fn directory(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            children: Some(Vec::new()),
        }
    }

    /// Returns true if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.children.is_some()
    }
}

/// A directory and its immediate children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Resource name of the listed directory (`""` for the root).
    pub path: String,
    /// Resource URL of the listed directory.
    pub url: String,
    pub entries: Vec<Entry>,
}

impl Listing {
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }
}
