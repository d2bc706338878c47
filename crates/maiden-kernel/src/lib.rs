//! # maiden-kernel
//!
//! Resource path resolution and filesystem mutation for the maiden dust
//! API.
//!
//! A client names a resource with a `/`-separated path relative to the data
//! root. The kernel:
//! - Resolves that name to a device path that never leaves the root
//! - Lists directories one level deep, with child URLs
//! - Creates directories, stores files, renames, and deletes
//! - Maps names back to percent-escaped resource URLs
//!
//! HTTP concerns (status codes, multipart, routing) live in
//! `maiden-server`.

pub mod dust;

pub use dust::{
    DevicePath, DustError, DustResult, DustStore, Entry, Listing, Resource,
    ResourcePath,
};
