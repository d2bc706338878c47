//! Dust: the user data tree behind the REST API.
//!
//! Key components:
//!
//! - [`ResourcePath`] - resource name ↔ escaped URL under an API prefix
//! - [`DevicePath`] - resource name → absolute path, with containment
//! - [`listing::list`] - one-level directory listing
//! - [`mutate`] - create-directory, store-file, rename, delete
//! - [`DustStore`] - the resolver and codec bound together
//!
//! ## Design Decisions
//!
//! - **No index**: every call re-resolves and re-reads the filesystem.
//! - **Structural containment**: `..` is applied to segments before the
//!   root is joined, so escaping names never reach a syscall.
//! - **Rename stays put**: the new name is resolved against the parent of
//!   the old path, never the data root.

pub mod codec;
mod device;
mod error;
pub mod listing;
pub mod mutate;
mod store;
mod types;

pub use codec::{ResourcePath, encode, escape_segment};
pub use device::DevicePath;
pub use error::{DustError, DustResult};
pub use store::{DustStore, Resource};
pub use types::{Entry, Listing};
