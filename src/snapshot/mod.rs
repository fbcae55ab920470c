// src/snapshot/mod.rs

//! Modification-time snapshots of a directory tree.
//!
//! - [`walk`] discovers the regular files under the watch root.
//! - [`exclude`] compiles the optional exclusion globs applied to that walk.
//! - [`store`] owns the path → timestamp map and produces the changed paths
//!   of each check pass.

pub mod exclude;
pub mod store;
pub mod walk;

pub use exclude::ExcludeSet;
pub use store::{Changes, SnapshotStore};
pub use walk::{relative_str, walk_files};
