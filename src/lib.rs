//! upm-sync - keep UPM package manifests in sync with assembly definitions
//!
//! This crate provides the core library functionality for upm-sync:
//! indexing externally resolved packages, scanning a project's own
//! assembly definitions, and rewriting each package manifest's dependency
//! list from the references its runtime module declares.

pub mod core;
pub mod host;
pub mod ops;
pub mod util;

pub use core::{
    descriptor::AssemblyDefinition, manifest::DependencyEntry, manifest::PackageManifest,
    project::Project,
};

pub use host::{AssetRefresher, FsRefresher, ListOptions, PackageCache, PackageRegistry};
pub use ops::{build_external_index, resolve_and_write, scan_local_modules, SyncReport};
