//! Core data structures for upm-sync.
//!
//! This module contains the foundational types used throughout the tool:
//! - Assembly definitions (module descriptors)
//! - Package manifests and dependency entries
//! - Project layout conventions

pub mod descriptor;
pub mod manifest;
pub mod project;

pub use descriptor::{AssemblyDefinition, VersionDefine};
pub use manifest::{Author, DependencyEntry, ManifestError, PackageManifest};
pub use project::{
    Project, ProjectError, DESCRIPTOR_EXTENSION, MANIFEST_FILE_NAME, RUNTIME_SUFFIX,
};
