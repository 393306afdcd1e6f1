//! Project - the Unity project tree the tool operates on.
//!
//! A Project anchors the fixed directory conventions: local modules live
//! under `Assets/`, externally resolved packages under
//! `Library/PackageCache/`, and every local package keeps its manifest two
//! path segments above its runtime assembly definition.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// File name of a package manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// File extension of an assembly definition.
pub const DESCRIPTOR_EXTENSION: &str = "asmdef";

/// Module-kind suffix of manifest-owning modules.
pub const RUNTIME_SUFFIX: &str = ".Runtime";

/// Error locating a project root.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no Unity project found at or above {dir} (missing Assets directory)")]
    NotFound { dir: String },
}

/// A located Unity project.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing `Assets/`.
    root: PathBuf,
}

impl Project {
    /// Open a project rooted at `root` without searching upward.
    pub fn at(root: &Path) -> Result<Self, ProjectError> {
        if root.join("Assets").is_dir() {
            Ok(Project {
                root: root.to_path_buf(),
            })
        } else {
            Err(ProjectError::NotFound {
                dir: root.display().to_string(),
            })
        }
    }

    /// Find the project root at `start` or the nearest ancestor.
    pub fn find(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start.to_path_buf();
        loop {
            if current.join("Assets").is_dir() {
                return Ok(Project { root: current });
            }
            if !current.pop() {
                return Err(ProjectError::NotFound {
                    dir: start.display().to_string(),
                });
            }
        }
    }

    /// Get the project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the local assets tree scanned for assembly definitions.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("Assets")
    }

    /// Get the directory holding resolved external packages, one
    /// `<name>@<version>` directory per package.
    pub fn package_cache_dir(&self) -> PathBuf {
        self.root.join("Library").join("PackageCache")
    }

    /// Derive the owning manifest path for a descriptor file.
    ///
    /// Layout convention, not configurable per descriptor:
    ///
    /// ```text
    /// PluginName
    /// |- package.json
    /// |- Editor
    /// |  |- CompanyName.PluginName.Editor.asmdef
    /// |- Runtime
    ///    |- CompanyName.PluginName.Runtime.asmdef
    /// ```
    ///
    /// Returns None for a descriptor too shallow to have a package root.
    pub fn manifest_path_for(descriptor_path: &Path) -> Option<PathBuf> {
        descriptor_path
            .parent()
            .and_then(Path::parent)
            .map(|package_root| package_root.join(MANIFEST_FILE_NAME))
    }
}
