//! External package indexing.
//!
//! Scans every externally resolved package for assembly definitions and
//! maps each module name to the `<packageName>@<version>` directory name
//! of the package that ships it. The index is rebuilt on every run and
//! discarded afterwards.

use std::collections::HashMap;
use std::path::Path;

use crate::core::{AssemblyDefinition, DESCRIPTOR_EXTENSION};
use crate::host::{ListOptions, PackageRegistry};
use crate::util::fs;

/// Module name -> `<packageName>@<version>` of the shipping package.
pub type ExternalIndex = HashMap<String, String>;

/// Build the module-name index over all installed external packages.
///
/// A registry failure is not fatal: the run proceeds with an empty index
/// and simply resolves fewer references, which the final found/searched
/// report surfaces.
pub fn build_external_index(registry: &dyn PackageRegistry, opts: &ListOptions) -> ExternalIndex {
    let packages = match registry.list_installed(opts) {
        Ok(packages) => packages,
        Err(e) => {
            tracing::warn!("could not retrieve the package list: {:#}", e);
            return ExternalIndex::new();
        }
    };

    let mut index = ExternalIndex::new();
    for package in &packages {
        let Some(package_ref) = last_path_segment(&package.resolved_path) else {
            tracing::debug!(
                "skipping package with unusable path: {}",
                package.resolved_path.display()
            );
            continue;
        };

        for descriptor_path in
            fs::find_files_with_extension(&package.resolved_path, DESCRIPTOR_EXTENSION)
        {
            let Ok(text) = fs::read_to_string(&descriptor_path) else {
                continue;
            };
            let Some(asm) = AssemblyDefinition::parse(&text) else {
                continue;
            };

            // Two installed packages shipping the same module name is a
            // host misconfiguration; keep the first one seen.
            if let Some(existing) = index.get(&asm.name) {
                tracing::debug!(
                    "module {} already indexed from {}, ignoring copy in {}",
                    asm.name,
                    existing,
                    package_ref
                );
                continue;
            }
            index.insert(asm.name, package_ref.clone());
        }
    }

    tracing::debug!("indexed {} external modules", index.len());
    index
}

fn last_path_segment(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InstalledPackage;
    use anyhow::{bail, Result};
    use tempfile::TempDir;

    struct FakeRegistry {
        packages: Vec<InstalledPackage>,
    }

    impl PackageRegistry for FakeRegistry {
        fn list_installed(&self, _opts: &ListOptions) -> Result<Vec<InstalledPackage>> {
            Ok(self.packages.clone())
        }
    }

    struct FailingRegistry;

    impl PackageRegistry for FailingRegistry {
        fn list_installed(&self, _opts: &ListOptions) -> Result<Vec<InstalledPackage>> {
            bail!("registry offline")
        }
    }

    fn install_package(root: &Path, dir_name: &str, modules: &[&str]) -> InstalledPackage {
        let package_dir = root.join(dir_name);
        for module in modules {
            let module_dir = package_dir.join("Runtime");
            std::fs::create_dir_all(&module_dir).unwrap();
            std::fs::write(
                module_dir.join(format!("{}.asmdef", module)),
                format!(r#"{{"name": "{}"}}"#, module),
            )
            .unwrap();
        }
        InstalledPackage {
            resolved_path: package_dir,
        }
    }

    #[test]
    fn test_index_maps_module_to_package_ref() {
        let tmp = TempDir::new().unwrap();
        let registry = FakeRegistry {
            packages: vec![
                install_package(tmp.path(), "com.vendor.somelib@3.2.0", &["SomeLib.Runtime"]),
                install_package(
                    tmp.path(),
                    "com.vendor.other@1.0.0",
                    &["Other.Runtime", "Other.Editor"],
                ),
            ],
        };

        let index = build_external_index(&registry, &ListOptions::default());

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get("SomeLib.Runtime").map(String::as_str),
            Some("com.vendor.somelib@3.2.0")
        );
        assert_eq!(
            index.get("Other.Editor").map(String::as_str),
            Some("com.vendor.other@1.0.0")
        );
    }

    #[test]
    fn test_registry_failure_yields_empty_index() {
        let index = build_external_index(&FailingRegistry, &ListOptions::default());
        assert!(index.is_empty());
    }

    #[test]
    fn test_unparsable_descriptor_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let package = install_package(tmp.path(), "com.vendor.lib@1.0.0", &["Lib.Runtime"]);
        std::fs::write(
            package.resolved_path.join("Runtime/Broken.asmdef"),
            "not json",
        )
        .unwrap();

        let registry = FakeRegistry {
            packages: vec![package],
        };
        let index = build_external_index(&registry, &ListOptions::default());

        assert_eq!(index.len(), 1);
        assert!(index.contains_key("Lib.Runtime"));
    }

    #[test]
    fn test_duplicate_module_name_keeps_first() {
        let tmp = TempDir::new().unwrap();
        let registry = FakeRegistry {
            packages: vec![
                install_package(tmp.path(), "com.vendor.a@1.0.0", &["Shared.Runtime"]),
                install_package(tmp.path(), "com.vendor.b@2.0.0", &["Shared.Runtime"]),
            ],
        };

        let index = build_external_index(&registry, &ListOptions::default());

        assert_eq!(
            index.get("Shared.Runtime").map(String::as_str),
            Some("com.vendor.a@1.0.0")
        );
    }
}
