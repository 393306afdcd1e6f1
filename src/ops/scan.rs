//! Local module scanning.
//!
//! Walks the project's assets tree for assembly definitions belonging to
//! this project's own packages, keeps the manifest-owning kind (runtime
//! modules), and derives each owner's manifest path from the directory
//! convention.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};

use crate::core::{AssemblyDefinition, Project, DESCRIPTOR_EXTENSION};
use crate::util::fs;

/// Result of a local module scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Matched descriptors, in discovery order.
    pub descriptors: Vec<AssemblyDefinition>,

    /// Owner manifest paths, deduplicated, in discovery order.
    pub manifest_paths: Vec<PathBuf>,

    /// Module name -> owner manifest path.
    pub name_to_manifest: HashMap<String, PathBuf>,

    /// Owner manifest path -> index into `descriptors`. One entry per
    /// manifest: a package owns exactly one runtime module.
    pub manifest_to_descriptor: HashMap<PathBuf, usize>,
}

/// Scan `root` for this project's manifest-owning modules.
///
/// `name_prefix` restricts the scan to the project's own modules (an empty
/// prefix matches everything); `kind_suffix` selects the manifest-owning
/// module kind. Unparsable descriptors are silently skipped.
pub fn scan_local_modules(root: &Path, name_prefix: &str, kind_suffix: &str) -> Result<ScanOutcome> {
    ensure!(
        root.is_dir(),
        "assets directory not found: {}",
        root.display()
    );

    let mut outcome = ScanOutcome::default();

    for descriptor_path in fs::find_files_with_extension(root, DESCRIPTOR_EXTENSION) {
        let Ok(text) = fs::read_to_string(&descriptor_path) else {
            continue;
        };
        let Some(asm) = AssemblyDefinition::parse(&text) else {
            continue;
        };

        if !asm.name.starts_with(name_prefix) || !asm.has_kind_suffix(kind_suffix) {
            continue;
        }

        let Some(manifest_path) = Project::manifest_path_for(&descriptor_path) else {
            tracing::warn!(
                "descriptor {} has no package root, skipping",
                descriptor_path.display()
            );
            continue;
        };

        if outcome.manifest_to_descriptor.contains_key(&manifest_path) {
            tracing::warn!(
                "manifest {} already owned by another runtime module, skipping {}",
                manifest_path.display(),
                asm.name
            );
            continue;
        }

        if !outcome.manifest_paths.contains(&manifest_path) {
            outcome.manifest_paths.push(manifest_path.clone());
        }
        outcome
            .name_to_manifest
            .insert(asm.name.clone(), manifest_path.clone());
        outcome.descriptors.push(asm);
        outcome
            .manifest_to_descriptor
            .insert(manifest_path, outcome.descriptors.len() - 1);
    }

    tracing::debug!(
        "scanned {} runtime modules owning {} manifests",
        outcome.descriptors.len(),
        outcome.manifest_paths.len()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_descriptor(assets: &Path, package: &str, module: &str, references: &[&str]) {
        let dir = assets.join(package).join("Runtime");
        std::fs::create_dir_all(&dir).unwrap();
        let refs: Vec<String> = references.iter().map(|r| format!("\"{}\"", r)).collect();
        std::fs::write(
            dir.join(format!("{}.asmdef", module)),
            format!(
                r#"{{"name": "{}", "references": [{}]}}"#,
                module,
                refs.join(", ")
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_scan_collects_runtime_modules() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("Assets");
        write_descriptor(&assets, "Foo", "Acme.Foo.Runtime", &["Acme.Bar.Runtime"]);
        write_descriptor(&assets, "Bar", "Acme.Bar.Runtime", &[]);

        let outcome = scan_local_modules(&assets, "Acme.", ".Runtime").unwrap();

        assert_eq!(outcome.descriptors.len(), 2);
        assert_eq!(outcome.manifest_paths.len(), 2);
        assert_eq!(
            outcome.name_to_manifest["Acme.Foo.Runtime"],
            assets.join("Foo/package.json")
        );

        let idx = outcome.manifest_to_descriptor[&assets.join("Bar/package.json")];
        assert_eq!(outcome.descriptors[idx].name, "Acme.Bar.Runtime");
    }

    #[test]
    fn test_scan_skips_editor_modules() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("Assets");
        write_descriptor(&assets, "Foo", "Acme.Foo.Runtime", &[]);

        let editor_dir = assets.join("Foo/Editor");
        std::fs::create_dir_all(&editor_dir).unwrap();
        std::fs::write(
            editor_dir.join("Acme.Foo.Editor.asmdef"),
            r#"{"name": "Acme.Foo.Editor", "references": ["Acme.Foo.Runtime"]}"#,
        )
        .unwrap();

        let outcome = scan_local_modules(&assets, "Acme.", ".Runtime").unwrap();

        assert_eq!(outcome.descriptors.len(), 1);
        assert_eq!(outcome.descriptors[0].name, "Acme.Foo.Runtime");
        // One manifest entry, not two: the editor module does not own one.
        assert_eq!(outcome.manifest_paths, vec![assets.join("Foo/package.json")]);
    }

    #[test]
    fn test_scan_respects_name_prefix() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("Assets");
        write_descriptor(&assets, "Mine", "Acme.Mine.Runtime", &[]);
        write_descriptor(&assets, "Theirs", "Vendor.Theirs.Runtime", &[]);

        let outcome = scan_local_modules(&assets, "Acme.", ".Runtime").unwrap();

        assert_eq!(outcome.descriptors.len(), 1);
        assert_eq!(outcome.descriptors[0].name, "Acme.Mine.Runtime");
    }

    #[test]
    fn test_scan_empty_prefix_matches_all() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("Assets");
        write_descriptor(&assets, "Mine", "Acme.Mine.Runtime", &[]);
        write_descriptor(&assets, "Theirs", "Vendor.Theirs.Runtime", &[]);

        let outcome = scan_local_modules(&assets, "", ".Runtime").unwrap();
        assert_eq!(outcome.descriptors.len(), 2);
    }

    #[test]
    fn test_scan_skips_unparsable_descriptor() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("Assets");
        write_descriptor(&assets, "Good", "Acme.Good.Runtime", &[]);

        let bad_dir = assets.join("Bad/Runtime");
        std::fs::create_dir_all(&bad_dir).unwrap();
        std::fs::write(bad_dir.join("Acme.Bad.Runtime.asmdef"), "{ not json").unwrap();

        let outcome = scan_local_modules(&assets, "Acme.", ".Runtime").unwrap();

        assert_eq!(outcome.descriptors.len(), 1);
        assert_eq!(outcome.descriptors[0].name, "Acme.Good.Runtime");
    }

    #[test]
    fn test_scan_second_runtime_module_in_package_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("Assets");
        write_descriptor(&assets, "Foo", "Acme.FooA.Runtime", &[]);
        write_descriptor(&assets, "Foo", "Acme.FooB.Runtime", &[]);

        let outcome = scan_local_modules(&assets, "Acme.", ".Runtime").unwrap();

        assert_eq!(outcome.descriptors.len(), 1);
        assert_eq!(outcome.manifest_paths.len(), 1);
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_local_modules(&tmp.path().join("Assets"), "", ".Runtime").is_err());
    }
}
