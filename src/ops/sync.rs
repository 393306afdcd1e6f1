//! Dependency resolution and manifest rewriting.
//!
//! For every owning manifest, walks its runtime module's references in
//! declared order, resolves each against the local scan first and the
//! external index second, rebuilds the manifest's dependency list from
//! scratch, and overwrites the file in the fixed serialization format.
//!
//! No failure here aborts the run: a manifest that cannot be loaded or
//! written is logged and skipped, and every other manifest still syncs.

use std::path::PathBuf;

use crate::core::{DependencyEntry, PackageManifest};
use crate::host::AssetRefresher;
use crate::ops::index::ExternalIndex;
use crate::ops::scan::ScanOutcome;
use crate::util::fs;

/// Counters and outputs of one resolve-and-write pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// References resolved to a dependency entry.
    pub found: usize,

    /// References examined.
    pub searched: usize,

    /// Manifests rewritten, in processing order.
    pub written: Vec<PathBuf>,
}

/// Resolve every scanned manifest's references and write the results back.
pub fn resolve_and_write(
    scan: &ScanOutcome,
    external: &ExternalIndex,
    refresher: &dyn AssetRefresher,
) -> SyncReport {
    // Load everything up front: resolution reads sibling manifests for
    // their name and version, so partial loading must be visible globally
    // before any file is rewritten.
    let mut manifests: Vec<PackageManifest> = Vec::new();
    for path in &scan.manifest_paths {
        match PackageManifest::load(path) {
            Ok(manifest) => manifests.push(manifest),
            Err(e) => tracing::error!(
                "error while loading {}: {:#}",
                path.display(),
                anyhow::Error::from(e)
            ),
        }
    }

    let mut report = SyncReport::default();

    for i in 0..manifests.len() {
        let filename = manifests[i].filename.clone();
        let Some(&descriptor_index) = scan.manifest_to_descriptor.get(&filename) else {
            tracing::error!("no descriptor recorded for {}", filename.display());
            continue;
        };

        let mut entries = Vec::new();
        for reference in &scan.descriptors[descriptor_index].references {
            report.searched += 1;

            // Local packages take precedence over external ones.
            if let Some(target_path) = scan.name_to_manifest.get(reference) {
                if let Some(target) = manifests.iter().find(|m| &m.filename == target_path) {
                    entries.push(DependencyEntry::new(
                        target.name.clone(),
                        target.version.clone(),
                    ));
                    report.found += 1;
                } else {
                    // Owner manifest failed to load. Counted as searched
                    // but not found, like any other unresolved reference.
                    tracing::debug!(
                        "reference {} owned by unloadable manifest {}",
                        reference,
                        target_path.display()
                    );
                }
            } else if let Some(package_ref) = external.get(reference) {
                let (name, version) = split_package_ref(package_ref);
                entries.push(DependencyEntry::new(name, version));
                report.found += 1;
            } else {
                tracing::debug!("no package found for reference {}", reference);
            }
        }

        manifests[i].dependencies = entries;

        let text = manifests[i].to_json_string() + "\n";
        if let Err(e) = fs::write_string(&filename, &text) {
            tracing::error!("error while writing {}: {:#}", filename.display(), e);
            continue;
        }
        if let Err(e) = refresher.refresh(&filename) {
            tracing::warn!("could not refresh {}: {:#}", filename.display(), e);
        }
        report.written.push(filename);
    }

    if report.found < report.searched {
        tracing::warn!(
            "Found {} packages for {} searched packages.",
            report.found,
            report.searched
        );
    }

    report
}

/// Split a `<name>@<version>` package reference. A missing version segment
/// yields an empty version.
fn split_package_ref(package_ref: &str) -> (&str, &str) {
    match package_ref.split_once('@') {
        Some((name, version)) => (name, version),
        None => (package_ref, ""),
    }
}
