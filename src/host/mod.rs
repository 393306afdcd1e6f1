//! Host environment interfaces.
//!
//! The tool touches its host through two narrow seams: a registry listing
//! the externally resolved packages, and a refresh hook fired after a
//! manifest is rewritten. Both are traits so tests can substitute fakes.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{bail, Context, Result};

/// One externally resolved package, as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    /// Install directory. Its last path segment encodes `<name>@<version>`.
    pub resolved_path: PathBuf,
}

/// Options for a registry listing.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Include transitively resolved packages, not only direct dependencies.
    pub include_indirect: bool,

    /// Include packages built into the host itself.
    pub include_builtin: bool,

    /// Abort the listing after this long. The caller fully blocks on the
    /// listing before doing any other work, so the timeout is the only
    /// way out of an unresponsive registry.
    pub timeout: Duration,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            include_indirect: true,
            include_builtin: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Registry of externally resolved packages.
pub trait PackageRegistry {
    /// List installed packages. Blocks until the listing completes or the
    /// timeout in `opts` expires.
    fn list_installed(&self, opts: &ListOptions) -> Result<Vec<InstalledPackage>>;
}

/// Registry backed by the project's `Library/PackageCache` directory.
///
/// The cache holds the full transitive set of resolved packages and never
/// holds built-in host modules, which matches the one listing shape the
/// tool asks for (indirect included, builtins excluded).
#[derive(Debug, Clone)]
pub struct PackageCache {
    cache_dir: PathBuf,
}

impl PackageCache {
    pub fn new(cache_dir: PathBuf) -> Self {
        PackageCache { cache_dir }
    }
}

impl PackageRegistry for PackageCache {
    fn list_installed(&self, opts: &ListOptions) -> Result<Vec<InstalledPackage>> {
        if !opts.include_indirect || opts.include_builtin {
            tracing::debug!(
                "package cache always lists the transitive set without builtins; \
                 requested options are ignored"
            );
        }

        let dir = self.cache_dir.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(enumerate_cache(&dir));
        });

        match rx.recv_timeout(opts.timeout) {
            Ok(result) => result,
            Err(_) => bail!(
                "timed out after {:?} listing {}",
                opts.timeout,
                self.cache_dir.display()
            ),
        }
    }
}

fn enumerate_cache(dir: &Path) -> Result<Vec<InstalledPackage>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read package cache: {}", dir.display()))?;

    let mut packages = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            packages.push(InstalledPackage {
                resolved_path: entry.path(),
            });
        }
    }

    packages.sort_by(|a, b| a.resolved_path.cmp(&b.resolved_path));
    Ok(packages)
}

/// Hook invoked after a manifest file is rewritten so the host picks the
/// change up.
pub trait AssetRefresher {
    fn refresh(&self, path: &Path) -> Result<()>;
}

/// Refresher that bumps the file's modification time. The editor re-imports
/// changed assets on its next refresh pass, keyed off the timestamp, so a
/// rewrite that happens to produce identical bytes is still observed.
#[derive(Debug, Clone, Default)]
pub struct FsRefresher;

impl AssetRefresher for FsRefresher {
    fn refresh(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open for refresh: {}", path.display()))?;
        file.set_modified(SystemTime::now())
            .with_context(|| format!("failed to refresh: {}", path.display()))?;
        Ok(())
    }
}
