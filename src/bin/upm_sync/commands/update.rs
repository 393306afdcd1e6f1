//! `upm-sync update` command

use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::UpdateArgs;
use upm_sync::host::{FsRefresher, ListOptions, PackageCache};
use upm_sync::ops::{build_external_index, resolve_and_write, scan_local_modules};
use upm_sync::util::fs;
use upm_sync::Project;

pub fn execute(args: UpdateArgs) -> Result<()> {
    let start = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let project = Project::find(&start)?;

    let registry = PackageCache::new(project.package_cache_dir());
    let list_opts = ListOptions {
        timeout: Duration::from_secs(args.registry_timeout),
        ..ListOptions::default()
    };

    let external = build_external_index(&registry, &list_opts);
    let scan = scan_local_modules(&project.assets_dir(), &args.prefix, &args.suffix)?;
    let report = resolve_and_write(&scan, &external, &FsRefresher);

    for path in &report.written {
        tracing::info!(
            "updated {}",
            fs::relative_path(project.root(), path).display()
        );
    }

    eprintln!(
        "    Updated {} manifests ({} of {} references resolved)",
        report.written.len(),
        report.found,
        report.searched
    );

    Ok(())
}
