//! High-level operations.
//!
//! This module contains the three stages of the sync pipeline, run in
//! strict sequence: index external packages, scan local modules, resolve
//! and rewrite manifests.

pub mod index;
pub mod scan;
pub mod sync;

pub use index::{build_external_index, ExternalIndex};
pub use scan::{scan_local_modules, ScanOutcome};
pub use sync::{resolve_and_write, SyncReport};
