//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use upm_sync::core::project::RUNTIME_SUFFIX;

/// upm-sync - keep UPM package manifests in sync with assembly definitions
#[derive(Parser)]
#[command(name = "upm-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Update dependencies (rewrites each package.json)
    Update(UpdateArgs),
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Project directory (defaults to the current directory; the project
    /// root is searched upward from here)
    pub path: Option<PathBuf>,

    /// Only consider modules whose name starts with this prefix
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Module-kind suffix that marks the manifest-owning module
    #[arg(long, default_value = RUNTIME_SUFFIX)]
    pub suffix: String,

    /// Seconds to wait for the package registry listing
    #[arg(long, default_value_t = 30)]
    pub registry_timeout: u64,
}
