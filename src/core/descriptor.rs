//! Assembly definition (`.asmdef`) parsing and schema.
//!
//! An assembly definition declares one compilation module: its unique name
//! and the names of the modules it references. Everything else on the file
//! is metadata the resolver carries along but never interprets.

use serde::Deserialize;

/// A parsed `.asmdef` file.
///
/// References are kept in declared order; the resolver relies on that order
/// when it rebuilds a manifest's dependency list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyDefinition {
    /// Unique module name (e.g. `FredericRP.ObjectPool.Runtime`).
    pub name: String,

    #[serde(default)]
    pub root_namespace: Option<String>,

    /// Names of modules this one depends on, in declared order.
    #[serde(default)]
    pub references: Vec<String>,

    #[serde(default)]
    pub include_platforms: Vec<String>,

    #[serde(default)]
    pub exclude_platforms: Vec<String>,

    #[serde(default)]
    pub allow_unsafe_code: bool,

    #[serde(default)]
    pub override_references: bool,

    #[serde(default)]
    pub precompiled_references: Vec<String>,

    #[serde(default = "default_true")]
    pub auto_referenced: bool,

    #[serde(default)]
    pub define_constraints: Vec<String>,

    #[serde(default)]
    pub version_defines: Vec<VersionDefine>,

    #[serde(default)]
    pub no_engine_references: bool,

    #[serde(default)]
    pub optional_unity_references: Vec<String>,
}

/// A conditional compile define tied to a package version expression.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionDefine {
    pub name: String,
    pub expression: String,
    pub define: String,
}

fn default_true() -> bool {
    true
}

impl AssemblyDefinition {
    /// Parse a descriptor from its JSON text.
    ///
    /// A descriptor that fails to parse is treated as absent: the scanner
    /// and the indexer both skip it rather than aborting the run.
    pub fn parse(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(asm) => Some(asm),
            Err(e) => {
                tracing::debug!("skipping unparsable assembly definition: {}", e);
                None
            }
        }
    }

    /// Whether this module's name marks it as the manifest-owning kind.
    ///
    /// Editor modules are deliberately not manifest-owning: each package
    /// already contributes its runtime module, and counting both would
    /// register the package twice.
    pub fn has_kind_suffix(&self, suffix: &str) -> bool {
        self.name.ends_with(suffix)
    }
}
