//! `package.json` manifest parsing and serialization.
//!
//! The manifest declares one distributable package: identity, version,
//! display metadata, and its dependency list. The dependency list is never
//! trusted on load: the resolver rebuilds it from scratch every run and
//! writes the manifest back in a fixed field order, so a run over an
//! unchanged project is byte-for-byte idempotent.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error loading a manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One `name -> version` entry in a manifest's dependency list.
///
/// Entries are appended in reference order and never deduplicated: two
/// references resolving to the same package produce two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    pub name: String,
    pub version: String,
}

impl DependencyEntry {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        DependencyEntry {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Package author block. Every field is optional and omitted when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// A loaded `package.json`, keyed by its on-disk path.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    /// Path of the manifest file. Also its identity within a run.
    pub filename: PathBuf,

    /// Package name (e.g. `com.fredericrp.objectpool`).
    pub name: String,

    /// Package version, copied verbatim into dependents.
    pub version: String,

    pub display_name: Option<String>,
    pub description: Option<String>,

    /// Minimum editor version constraint.
    pub unity: Option<String>,

    pub documentation_url: Option<String>,

    /// Keywords in declared order.
    pub keywords: Vec<String>,

    pub author: Option<Author>,

    /// Rebuilt from the owning module's references every run. Starts empty
    /// on load regardless of what the file contained.
    pub dependencies: Vec<DependencyEntry>,
}

/// On-disk manifest schema. The `dependencies` object is deliberately not
/// captured here: it is recomputed, never merged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    name: String,
    version: String,

    #[serde(default)]
    display_name: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    unity: Option<String>,

    #[serde(default)]
    documentation_url: Option<String>,

    #[serde(default)]
    keywords: Vec<String>,

    #[serde(default)]
    author: Option<Author>,
}

impl PackageManifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse a manifest from its JSON text.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ManifestError> {
        let raw: RawManifest =
            serde_json::from_str(text).map_err(|source| ManifestError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        Ok(PackageManifest {
            filename: path.to_path_buf(),
            name: raw.name,
            version: raw.version,
            display_name: raw.display_name,
            description: raw.description,
            unity: raw.unity,
            documentation_url: raw.documentation_url,
            keywords: raw.keywords,
            author: raw.author,
            dependencies: Vec::new(),
        })
    }

    /// Serialize to the fixed on-disk format.
    ///
    /// Field order is fixed: name, version, displayName, description, unity,
    /// documentationUrl, then keywords / dependencies / author, each omitted
    /// entirely when empty or absent. Indentation is four spaces. No
    /// trailing newline here; the writer appends one.
    pub fn to_json_string(&self) -> String {
        let mut sections: Vec<String> = Vec::new();

        push_scalar(&mut sections, "name", Some(self.name.as_str()));
        push_scalar(&mut sections, "version", Some(self.version.as_str()));
        push_scalar(&mut sections, "displayName", self.display_name.as_deref());
        push_scalar(&mut sections, "description", self.description.as_deref());
        push_scalar(&mut sections, "unity", self.unity.as_deref());
        push_scalar(
            &mut sections,
            "documentationUrl",
            self.documentation_url.as_deref(),
        );

        if !self.keywords.is_empty() {
            let items: Vec<String> = self
                .keywords
                .iter()
                .map(|kw| format!("        \"{}\"", escape(kw)))
                .collect();
            sections.push(format!("    \"keywords\": [\n{}\n    ]", items.join(",\n")));
        }

        if !self.dependencies.is_empty() {
            let items: Vec<String> = self
                .dependencies
                .iter()
                .map(|dep| {
                    format!(
                        "        \"{}\": \"{}\"",
                        escape(&dep.name),
                        escape(&dep.version)
                    )
                })
                .collect();
            sections.push(format!(
                "    \"dependencies\": {{\n{}\n    }}",
                items.join(",\n")
            ));
        }

        if let Some(author) = &self.author {
            let mut fields: Vec<String> = Vec::new();
            if let Some(name) = &author.name {
                fields.push(format!("        \"name\": \"{}\"", escape(name)));
            }
            if let Some(email) = &author.email {
                fields.push(format!("        \"email\": \"{}\"", escape(email)));
            }
            if let Some(url) = &author.url {
                fields.push(format!("        \"url\": \"{}\"", escape(url)));
            }
            sections.push(format!("    \"author\": {{\n{}\n    }}", fields.join(",\n")));
        }

        format!("{{\n{}\n}}", sections.join(",\n"))
    }
}

fn push_scalar(sections: &mut Vec<String>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        sections.push(format!("    \"{}\": \"{}\"", key, escape(value)));
    }
}

/// Escape the two characters that would corrupt a quoted JSON string.
/// Manifest values are plain names, versions, and prose, so the control
/// characters JSON also forbids do not occur in practice.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
