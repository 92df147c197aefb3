//! Pack manifests
//!
//! A pack manifest describes an archive declaratively: header versions plus the files and
//! directory trees to pack. Manifests are TOML or JSON, picked by file extension.
//!
//! ```toml
//! format_version = 1
//! content_version = 42
//!
//! [[file]]
//! source = "assets/logo.png"
//! target = "images\\logo.png"
//!
//! [[tree]]
//! source = "levels"
//! target = "data\\levels"
//! ```
//!
//! A `file` without `target` is stored under its source path; a `tree` without `target` is
//! packed at the archive root.
//!
//! ```no_run
//! use honk_vfs::{ArchiveWriter, PackManifest};
//! # use honk_vfs::error::Result;
//!
//! # fn main() -> Result<()> {
//! let manifest = PackManifest::load("pack.toml")?;
//! let writer = ArchiveWriter::from_manifest(&manifest, ".")?;
//! writer.save("game.honk")?;
//! # Ok(())
//! # }
//! ```

use crate::archive::FORMAT_VERSION_LEGACY;
use crate::error::{HonkError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declarative description of an archive to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackManifest {
    /// On-disk format version (0 or 1)
    #[serde(default = "default_format_version")]
    pub format_version: u8,

    /// Caller-defined content version stored in the header
    #[serde(default)]
    pub content_version: i32,

    /// Individual files, packed in order
    #[serde(default, rename = "file", skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PackFile>,

    /// Directory trees, packed after all individual files
    #[serde(default, rename = "tree", skip_serializing_if = "Vec::is_empty")]
    pub trees: Vec<PackTree>,
}

/// A single file to pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackFile {
    pub source: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A directory whose regular files are packed recursively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackTree {
    pub source: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

fn default_format_version() -> u8 {
    FORMAT_VERSION_LEGACY
}

impl Default for PackManifest {
    fn default() -> Self {
        Self {
            format_version: default_format_version(),
            content_version: 0,
            files: Vec::new(),
            trees: Vec::new(),
        }
    }
}

impl PackManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file entry
    pub fn with_file(mut self, source: impl Into<PathBuf>, target: Option<&str>) -> Self {
        self.files.push(PackFile {
            source: source.into(),
            target: target.map(String::from),
        });
        self
    }

    /// Add a directory tree entry
    pub fn with_tree(mut self, source: impl Into<PathBuf>, target: Option<&str>) -> Self {
        self.trees.push(PackTree {
            source: source.into(),
            target: target.map(String::from),
        });
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a manifest, choosing the syntax from the extension (`.toml` or `.json`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let manifest = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml_str(&text)?,
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&text)?,
            _ => {
                return Err(HonkError::ManifestParseFailed(format!(
                    "Unrecognized manifest extension: {}",
                    path.display()
                )))
            }
        };

        tracing::debug!(
            path = %path.display(),
            files = manifest.files.len(),
            trees = manifest.trees.len(),
            "loaded pack manifest"
        );
        Ok(manifest)
    }
}
