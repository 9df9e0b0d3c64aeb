// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plugin manifests.
//!
//! A manifest advertises provider symbols under the three entry-point groups:
//!
//! ```toml
//! version = 1
//!
//! [[provider]]
//! group = "oceanio.readers"
//! name = "example-json"
//! module = "example_plugin"
//! symbol = "JsonReader"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Manifest format version understood by this build.
pub const MANIFEST_VERSION: u32 = 1;

/// Errors loading a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// File could not be read
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),

    /// Content is not valid manifest TOML
    #[error("invalid manifest TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Manifest declares a version this build does not understand
    #[error("unsupported manifest version {found} (expected {MANIFEST_VERSION})")]
    UnsupportedVersion {
        /// Declared version
        found: u32,
    },
}

/// One advertised provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    /// Entry-point group (`oceanio.readers`, ...)
    pub group: String,
    /// Entry name used in reports
    pub name: String,
    /// Plugin module name
    pub module: String,
    /// Exported symbol
    pub symbol: String,
}

impl ManifestEntry {
    /// `module:symbol` reference, as shown in reports.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.module, self.symbol)
    }
}

/// A `[[provider]]` table that does not describe a valid entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    /// The entry's `name`, or `provider[i]` when it has none
    pub name: String,
    /// Why the table was rejected
    pub reason: String,
}

#[derive(Deserialize)]
struct RawManifest {
    version: u32,
    #[serde(default)]
    provider: Vec<toml::Value>,
}

/// A parsed manifest.
///
/// Only a syntax error or an unsupported version rejects the whole file;
/// malformed provider tables are collected in [`Manifest::invalid`] and the
/// remaining entries stay usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Format version
    pub version: u32,
    /// Advertised providers, in file order
    pub providers: Vec<ManifestEntry>,
    /// Provider tables that could not be read, in file order
    pub invalid: Vec<InvalidEntry>,
    /// Where the manifest was loaded from
    pub source: Option<PathBuf>,
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(text)?;
        if raw.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion { found: raw.version });
        }

        let mut providers = Vec::with_capacity(raw.provider.len());
        let mut invalid = Vec::new();
        for (index, table) in raw.provider.into_iter().enumerate() {
            let name = table
                .get("name")
                .and_then(toml::Value::as_str)
                .map_or_else(|| format!("provider[{index}]"), str::to_string);
            match table.try_into::<ManifestEntry>() {
                Ok(entry) => providers.push(entry),
                Err(e) => invalid.push(InvalidEntry {
                    name,
                    reason: format!("invalid provider entry: {e}"),
                }),
            }
        }

        Ok(Self {
            version: raw.version,
            providers,
            invalid,
            source: None,
        })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path)?;
        let mut manifest = Self::parse(&text)?;
        manifest.source = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// Build a manifest in code.
    pub fn from_entries(providers: Vec<ManifestEntry>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            providers,
            invalid: Vec::new(),
            source: None,
        }
    }

    /// Display name for reports.
    pub fn label(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "<inline>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_entries_in_order() {
        let manifest = Manifest::parse(
            r#"
version = 1

[[provider]]
group = "oceanio.readers"
name = "first"
module = "m"
symbol = "A"

[[provider]]
group = "oceanio.plotters"
name = "second"
module = "m"
symbol = "B"
"#,
        )
        .unwrap();
        assert_eq!(manifest.providers.len(), 2);
        assert_eq!(manifest.providers[0].name, "first");
        assert_eq!(manifest.providers[1].reference(), "m:B");
    }

    #[test]
    fn test_empty_manifest_is_valid() {
        let manifest = Manifest::parse("version = 1\n").unwrap();
        assert!(manifest.providers.is_empty());
    }

    #[test]
    fn test_unsupported_version() {
        let err = Manifest::parse("version = 7\n").unwrap_err();
        assert!(matches!(err, ManifestError::UnsupportedVersion { found: 7 }));
    }

    #[test]
    fn test_malformed_entry_keeps_siblings() {
        let manifest = Manifest::parse(
            r#"
version = 1

[[provider]]
group = "oceanio.readers"
name = "incomplete"
module = "m"

[[provider]]
group = "oceanio.readers"
name = "complete"
module = "m"
symbol = "A"

[[provider]]
group = 3
"#,
        )
        .unwrap();
        assert_eq!(manifest.providers.len(), 1);
        assert_eq!(manifest.providers[0].name, "complete");
        assert_eq!(manifest.invalid.len(), 2);
        assert_eq!(manifest.invalid[0].name, "incomplete");
        assert!(manifest.invalid[0].reason.contains("symbol"));
        assert_eq!(manifest.invalid[1].name, "provider[2]");
    }

    #[test]
    fn test_syntax_error_rejects_manifest() {
        let err = Manifest::parse("version = 1\n[[provider]\n").unwrap_err();
        assert!(matches!(err, ManifestError::Toml(_)));
    }

    #[test]
    fn test_load_records_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version = 1").unwrap();
        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.source.as_deref(), Some(file.path()));
    }
}
