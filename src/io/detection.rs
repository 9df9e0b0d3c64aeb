// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format resolution.
//!
//! Picks the single provider that handles a path, either from an explicit
//! format key or by inferring it from the file extension.
//!
//! - An explicit key is looked up directly. An unknown key is an error; the
//!   resolver never falls back to inference.
//! - Otherwise the path's extension is lower-cased and matched against every
//!   provider of the capability. Exactly one match resolves; none or several
//!   are errors.
//! - Plotters are only ever resolved by key.
//!
//! Resolution never touches the filesystem.
//!
//! # Example
//!
//! ```rust,no_run
//! use oceanio::io::detection::FormatResolver;
//! use oceanio::registry::Registry;
//!
//! let registry = Registry::builtin();
//! let resolver = FormatResolver::new(&registry);
//! let reader = resolver.resolve_reader("cast_001.CNV", None)?;
//! assert_eq!(reader.key(), "sbe-cnv");
//! # Ok::<(), oceanio::Error>(())
//! ```

use std::path::Path;

use tracing::debug;

use crate::core::{Capability, Error, Result};
use crate::registry::{ProviderEntry, Registry};

use super::metadata::normalize_extension;

/// Lower-cased extension of `path` with a leading dot.
pub fn path_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(normalize_extension)
}

/// Resolves providers against one registry.
#[derive(Debug, Clone, Copy)]
pub struct FormatResolver<'r> {
    registry: &'r Registry,
}

impl<'r> FormatResolver<'r> {
    /// Create a resolver.
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Resolve a reader for `path`.
    pub fn resolve_reader(
        &self,
        path: impl AsRef<Path>,
        key: Option<&str>,
    ) -> Result<&'r ProviderEntry> {
        self.resolve(Capability::Reader, path.as_ref(), key)
    }

    /// Resolve a writer for the destination `path`.
    pub fn resolve_writer(
        &self,
        path: impl AsRef<Path>,
        key: Option<&str>,
    ) -> Result<&'r ProviderEntry> {
        self.resolve(Capability::Writer, path.as_ref(), key)
    }

    /// Resolve a plotter by key.
    pub fn resolve_plotter(&self, key: &str) -> Result<&'r ProviderEntry> {
        self.by_key(Capability::Plotter, key)
    }

    /// Resolve a provider of `capability` for `path`.
    pub fn resolve(
        &self,
        capability: Capability,
        path: &Path,
        key: Option<&str>,
    ) -> Result<&'r ProviderEntry> {
        let entry = match key {
            Some(key) => self.by_key(capability, key)?,
            None => self.by_extension(capability, path)?,
        };
        debug!(
            capability = %capability,
            path = %path.display(),
            key = entry.key(),
            explicit = key.is_some(),
            "resolved format"
        );
        Ok(entry)
    }

    fn by_key(&self, capability: Capability, key: &str) -> Result<&'r ProviderEntry> {
        self.registry
            .get(capability, key)
            .ok_or_else(|| Error::UnknownFormat {
                capability,
                key: key.to_string(),
                available: self.registry.keys(capability),
            })
    }

    fn by_extension(&self, capability: Capability, path: &Path) -> Result<&'r ProviderEntry> {
        let unresolved = |extension: String| Error::UnresolvedFormat {
            capability,
            extension,
            known: self.registry.known_extensions(capability),
        };

        if capability == Capability::Plotter {
            return Err(unresolved(path_extension(path).unwrap_or_default()));
        }

        let extension = path_extension(path).ok_or_else(|| unresolved(String::new()))?;

        let matches: Vec<&'r ProviderEntry> = self
            .registry
            .entries(capability)
            .iter()
            .filter(|e| e.descriptor.claims(&extension))
            .collect();

        match matches.as_slice() {
            [] => Err(unresolved(extension)),
            [single] => Ok(*single),
            several => {
                let mut candidates: Vec<String> =
                    several.iter().map(|e| e.key().to_string()).collect();
                candidates.sort();
                Err(Error::AmbiguousFormat {
                    capability,
                    extension,
                    candidates,
                })
            }
        }
    }
}
