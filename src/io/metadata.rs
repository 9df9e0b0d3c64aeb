// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format descriptors and listing types.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::Capability;

/// Where a provider came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Packaged with oceanio
    Builtin,
    /// Contributed through a plugin manifest
    Plugin,
}

impl Origin {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Builtin => "builtin",
            Origin::Plugin => "plugin",
        }
    }

    /// Whether this is a plugin provider.
    pub fn is_plugin(&self) -> bool {
        matches!(self, Origin::Plugin)
    }
}

/// Identity of a registered provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Unique key within the capability
    pub key: String,
    /// Human-readable name
    pub display_name: String,
    /// Lower-case extensions with leading dot
    pub file_extensions: BTreeSet<String>,
    /// Capability the provider implements
    pub capability: Capability,
}

impl FormatDescriptor {
    /// Whether the descriptor claims `extension` (already normalized).
    pub fn claims(&self, extension: &str) -> bool {
        self.file_extensions.contains(extension)
    }
}

/// Normalize an extension: trim, lower-case, ensure a leading dot.
///
/// Returns `None` for extensions that cannot be matched against a path
/// (empty, containing whitespace or path separators, or a bare dot).
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty()
        || trimmed
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\')
    {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// One row of the listing interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatInfo {
    /// Format key
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// Claimed extensions
    pub extensions: Vec<String>,
    /// Built-in or plugin
    pub origin: Origin,
}

/// Everything registered, per capability, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatListing {
    /// Reader providers
    pub readers: Vec<FormatInfo>,
    /// Writer providers
    pub writers: Vec<FormatInfo>,
    /// Plotter providers
    pub plotters: Vec<FormatInfo>,
}

impl FormatListing {
    /// Rows for one capability.
    pub fn get(&self, capability: Capability) -> &[FormatInfo] {
        match capability {
            Capability::Reader => &self.readers,
            Capability::Writer => &self.writers,
            Capability::Plotter => &self.plotters,
        }
    }

    /// Total number of providers.
    pub fn len(&self) -> usize {
        self.readers.len() + self.writers.len() + self.plotters.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".CNV"), Some(".cnv".to_string()));
        assert_eq!(normalize_extension("csv"), Some(".csv".to_string()));
        assert_eq!(normalize_extension(" .Json "), Some(".json".to_string()));
        assert_eq!(normalize_extension(""), None);
        assert_eq!(normalize_extension("."), None);
        assert_eq!(normalize_extension(".a b"), None);
        assert_eq!(normalize_extension("dir/x"), None);
    }

    #[test]
    fn test_claims() {
        let descriptor = FormatDescriptor {
            key: "csv".to_string(),
            display_name: "CSV".to_string(),
            file_extensions: [".csv".to_string()].into_iter().collect(),
            capability: Capability::Reader,
        };
        assert!(descriptor.claims(".csv"));
        assert!(!descriptor.claims(".CSV"));
    }
}
