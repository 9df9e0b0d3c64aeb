// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Optional TOML configuration.
//!
//! ```toml
//! [discovery]
//! manifests = ["/etc/oceanio/plugins.toml"]
//!
//! [log]
//! level = "info"
//! ```
//!
//! Unknown keys are rejected so typos surface at startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Plugin discovery settings
    #[serde(default)]
    pub discovery: DiscoverySettings,

    /// Logging settings
    #[serde(default)]
    pub log: LogSettings,
}

/// Plugin discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySettings {
    /// Manifests read on every run, before any given on the command line.
    /// Relative paths are resolved against the config file's directory.
    #[serde(default)]
    pub manifests: Vec<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// Default level for oceanio targets when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Settings {
    /// Parse configuration text.
    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::manifest(path, e.to_string()))?;
        let mut settings = Self::parse(&text).map_err(|e| Error::manifest(path, e.to_string()))?;
        if let Some(base) = path.parent() {
            for manifest in &mut settings.discovery.manifests {
                if manifest.is_relative() {
                    *manifest = base.join(&*manifest);
                }
            }
        }
        Ok(settings)
    }
}

/// Split a path list such as `OCEANIO_MANIFEST` on the platform separator.
pub fn split_path_list(value: &str) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse("").unwrap();
        assert!(settings.discovery.manifests.is_empty());
        assert_eq!(settings.log.level, "warn");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::parse("[discovery]\nmanifest = []\n").is_err());
    }

    #[test]
    fn test_relative_manifests_resolve_against_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oceanio.toml");
        fs::write(
            &path,
            "[discovery]\nmanifests = [\"plugins.toml\", \"/abs/other.toml\"]\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(
            settings.discovery.manifests,
            vec![dir.path().join("plugins.toml"), PathBuf::from("/abs/other.toml")]
        );
        assert_eq!(settings.log.level, "debug");
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/no/such/oceanio.toml")).unwrap_err();
        assert_eq!(err.kind(), "ManifestError");
    }
}
