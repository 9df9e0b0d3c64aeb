// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::env;
use std::path::PathBuf;

use oceanio::config::split_path_list;
use oceanio::registry::{Discovery, DiscoveryReport, Registry};
use oceanio::{ReadOptions, Settings};
use tracing::debug;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Environment variable holding extra manifest paths.
pub const MANIFEST_ENV: &str = "OCEANIO_MANIFEST";

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise oceanio logs at `level` and everything else at
/// `warn`.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("oceanio={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Log level for a `-v` count, falling back to the configured level.
pub fn level_for(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Load the configuration file, if one was given.
pub fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Ok(Settings::load(path)?),
        None => Ok(Settings::default()),
    }
}

/// Manifests in precedence order: config, environment, command line.
pub fn manifest_paths(settings: &Settings, cli: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = settings.discovery.manifests.clone();
    if let Ok(value) = env::var(MANIFEST_ENV) {
        paths.extend(split_path_list(&value));
    }
    paths.extend(cli.iter().cloned());
    paths
}

/// Reader options from the shared `-H/--header-input` flag.
pub fn read_options(header_input: Option<&PathBuf>) -> ReadOptions {
    match header_input {
        Some(path) => ReadOptions::new().header_file(path),
        None => ReadOptions::new(),
    }
}

/// Registry and discovery report shared by all commands.
pub struct Context {
    pub registry: Registry,
    pub report: DiscoveryReport,
}

impl Context {
    /// Run discovery over the given manifests.
    pub fn discover(manifests: Vec<PathBuf>) -> Self {
        debug!(manifests = manifests.len(), "running plugin discovery");
        let (registry, report) = Discovery::new().with_manifests(manifests).run();
        Self { registry, report }
    }
}

/// Case-insensitive substring match used by `--filter`.
pub fn matches_filter(filter: Option<&str>, fields: &[&str]) -> bool {
    match filter {
        None => true,
        Some(pattern) => {
            let pattern = pattern.to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&pattern))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "info");
        assert_eq!(level_for(5, "warn"), "trace");
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter(None, &["csv"]));
        assert!(matches_filter(Some("CNV"), &["sbe-cnv", "Sea-Bird CNV"]));
        assert!(!matches_filter(Some("nc"), &["json"]));
    }
}
