// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Discovery: built-ins plus manifest-advertised plugins.
//!
//! Built-ins are registered first, in catalog order. Manifests are then
//! processed in the order they were added, entries in file order. Each entry
//! goes through the same checks:
//!
//! 1. the group is a known entry-point group
//! 2. the module is linked and exports the symbol
//! 3. the export implements the group's capability
//! 4. the identity is callable and well formed
//!
//! A failing entry is skipped with a warning. A key already taken by a
//! built-in is always kept by the built-in; a key taken by an earlier plugin
//! is kept by that plugin. Both cases are reported as collisions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::builtin_exports;
use super::entry::{contain, ProviderEntry};
use super::manifest::{Manifest, ManifestEntry};
use super::module::{ModuleTable, PluginModule};
use super::Registry;
use crate::core::Capability;
use crate::io::metadata::Origin;

/// A plugin entry that made it into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedEntry {
    /// Entry name from the manifest
    pub name: String,
    /// Capability
    pub capability: Capability,
    /// Registered format key
    pub key: String,
    /// `module:symbol` the provider was loaded from
    pub reference: String,
}

/// An entry, or a whole manifest, that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Manifest the entry came from
    pub manifest: String,
    /// Entry name, or the manifest label when the whole manifest failed
    pub name: String,
    /// Why it was skipped
    pub reason: String,
}

/// How a collision was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionKind {
    /// A plugin tried to take a built-in key; the built-in wins
    BuiltinShadowsPlugin,
    /// Two plugins claimed the same key; the first registered wins
    PluginConflict,
}

/// Two providers claimed the same key within a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    /// Capability
    pub capability: Capability,
    /// Contested key
    pub key: String,
    /// Holder of the key ("builtin" or the plugin entry name)
    pub kept: String,
    /// Entry name that was dropped
    pub rejected: String,
    /// Resolution rule applied
    pub kind: CollisionKind,
}

/// Outcome of a discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// Plugin entries registered
    pub loaded: Vec<LoadedEntry>,
    /// Entries or manifests skipped
    pub skipped: Vec<SkippedEntry>,
    /// Key collisions
    pub collisions: Vec<Collision>,
}

impl DiscoveryReport {
    /// The loaded entry that registered `key` for `capability`.
    pub fn loaded_entry(&self, capability: Capability, key: &str) -> Option<&LoadedEntry> {
        self.loaded
            .iter()
            .find(|e| e.capability == capability && e.key == key)
    }

    /// Whether any plugin was skipped or collided.
    pub fn has_problems(&self) -> bool {
        !self.skipped.is_empty() || !self.collisions.is_empty()
    }
}

/// Discovery builder.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    manifest_paths: Vec<PathBuf>,
    manifests: Vec<Manifest>,
    modules: ModuleTable,
}

impl Discovery {
    /// Discovery over built-ins and link-time modules only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a manifest file during the run.
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_paths.push(path.into());
        self
    }

    /// Read several manifest files during the run, in order.
    pub fn with_manifests<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.manifest_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Use an already parsed manifest. Processed after manifest files.
    pub fn with_parsed_manifest(mut self, manifest: Manifest) -> Self {
        self.manifests.push(manifest);
        self
    }

    /// Make a module available to symbol lookup.
    pub fn with_module(mut self, module: Arc<dyn PluginModule>) -> Self {
        self.modules.insert(module);
        self
    }

    /// Build a fresh registry.
    ///
    /// Never fails: problems with plugins end up in the report.
    pub fn run(&self) -> (Registry, DiscoveryReport) {
        let mut run = Run::default();

        for export in builtin_exports() {
            match ProviderEntry::verify(export, Origin::Builtin) {
                Ok(entry) => {
                    if run.registry.insert(entry).is_err() {
                        warn!("duplicate built-in provider in catalog");
                    }
                }
                Err(reason) => warn!(reason = %reason, "built-in provider failed verification"),
            }
        }

        for path in &self.manifest_paths {
            match Manifest::load(path) {
                Ok(manifest) => run.process_manifest(&manifest, &self.modules),
                Err(e) => {
                    let label = path.display().to_string();
                    warn!(manifest = %label, error = %e, "skipping plugin manifest");
                    run.report.skipped.push(SkippedEntry {
                        manifest: label.clone(),
                        name: label,
                        reason: e.to_string(),
                    });
                }
            }
        }

        for manifest in &self.manifests {
            run.process_manifest(manifest, &self.modules);
        }

        debug!(
            providers = run.registry.len(),
            plugins = run.report.loaded.len(),
            skipped = run.report.skipped.len(),
            collisions = run.report.collisions.len(),
            "discovery finished"
        );
        (run.registry, run.report)
    }
}

#[derive(Default)]
struct Run {
    registry: Registry,
    report: DiscoveryReport,
    /// Entry names of plugins holding a key
    owners: HashMap<(Capability, String), String>,
}

impl Run {
    fn process_manifest(&mut self, manifest: &Manifest, modules: &ModuleTable) {
        let label = manifest.label();
        debug!(manifest = %label, entries = manifest.providers.len(), "processing manifest");
        for invalid in &manifest.invalid {
            warn!(
                manifest = %label,
                entry = %invalid.name,
                reason = %invalid.reason,
                "skipping plugin entry"
            );
            self.report.skipped.push(SkippedEntry {
                manifest: label.clone(),
                name: invalid.name.clone(),
                reason: invalid.reason.clone(),
            });
        }
        for entry in &manifest.providers {
            match load_entry(entry, modules) {
                Ok(provider) => self.register(entry, provider),
                Err(reason) => {
                    warn!(
                        manifest = %label,
                        entry = %entry.name,
                        reference = %entry.reference(),
                        reason = %reason,
                        "skipping plugin entry"
                    );
                    self.report.skipped.push(SkippedEntry {
                        manifest: label.clone(),
                        name: entry.name.clone(),
                        reason,
                    });
                }
            }
        }
    }

    fn register(&mut self, entry: &ManifestEntry, provider: ProviderEntry) {
        let capability = provider.capability();
        let key = provider.key().to_string();

        let holder = match self.registry.insert(provider) {
            Ok(()) => None,
            Err(existing) => Some(existing.origin),
        };

        match holder {
            None => {
                debug!(entry = %entry.name, capability = %capability, key = %key, "registered plugin provider");
                self.owners
                    .insert((capability, key.clone()), entry.name.clone());
                self.report.loaded.push(LoadedEntry {
                    name: entry.name.clone(),
                    capability,
                    key,
                    reference: entry.reference(),
                });
            }
            Some(Origin::Builtin) => {
                warn!(
                    entry = %entry.name,
                    capability = %capability,
                    key = %key,
                    "plugin provider shadowed by built-in"
                );
                self.report.collisions.push(Collision {
                    capability,
                    key,
                    kept: Origin::Builtin.as_str().to_string(),
                    rejected: entry.name.clone(),
                    kind: CollisionKind::BuiltinShadowsPlugin,
                });
            }
            Some(Origin::Plugin) => {
                let kept = self
                    .owners
                    .get(&(capability, key.clone()))
                    .cloned()
                    .unwrap_or_default();
                warn!(
                    entry = %entry.name,
                    kept = %kept,
                    capability = %capability,
                    key = %key,
                    "plugin provider conflicts with earlier plugin"
                );
                self.report.collisions.push(Collision {
                    capability,
                    key,
                    kept,
                    rejected: entry.name.clone(),
                    kind: CollisionKind::PluginConflict,
                });
            }
        }
    }
}

/// Resolve and verify one manifest entry.
fn load_entry(entry: &ManifestEntry, modules: &ModuleTable) -> Result<ProviderEntry, String> {
    let capability = Capability::from_group(&entry.group)
        .ok_or_else(|| format!("unknown entry-point group '{}'", entry.group))?;

    let module = modules
        .find(&entry.module)
        .ok_or_else(|| format!("module '{}' not found", entry.module))?;

    let export = contain(|| module.symbol(&entry.symbol))
        .map_err(|message| {
            format!(
                "symbol lookup for '{}' panicked: {message}",
                entry.reference()
            )
        })?
        .ok_or_else(|| {
            format!(
                "module '{}' has no symbol '{}'",
                entry.module, entry.symbol
            )
        })?;

    if export.capability() != capability {
        return Err(format!(
            "'{}' does not implement {} (it is a {})",
            entry.reference(),
            capability.operation(),
            export.capability()
        ));
    }

    ProviderEntry::verify(export, Origin::Plugin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::formats::csv::{CsvReader, CsvWriter};
    use crate::registry::{ProviderExport, StaticModule};

    fn entry(group: &str, name: &str, module: &str, symbol: &str) -> ManifestEntry {
        ManifestEntry {
            group: group.to_string(),
            name: name.to_string(),
            module: module.to_string(),
            symbol: symbol.to_string(),
        }
    }

    fn module() -> Arc<dyn PluginModule> {
        Arc::new(
            StaticModule::new("unit_plugin")
                .export("CsvReader", ProviderExport::reader::<CsvReader>())
                .export("CsvWriter", ProviderExport::writer::<CsvWriter>()),
        )
    }

    #[test]
    fn test_builtins_only() {
        let (registry, report) = Discovery::new().run();
        assert_eq!(registry.len(), 7);
        assert!(!report.has_problems());
    }

    #[test]
    fn test_capability_mismatch_is_skipped() {
        let manifest = Manifest::from_entries(vec![entry(
            "oceanio.readers",
            "not-a-reader",
            "unit_plugin",
            "CsvWriter",
        )]);
        let (_, report) = Discovery::new()
            .with_module(module())
            .with_parsed_manifest(manifest)
            .run();
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("does not implement get_data"));
    }

    #[test]
    fn test_unknown_group_and_module() {
        let manifest = Manifest::from_entries(vec![
            entry("oceanio.exporters", "bad-group", "unit_plugin", "CsvReader"),
            entry("oceanio.readers", "bad-module", "nowhere", "CsvReader"),
            entry("oceanio.readers", "bad-symbol", "unit_plugin", "Nope"),
        ]);
        let (registry, report) = Discovery::new()
            .with_module(module())
            .with_parsed_manifest(manifest)
            .run();
        assert_eq!(registry.len(), 7);
        let reasons: Vec<&str> = report.skipped.iter().map(|s| s.reason.as_str()).collect();
        assert!(reasons[0].contains("unknown entry-point group"));
        assert!(reasons[1].contains("module 'nowhere' not found"));
        assert!(reasons[2].contains("has no symbol 'Nope'"));
    }

    #[test]
    fn test_builtin_shadows_plugin() {
        let manifest = Manifest::from_entries(vec![entry(
            "oceanio.readers",
            "my-csv",
            "unit_plugin",
            "CsvReader",
        )]);
        let (registry, report) = Discovery::new()
            .with_module(module())
            .with_parsed_manifest(manifest)
            .run();
        let csv = registry.get(Capability::Reader, "csv").unwrap();
        assert_eq!(csv.origin, Origin::Builtin);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].kind, CollisionKind::BuiltinShadowsPlugin);
        assert_eq!(report.collisions[0].rejected, "my-csv");
        assert!(report.loaded.is_empty());
    }
}
