// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Provider registry.
//!
//! The [`Registry`] holds three independent tables, one per capability, each
//! mapping a format key to a [`ProviderEntry`]. It is built once by
//! [`Discovery::run`] and is read-only afterwards; rebuilding means running
//! discovery again.
//!
//! # Example
//!
//! ```no_run
//! use oceanio::registry::Discovery;
//! use oceanio::Capability;
//!
//! let (registry, report) = Discovery::new()
//!     .with_manifest("/etc/oceanio/plugins.toml")
//!     .run();
//! for skipped in &report.skipped {
//!     eprintln!("skipped {}: {}", skipped.name, skipped.reason);
//! }
//! assert!(registry.get(Capability::Reader, "sbe-cnv").is_some());
//! ```

pub mod catalog;
pub mod discovery;
pub mod entry;
pub mod manifest;
pub mod module;

use std::collections::{BTreeSet, HashMap};

pub use discovery::{Collision, CollisionKind, Discovery, DiscoveryReport, LoadedEntry, SkippedEntry};
pub use entry::{install_panic_hook, ProviderEntry, ProviderExport, ProviderFactory, ProviderIdentity};
pub use manifest::{InvalidEntry, Manifest, ManifestEntry, ManifestError, MANIFEST_VERSION};
pub use module::{ModuleTable, PluginModule, RegisteredModule, StaticModule};

use crate::core::Capability;
use crate::io::metadata::{FormatInfo, FormatListing};

/// Entries of one capability, in registration order.
#[derive(Debug, Clone, Default)]
struct ProviderTable {
    entries: Vec<ProviderEntry>,
    index: HashMap<String, usize>,
}

impl ProviderTable {
    fn get(&self, key: &str) -> Option<&ProviderEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Insert unless the key is taken; returns the entry already holding it.
    fn insert(&mut self, entry: ProviderEntry) -> Result<(), &ProviderEntry> {
        if let Some(&existing) = self.index.get(entry.key()) {
            return Err(&self.entries[existing]);
        }
        self.index.insert(entry.key().to_string(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }
}

/// Read-only mapping from (capability, format key) to provider.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    readers: ProviderTable,
    writers: ProviderTable,
    plotters: ProviderTable,
}

impl Registry {
    /// Registry holding only the built-in providers.
    pub fn builtin() -> Self {
        Discovery::new().run().0
    }

    fn table(&self, capability: Capability) -> &ProviderTable {
        match capability {
            Capability::Reader => &self.readers,
            Capability::Writer => &self.writers,
            Capability::Plotter => &self.plotters,
        }
    }

    fn table_mut(&mut self, capability: Capability) -> &mut ProviderTable {
        match capability {
            Capability::Reader => &mut self.readers,
            Capability::Writer => &mut self.writers,
            Capability::Plotter => &mut self.plotters,
        }
    }

    /// Add an entry during discovery. Existing keys are never replaced.
    pub(crate) fn insert(&mut self, entry: ProviderEntry) -> Result<(), &ProviderEntry> {
        self.table_mut(entry.capability()).insert(entry)
    }

    /// Look up a provider by key.
    pub fn get(&self, capability: Capability, key: &str) -> Option<&ProviderEntry> {
        self.table(capability).get(key)
    }

    /// Entries of one capability in registration order.
    pub fn entries(&self, capability: Capability) -> &[ProviderEntry] {
        &self.table(capability).entries
    }

    /// Registered keys of one capability in registration order.
    pub fn keys(&self, capability: Capability) -> Vec<String> {
        self.entries(capability)
            .iter()
            .map(|e| e.key().to_string())
            .collect()
    }

    /// Every extension claimed within a capability, sorted.
    pub fn known_extensions(&self, capability: Capability) -> Vec<String> {
        self.entries(capability)
            .iter()
            .flat_map(|e| e.descriptor.file_extensions.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Listing of everything registered.
    ///
    /// Two registries built from the same inputs produce equal listings.
    pub fn listing(&self) -> FormatListing {
        let rows = |capability: Capability| -> Vec<FormatInfo> {
            self.entries(capability).iter().map(ProviderEntry::info).collect()
        };
        FormatListing {
            readers: rows(Capability::Reader),
            writers: rows(Capability::Writer),
            plotters: rows(Capability::Plotter),
        }
    }

    /// Total number of providers.
    pub fn len(&self) -> usize {
        Capability::ALL
            .iter()
            .map(|&c| self.entries(c).len())
            .sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
