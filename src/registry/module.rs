// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plugin modules: where manifest symbols are looked up.
//!
//! A plugin crate is linked into the host binary and describes itself with a
//! [`PluginModule`]. It becomes visible to discovery in one of two ways:
//!
//! - link-time registration with [`inventory`]:
//!
//! ```no_run
//! use oceanio::registry::{PluginModule, ProviderExport, RegisteredModule};
//!
//! struct ExamplePlugin;
//!
//! impl PluginModule for ExamplePlugin {
//!     fn name(&self) -> &str {
//!         "example_plugin"
//!     }
//!
//!     fn symbol(&self, _symbol: &str) -> Option<ProviderExport> {
//!         None
//!     }
//! }
//!
//! inventory::submit! { RegisteredModule(&ExamplePlugin) }
//! ```
//!
//! - handing the module to [`Discovery::with_module`](crate::registry::Discovery::with_module)
//!   at runtime (embedding, tests).
//!
//! Either way the module is only consulted for symbols named by a manifest.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::entry::ProviderExport;

/// A linked plugin that exports provider symbols.
pub trait PluginModule: Send + Sync {
    /// Module name referenced by manifests.
    fn name(&self) -> &str;

    /// Resolve an exported symbol.
    fn symbol(&self, symbol: &str) -> Option<ProviderExport>;
}

/// Link-time registration record for a [`PluginModule`].
pub struct RegisteredModule(pub &'static dyn PluginModule);

inventory::collect!(RegisteredModule);

/// Simple table-backed module.
///
/// Useful for plugins that export a fixed list of symbols.
#[derive(Clone)]
pub struct StaticModule {
    name: String,
    symbols: HashMap<String, ProviderExport>,
}

impl StaticModule {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: HashMap::new(),
        }
    }

    /// Export `export` under `symbol`.
    pub fn export(mut self, symbol: impl Into<String>, export: ProviderExport) -> Self {
        self.symbols.insert(symbol.into(), export);
        self
    }
}

impl PluginModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self, symbol: &str) -> Option<ProviderExport> {
        self.symbols.get(symbol).copied()
    }
}

impl fmt::Debug for StaticModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut symbols: Vec<&str> = self.symbols.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        f.debug_struct("StaticModule")
            .field("name", &self.name)
            .field("symbols", &symbols)
            .finish()
    }
}

/// Modules available to one discovery run.
///
/// Programmatic modules shadow link-time modules of the same name.
#[derive(Clone, Default)]
pub struct ModuleTable {
    modules: Vec<Arc<dyn PluginModule>>,
}

impl ModuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module.
    pub fn insert(&mut self, module: Arc<dyn PluginModule>) {
        self.modules.push(module);
    }

    /// Find a module by name.
    pub fn find(&self, name: &str) -> Option<ModuleRef<'_>> {
        if let Some(module) = self.modules.iter().find(|m| m.name() == name) {
            return Some(ModuleRef::Owned(module.as_ref()));
        }
        inventory::iter::<RegisteredModule>
            .into_iter()
            .find(|registered| registered.0.name() == name)
            .map(|registered| ModuleRef::Linked(registered.0))
    }

    /// Names of every reachable module, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .modules
            .iter()
            .map(|m| m.name().to_string())
            .chain(
                inventory::iter::<RegisteredModule>
                    .into_iter()
                    .map(|registered| registered.0.name().to_string()),
            )
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl fmt::Debug for ModuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleTable")
            .field("modules", &self.names())
            .finish()
    }
}

/// Borrowed handle to a resolved module.
pub enum ModuleRef<'a> {
    /// Handed to the discovery builder
    Owned(&'a dyn PluginModule),
    /// Registered at link time
    Linked(&'static dyn PluginModule),
}

impl ModuleRef<'_> {
    /// Resolve an exported symbol.
    pub fn symbol(&self, symbol: &str) -> Option<ProviderExport> {
        match self {
            ModuleRef::Owned(module) => module.symbol(symbol),
            ModuleRef::Linked(module) => module.symbol(symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::formats::csv::CsvReader;

    #[test]
    fn test_static_module_lookup() {
        let module =
            StaticModule::new("csv_plugin").export("CsvReader", ProviderExport::reader::<CsvReader>());
        assert_eq!(module.name(), "csv_plugin");
        assert!(module.symbol("CsvReader").is_some());
        assert!(module.symbol("Missing").is_none());
    }

    #[test]
    fn test_table_prefers_programmatic_modules() {
        let mut table = ModuleTable::new();
        table.insert(Arc::new(StaticModule::new("alpha")));
        assert!(table.find("alpha").is_some());
        assert!(table.find("no_such_module").is_none());
        assert!(table.names().contains(&"alpha".to_string()));
    }
}
