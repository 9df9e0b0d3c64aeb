// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Provider entries and the registration-time conformance check.
//!
//! A [`ProviderExport`] is what a catalog or plugin module hands to the
//! registry: a monomorphised constructor plus a function yielding the
//! provider's static identity. Only types implementing one of the capability
//! traits can be turned into an export, so conformance of the operations is
//! checked by the compiler. [`ProviderEntry::verify`] checks the rest: the
//! identity must be callable and well formed.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::core::{Capability, Dataset, ProviderResult};
use crate::io::metadata::{normalize_extension, FormatDescriptor, FormatInfo, Origin};
use crate::io::traits::{Plotter, Provider, ReadOptions, Reader, Writer};

/// Constructor for a boxed reader.
pub type ReaderCtor = fn(&Path, &ReadOptions) -> ProviderResult<Box<dyn Reader>>;
/// Constructor for a boxed writer.
pub type WriterCtor = fn(Arc<Dataset>) -> ProviderResult<Box<dyn Writer>>;
/// Constructor for a boxed plotter.
pub type PlotterCtor = fn(Arc<Dataset>) -> ProviderResult<Box<dyn Plotter>>;

/// Capability-tagged constructor.
#[derive(Clone, Copy)]
pub enum ProviderFactory {
    /// Reader constructor
    Reader(ReaderCtor),
    /// Writer constructor
    Writer(WriterCtor),
    /// Plotter constructor
    Plotter(PlotterCtor),
}

impl ProviderFactory {
    /// Capability this factory builds.
    pub fn capability(&self) -> Capability {
        match self {
            ProviderFactory::Reader(_) => Capability::Reader,
            ProviderFactory::Writer(_) => Capability::Writer,
            ProviderFactory::Plotter(_) => Capability::Plotter,
        }
    }
}

impl fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderFactory::{:?}", self.capability())
    }
}

/// Raw static identity as reported by a provider type.
#[derive(Debug, Clone, Copy)]
pub struct ProviderIdentity {
    /// Result of `format_key()`
    pub key: &'static str,
    /// Result of `format_name()`
    pub name: &'static str,
    /// Result of `file_extensions()`
    pub extensions: &'static [&'static str],
}

fn identity_of<P: Provider>() -> ProviderIdentity {
    ProviderIdentity {
        key: P::format_key(),
        name: P::format_name(),
        extensions: P::file_extensions(),
    }
}

fn open_reader<R: Reader + 'static>(
    path: &Path,
    options: &ReadOptions,
) -> ProviderResult<Box<dyn Reader>> {
    Ok(Box::new(R::open_with(path, options)?))
}

fn create_writer<W: Writer + 'static>(dataset: Arc<Dataset>) -> ProviderResult<Box<dyn Writer>> {
    Ok(Box::new(W::create(dataset)?))
}

fn create_plotter<P: Plotter + 'static>(
    dataset: Arc<Dataset>,
) -> ProviderResult<Box<dyn Plotter>> {
    Ok(Box::new(P::create(dataset)?))
}

/// A provider type, ready to be registered.
#[derive(Clone, Copy)]
pub struct ProviderExport {
    identity: fn() -> ProviderIdentity,
    factory: ProviderFactory,
}

impl ProviderExport {
    /// Export a reader type.
    pub fn reader<R: Reader + 'static>() -> Self {
        Self {
            identity: identity_of::<R>,
            factory: ProviderFactory::Reader(open_reader::<R>),
        }
    }

    /// Export a writer type.
    pub fn writer<W: Writer + 'static>() -> Self {
        Self {
            identity: identity_of::<W>,
            factory: ProviderFactory::Writer(create_writer::<W>),
        }
    }

    /// Export a plotter type.
    pub fn plotter<P: Plotter + 'static>() -> Self {
        Self {
            identity: identity_of::<P>,
            factory: ProviderFactory::Plotter(create_plotter::<P>),
        }
    }

    /// Capability of the exported type.
    pub fn capability(&self) -> Capability {
        self.factory.capability()
    }
}

impl fmt::Debug for ProviderExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderExport")
            .field("capability", &self.capability())
            .finish()
    }
}

/// A registered provider. Immutable once created.
#[derive(Debug, Clone)]
pub struct ProviderEntry {
    /// Provider identity
    pub descriptor: FormatDescriptor,
    /// Constructor
    pub factory: ProviderFactory,
    /// Built-in or plugin
    pub origin: Origin,
}

impl ProviderEntry {
    /// Check an export and turn it into an entry.
    ///
    /// Runs the provider's identity functions (isolated from panics) and
    /// validates the result. Plotters never claim extensions.
    pub fn verify(export: ProviderExport, origin: Origin) -> Result<Self, String> {
        let identity = contain(export.identity)
            .map_err(|message| format!("identity functions panicked: {message}"))?;

        let key = identity.key.trim();
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(format!(
                "format_key() returned an invalid key '{}'",
                identity.key
            ));
        }
        let name = identity.name.trim();
        if name.is_empty() {
            return Err(format!("format_name() is empty for '{key}'"));
        }

        let capability = export.capability();
        let mut file_extensions = BTreeSet::new();
        if capability != Capability::Plotter {
            for raw in identity.extensions {
                let ext = normalize_extension(raw)
                    .ok_or_else(|| format!("invalid file extension '{raw}' for '{key}'"))?;
                file_extensions.insert(ext);
            }
        }

        Ok(Self {
            descriptor: FormatDescriptor {
                key: key.to_string(),
                display_name: name.to_string(),
                file_extensions,
                capability,
            },
            factory: export.factory,
            origin,
        })
    }

    /// Format key.
    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    /// Capability.
    pub fn capability(&self) -> Capability {
        self.descriptor.capability
    }

    /// Listing row for this entry.
    pub fn info(&self) -> FormatInfo {
        FormatInfo {
            key: self.descriptor.key.clone(),
            name: self.descriptor.display_name.clone(),
            extensions: self.descriptor.file_extensions.iter().cloned().collect(),
            origin: self.origin,
        }
    }
}

thread_local! {
    static CONTAINED: Cell<bool> = const { Cell::new(false) };
}

/// Run provider or plugin code, catching any panic it raises.
///
/// Returns the panic message on failure.
pub(crate) fn contain<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    let outer = CONTAINED.with(|c| c.replace(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    CONTAINED.with(|c| c.set(outer));
    outcome.map_err(|payload| panic_message(&*payload))
}

/// Install a panic hook for processes that load plugins.
///
/// Panics raised by provider or plugin code are already turned into errors;
/// the hook reports them as `debug` events instead of printing the default
/// panic message. Any other panic is passed to the previously installed hook.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if CONTAINED.with(Cell::get) {
            debug!(panic = %info, "contained provider panic");
        } else {
            previous(info);
        }
    }));
}

/// Extract a printable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
