// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # oceanio
//!
//! Oceanographic instrument data toolkit with pluggable formats.
//!
//! Files are read into a common labelled-array [`Dataset`], converted to
//! other formats and plotted. Readers, writers and plotters are providers
//! looked up in a [`Registry`]; third parties add their own through plugin
//! manifests without touching this crate.
//!
//! ## Architecture
//!
//! - `core/` - [`Dataset`], [`Capability`] and the error taxonomy
//! - `io/` - provider traits, format descriptors, the resolver and the
//!   built-in CNV, CSV and JSON formats
//! - `plot/` - built-in text plotters
//! - `registry/` - built-in catalog, plugin discovery and the registry
//! - `transform/` - field mapping
//! - `dispatch/` - convert, show and plot operations
//!
//! ## Example: Converting a CNV cast
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use oceanio::dispatch::{ConvertRequest, Dispatcher};
//! use oceanio::registry::Discovery;
//!
//! let (registry, report) = Discovery::new()
//!     .with_manifest("plugins.toml")
//!     .run();
//! for collision in &report.collisions {
//!     eprintln!("{} '{}' kept by {}", collision.capability, collision.key, collision.kept);
//! }
//!
//! let dispatcher = Dispatcher::new(&registry);
//! dispatcher.convert(
//!     ConvertRequest::new("cast_001.cnv", "cast_001.csv").mapping(["temperature=tv290C"])?,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Summarizing a file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use oceanio::dispatch::Dispatcher;
//! use oceanio::registry::Registry;
//!
//! let registry = Registry::builtin();
//! let summary = Dispatcher::new(&registry).show("cast_001.cnv", None)?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    Capability, Dataset, DatasetError, Dimension, Error, ProviderError, ProviderResult, Result,
    Variable,
};

// I/O (traits, descriptors, resolver, built-in formats)
pub mod io;

// Re-export key I/O types
pub use io::metadata::{FormatDescriptor, FormatInfo, FormatListing, Origin};
pub use io::traits::{PlotArtifact, PlotOptions, Plotter, Provider, ReadOptions, Reader, Writer};
pub use io::FormatResolver;

// Built-in plotters
pub mod plot;

// Provider registry and discovery
pub mod registry;
pub use registry::{Discovery, DiscoveryReport, Registry};

// Dataset transformations
pub mod transform;

// Dispatch engine
pub mod dispatch;
pub use dispatch::{ConvertOutcome, ConvertRequest, DatasetSummary, Dispatcher};

// Configuration
pub mod config;
pub use config::Settings;
