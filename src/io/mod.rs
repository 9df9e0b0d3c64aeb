// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer: provider contracts, format descriptors, resolution and the
//! built-in formats.

pub mod detection;
pub mod formats;
pub mod metadata;

// Re-exports
pub use detection::{path_extension, FormatResolver};
pub use metadata::{normalize_extension, FormatDescriptor, FormatInfo, FormatListing, Origin};

// Capability contracts
pub mod traits;
pub use traits::{PlotArtifact, PlotOptions, Plotter, Provider, Reader, Writer};
