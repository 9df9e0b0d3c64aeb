// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout oceanio.
//!
//! This module provides the foundational types for the library:
//! - [`Error`] - Uniform error taxonomy
//! - [`Dataset`] - Labelled multi-dimensional array collection
//! - [`Capability`] - The three extensible provider roles

pub mod dataset;
pub mod error;

use serde::Serialize;

pub use dataset::{Dataset, DatasetError, Dimension, Variable};
pub use error::{Error, ProviderError, ProviderResult, Result};

/// Entry-point group for reader providers.
pub const READERS_GROUP: &str = "oceanio.readers";
/// Entry-point group for writer providers.
pub const WRITERS_GROUP: &str = "oceanio.writers";
/// Entry-point group for plotter providers.
pub const PLOTTERS_GROUP: &str = "oceanio.plotters";

/// Provider role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Turns a file into a [`Dataset`]
    Reader,
    /// Turns a [`Dataset`] into a file
    Writer,
    /// Renders a [`Dataset`]
    Plotter,
}

impl Capability {
    /// All capabilities in registry order.
    pub const ALL: [Capability; 3] = [Capability::Reader, Capability::Writer, Capability::Plotter];

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Reader => "reader",
            Capability::Writer => "writer",
            Capability::Plotter => "plotter",
        }
    }

    /// Entry-point group name for this capability.
    pub fn group(&self) -> &'static str {
        match self {
            Capability::Reader => READERS_GROUP,
            Capability::Writer => WRITERS_GROUP,
            Capability::Plotter => PLOTTERS_GROUP,
        }
    }

    /// Look up the capability advertised by an entry-point group name.
    pub fn from_group(group: &str) -> Option<Self> {
        Capability::ALL.into_iter().find(|c| c.group() == group)
    }

    /// Name of the operation a provider must implement for this capability.
    pub fn operation(&self) -> &'static str {
        match self {
            Capability::Reader => "get_data",
            Capability::Writer => "write",
            Capability::Plotter => "plot",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
