// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Capability contracts for readers, writers and plotters.
//!
//! A provider is any type implementing one of [`Reader`], [`Writer`] or
//! [`Plotter`]. Identity (`format_key`, `format_name`, `file_extensions`) and
//! construction are associated functions, so the registry can describe a
//! provider without creating one. The capability operation itself
//! (`get_data`, `write`, `plot`) is an object-safe method; the dispatch
//! engine only ever sees `Box<dyn Reader>` and friends.
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use oceanio::io::traits::{Provider, Reader};
//! use oceanio::{Dataset, ProviderError, ProviderResult};
//!
//! struct NullReader {
//!     path: PathBuf,
//! }
//!
//! impl Provider for NullReader {
//!     fn format_key() -> &'static str { "null" }
//!     fn format_name() -> &'static str { "Empty dataset" }
//!     fn file_extensions() -> &'static [&'static str] { &[".null"] }
//! }
//!
//! impl Reader for NullReader {
//!     fn open(path: &Path) -> ProviderResult<Self> {
//!         if !path.exists() {
//!             return Err(ProviderError::not_found(path));
//!         }
//!         Ok(Self { path: path.to_path_buf() })
//!     }
//!
//!     fn get_data(&mut self) -> ProviderResult<Dataset> {
//!         Ok(Dataset::new())
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{Dataset, ProviderResult};

/// Static identity shared by every capability.
///
/// These functions must be pure: they are called during registration,
/// before any instance exists.
pub trait Provider: Send {
    /// Unique, stable format key within the capability (e.g. "sbe-cnv").
    fn format_key() -> &'static str
    where
        Self: Sized;

    /// Human-readable format name.
    fn format_name() -> &'static str
    where
        Self: Sized;

    /// File extensions used for inference (e.g. `[".cnv"]`).
    ///
    /// Plotters are never inferred from a path and leave this empty.
    fn file_extensions() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Turns a file into a [`Dataset`].
pub trait Reader: Provider {
    /// Open the file at `path`.
    ///
    /// Should fail with [`ProviderError::NotFound`](crate::ProviderError::NotFound)
    /// when the path does not exist.
    fn open(path: &Path) -> ProviderResult<Self>
    where
        Self: Sized;

    /// Open `path` with caller-supplied [`ReadOptions`].
    ///
    /// The default ignores the options; readers that understand a companion
    /// header file override this.
    fn open_with(path: &Path, options: &ReadOptions) -> ProviderResult<Self>
    where
        Self: Sized,
    {
        let _ = options;
        Self::open(path)
    }

    /// Parse the file into a dataset.
    ///
    /// Fails with [`ProviderError::Parse`](crate::ProviderError::Parse) on
    /// malformed content.
    fn get_data(&mut self) -> ProviderResult<Dataset>;
}

/// Turns a [`Dataset`] into a file.
pub trait Writer: Provider {
    /// Create a writer for `dataset`.
    fn create(dataset: Arc<Dataset>) -> ProviderResult<Self>
    where
        Self: Sized;

    /// Create or overwrite `destination`.
    ///
    /// Fails with [`ProviderError::Write`](crate::ProviderError::Write) on I/O
    /// failure or when the dataset cannot be represented by the format.
    fn write(&mut self, destination: &Path) -> ProviderResult<()>;
}

/// Renders a [`Dataset`].
pub trait Plotter: Provider {
    /// Create a plotter for `dataset`.
    fn create(dataset: Arc<Dataset>) -> ProviderResult<Self>
    where
        Self: Sized;

    /// Render the plot.
    ///
    /// Fails with [`ProviderError::Plot`](crate::ProviderError::Plot) when a
    /// requested parameter is missing from the dataset.
    fn plot(&mut self, options: &PlotOptions) -> ProviderResult<PlotArtifact>;
}

/// Options passed to [`Reader::open_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Companion header file for formats that keep metadata apart from data
    pub header_file: Option<PathBuf>,
}

impl ReadOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the companion header file.
    pub fn header_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.header_file = Some(path.into());
        self
    }
}

/// Options passed to [`Plotter::plot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotOptions {
    /// Variables to plot (empty = plotter default)
    pub parameters: Vec<String>,
    /// Bucket count for distribution plots
    pub bins: Option<usize>,
    /// Persist the rendered plot here instead of displaying it
    pub output_file: Option<PathBuf>,
    /// Plot title
    pub title: Option<String>,
    /// Plotter-specific options
    pub extra: BTreeMap<String, String>,
}

impl PlotOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameters to plot.
    pub fn parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Set the bucket count.
    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }

    /// Persist the plot to a file.
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a plotter-specific option.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// What a plotter produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotArtifact {
    /// Rendered interactively (to stdout for text plotters)
    Displayed,
    /// Persisted to a file
    Saved(PathBuf),
}
