// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dispatch engine: read, map, write, show and plot.
//!
//! Every operation resolves all the providers it needs before any of them is
//! instantiated, so a bad format key or extension never leaves a partial
//! output behind. Provider code runs behind a guard: provider errors are
//! translated into [`Error`], and anything else a provider raises, panics
//! included, becomes [`Error::ProviderFailure`]. Nothing is retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use oceanio::dispatch::{ConvertRequest, Dispatcher};
//! use oceanio::registry::Registry;
//!
//! let registry = Registry::builtin();
//! let dispatcher = Dispatcher::new(&registry);
//! let outcome = dispatcher.convert(
//!     ConvertRequest::new("cast_001.cnv", "cast_001.json").mapping(["temperature=tv290C"])?,
//! )?;
//! println!("{} -> {}", outcome.reader, outcome.writer);
//! # Ok::<(), oceanio::Error>(())
//! ```

pub mod summary;

pub use summary::{DatasetSummary, VariableSummary};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::{Dataset, Error, ProviderResult, Result};
use crate::io::detection::FormatResolver;
use crate::io::traits::{PlotArtifact, PlotOptions, ReadOptions};
use crate::registry::entry::contain;
use crate::registry::{ProviderEntry, ProviderFactory, Registry};
use crate::transform::{AppliedRename, FieldMapping};

/// Parameters of a conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertRequest {
    /// Input file
    pub input: PathBuf,
    /// Output file
    pub output: PathBuf,
    /// Explicit reader key
    pub input_format: Option<String>,
    /// Explicit writer key
    pub output_format: Option<String>,
    /// Variable renames applied between reading and writing
    pub mapping: FieldMapping,
}

impl ConvertRequest {
    /// Convert `input` to `output`, inferring both formats.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Set the reader key.
    pub fn input_format(mut self, key: impl Into<String>) -> Self {
        self.input_format = Some(key.into());
        self
    }

    /// Set the writer key.
    pub fn output_format(mut self, key: impl Into<String>) -> Self {
        self.output_format = Some(key.into());
        self
    }

    /// Parse and set `standard=source` field mapping pairs.
    pub fn mapping<I, S>(mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mapping = FieldMapping::parse(pairs)?;
        Ok(self)
    }

    /// Set an already built field mapping.
    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = mapping;
        self
    }
}

/// What a conversion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    /// Reader key
    pub reader: String,
    /// Writer key
    pub writer: String,
    /// Output path
    pub output: PathBuf,
    /// Renames that were applied
    pub renamed: Vec<AppliedRename>,
}

/// Runs operations against one registry.
///
/// [`ReadOptions`] set with [`Dispatcher::with_read_options`] are handed to
/// every reader this dispatcher opens.
#[derive(Debug, Clone)]
pub struct Dispatcher<'r> {
    resolver: FormatResolver<'r>,
    read_options: ReadOptions,
}

impl<'r> Dispatcher<'r> {
    /// Create a dispatcher.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            resolver: FormatResolver::new(registry),
            read_options: ReadOptions::default(),
        }
    }

    /// Pass `options` to every reader opened by this dispatcher.
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }

    /// Resolver used by this dispatcher.
    pub fn resolver(&self) -> FormatResolver<'r> {
        self.resolver
    }

    /// Read `input` into a dataset.
    pub fn read(&self, input: impl AsRef<Path>, format: Option<&str>) -> Result<Dataset> {
        let input = input.as_ref();
        let reader = self.resolver.resolve_reader(input, format)?;
        read_with(reader, input, &self.read_options)
    }

    /// Write `dataset` to `output`.
    ///
    /// The destination's parent directory is created when missing. Returns
    /// the writer key.
    pub fn write(
        &self,
        dataset: Arc<Dataset>,
        output: impl AsRef<Path>,
        format: Option<&str>,
    ) -> Result<String> {
        let output = output.as_ref();
        let writer = self.resolver.resolve_writer(output, format)?;
        write_with(writer, dataset, output)?;
        Ok(writer.key().to_string())
    }

    /// Read, apply the field mapping, write.
    pub fn convert(&self, request: ConvertRequest) -> Result<ConvertOutcome> {
        let reader = self
            .resolver
            .resolve_reader(&request.input, request.input_format.as_deref())?;
        let writer = self
            .resolver
            .resolve_writer(&request.output, request.output_format.as_deref())?;
        info!(
            input = %request.input.display(),
            output = %request.output.display(),
            reader = reader.key(),
            writer = writer.key(),
            "converting"
        );

        let mut dataset = read_with(reader, &request.input, &self.read_options)?;
        let renamed = if request.mapping.is_empty() {
            Vec::new()
        } else {
            request.mapping.apply(&mut dataset)?
        };
        write_with(writer, Arc::new(dataset), &request.output)?;

        Ok(ConvertOutcome {
            reader: reader.key().to_string(),
            writer: writer.key().to_string(),
            output: request.output,
            renamed,
        })
    }

    /// Read `input` and summarize its structure.
    pub fn show(&self, input: impl AsRef<Path>, format: Option<&str>) -> Result<DatasetSummary> {
        let input = input.as_ref();
        let reader = self.resolver.resolve_reader(input, format)?;
        let dataset = read_with(reader, input, &self.read_options)?;
        Ok(DatasetSummary::new(reader.key(), &dataset))
    }

    /// Read `input` and plot it with the plotter `plot_type`.
    pub fn render(
        &self,
        plot_type: &str,
        input: impl AsRef<Path>,
        format: Option<&str>,
        options: &PlotOptions,
    ) -> Result<PlotArtifact> {
        let input = input.as_ref();
        let plotter = self.resolver.resolve_plotter(plot_type)?;
        let reader = self.resolver.resolve_reader(input, format)?;
        let dataset = read_with(reader, input, &self.read_options)?;
        plot_with(plotter, Arc::new(dataset), options)
    }

    /// Plot an already loaded dataset.
    pub fn plot(
        &self,
        plot_type: &str,
        dataset: Arc<Dataset>,
        options: &PlotOptions,
    ) -> Result<PlotArtifact> {
        let plotter = self.resolver.resolve_plotter(plot_type)?;
        plot_with(plotter, dataset, options)
    }
}

fn read_with(entry: &ProviderEntry, input: &Path, options: &ReadOptions) -> Result<Dataset> {
    let mut required = std::iter::once(input).chain(options.header_file.as_deref());
    if let Some(missing) = required.find(|path| !path.exists()) {
        return Err(Error::NotFound {
            path: missing.to_path_buf(),
        });
    }
    let ProviderFactory::Reader(open) = entry.factory else {
        return Err(Error::provider_failure(entry.key(), "entry is not a reader"));
    };
    if let Some(header) = &options.header_file {
        debug!(reader = entry.key(), header = %header.display(), "passing header file");
    }
    let dataset = guarded(entry.key(), "get_data", || open(input, options)?.get_data())?;
    debug!(
        reader = entry.key(),
        variables = dataset.len(),
        dimensions = dataset.dimensions().len(),
        "read dataset"
    );
    Ok(dataset)
}

fn write_with(entry: &ProviderEntry, dataset: Arc<Dataset>, output: &Path) -> Result<()> {
    let ProviderFactory::Writer(create) = entry.factory else {
        return Err(Error::provider_failure(entry.key(), "entry is not a writer"));
    };
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::Write {
                format: entry.key().to_string(),
                message: format!("cannot create {}: {e}", parent.display()),
            })?;
        }
    }
    guarded(entry.key(), "write", || create(dataset)?.write(output))?;
    debug!(writer = entry.key(), output = %output.display(), "wrote dataset");
    Ok(())
}

fn plot_with(
    entry: &ProviderEntry,
    dataset: Arc<Dataset>,
    options: &PlotOptions,
) -> Result<PlotArtifact> {
    let ProviderFactory::Plotter(create) = entry.factory else {
        return Err(Error::provider_failure(entry.key(), "entry is not a plotter"));
    };
    let artifact = guarded(entry.key(), "plot", || create(dataset)?.plot(options))?;
    debug!(plotter = entry.key(), artifact = ?artifact, "plotted");
    Ok(artifact)
}

/// Run provider code, translating its errors and panics.
fn guarded<T>(key: &str, operation: &str, f: impl FnOnce() -> ProviderResult<T>) -> Result<T> {
    match contain(f) {
        Ok(result) => result.map_err(|e| Error::from_provider(key, e)),
        Err(message) => Err(Error::provider_failure(
            key,
            format!("panicked in {operation}: {message}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Variable;
    use crate::io::formats::json::JsonWriter;
    use crate::io::traits::Writer;

    fn write_profile(path: &Path) {
        let mut ds = Dataset::new();
        ds.add_dimension("scan", 2).unwrap();
        ds.add_variable(Variable::from_vec("tv290C", "scan", vec![10.0, 11.0]))
            .unwrap();
        JsonWriter::create(Arc::new(ds)).unwrap().write(path).unwrap();
    }

    #[test]
    fn test_convert_applies_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out/out.csv");
        write_profile(&input);

        let registry = Registry::builtin();
        let outcome = Dispatcher::new(&registry)
            .convert(
                ConvertRequest::new(&input, &output)
                    .mapping(["temperature=tv290C"])
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(outcome.reader, "json");
        assert_eq!(outcome.writer, "csv");
        assert_eq!(outcome.renamed.len(), 1);
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .starts_with("temperature\n"));
    }

    #[test]
    fn test_unresolved_output_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("sub/out.nc");
        write_profile(&input);

        let registry = Registry::builtin();
        let err = Dispatcher::new(&registry)
            .convert(ConvertRequest::new(&input, &output))
            .unwrap_err();
        assert_eq!(err.kind(), "UnresolvedFormatError");
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn test_output_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        write_profile(&input);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let registry = Registry::builtin();
        let err = Dispatcher::new(&registry)
            .convert(ConvertRequest::new(&input, blocker.join("out.csv")))
            .unwrap_err();
        assert_eq!(err.kind(), "WriteError");
        let Error::Write { format, .. } = err else {
            panic!("expected Write");
        };
        assert_eq!(format, "csv");
    }

    #[test]
    fn test_resolution_precedes_not_found() {
        let registry = Registry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let err = dispatcher.read("/no/such/file.xyz", None).unwrap_err();
        assert_eq!(err.kind(), "UnresolvedFormatError");
        let err = dispatcher.read("/no/such/file.cnv", None).unwrap_err();
        assert_eq!(err.kind(), "NotFoundError");
    }

    #[test]
    fn test_guard_translates_panic() {
        let err = guarded::<()>("boom", "write", || panic!("kaboom")).unwrap_err();
        match err {
            Error::ProviderFailure { key, message } => {
                assert_eq!(key, "boom");
                assert!(message.contains("kaboom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_show_reports_structure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        write_profile(&input);

        let registry = Registry::builtin();
        let summary = Dispatcher::new(&registry).show(&input, None).unwrap();
        assert_eq!(summary.format, "json");
        assert_eq!(summary.dimensions, vec![("scan".to_string(), 2)]);
        assert_eq!(summary.variable("tv290C").unwrap().range, Some((10.0, 11.0)));
    }
}
