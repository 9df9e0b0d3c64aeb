// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plugin discovery tests.
//!
//! The providers below live in a module registered at link time, exactly
//! the way a plugin crate linked into the host binary would register.

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::write_file;
use oceanio::registry::{
    CollisionKind, Manifest, ManifestEntry, PluginModule, ProviderExport, RegisteredModule,
};
use oceanio::{
    Capability, Dataset, Discovery, Dispatcher, Error, Origin, PlotArtifact, PlotOptions, Plotter,
    Provider, ProviderError, ProviderResult, Reader, Variable, Writer,
};

// ============================================================================
// Test plugin
// ============================================================================

fn tiny_dataset() -> Dataset {
    let mut ds = Dataset::new();
    ds.add_dimension("depth", 2).unwrap();
    ds.add_variable(Variable::from_vec("doxy", "depth", vec![210.0, 198.5]))
        .unwrap();
    ds
}

struct OdvReader {
    path: PathBuf,
}

impl Provider for OdvReader {
    fn format_key() -> &'static str {
        "odv"
    }

    fn format_name() -> &'static str {
        "ODV spreadsheet"
    }

    fn file_extensions() -> &'static [&'static str] {
        &["TXT", ".odv"]
    }
}

impl Reader for OdvReader {
    fn open(path: &Path) -> ProviderResult<Self> {
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn get_data(&mut self) -> ProviderResult<Dataset> {
        let mut ds = tiny_dataset();
        ds.set_attr("source_file", self.path.display().to_string());
        Ok(ds)
    }
}

/// Claims the same key as [`OdvReader`].
struct OtherOdvReader;

impl Provider for OtherOdvReader {
    fn format_key() -> &'static str {
        "odv"
    }

    fn format_name() -> &'static str {
        "Another ODV reader"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".odv"]
    }
}

impl Reader for OtherOdvReader {
    fn open(_path: &Path) -> ProviderResult<Self> {
        Ok(Self)
    }

    fn get_data(&mut self) -> ProviderResult<Dataset> {
        Ok(Dataset::new())
    }
}

/// Tries to take the built-in csv key.
struct ShadowCsvWriter;

impl Provider for ShadowCsvWriter {
    fn format_key() -> &'static str {
        "csv"
    }

    fn format_name() -> &'static str {
        "Shadow CSV"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".csv"]
    }
}

impl Writer for ShadowCsvWriter {
    fn create(_dataset: Arc<Dataset>) -> ProviderResult<Self> {
        Ok(Self)
    }

    fn write(&mut self, _destination: &Path) -> ProviderResult<()> {
        Err(ProviderError::write("shadow writer must never run"))
    }
}

/// Identity functions panic.
struct BrokenReader;

impl Provider for BrokenReader {
    fn format_key() -> &'static str {
        panic!("plugin state not initialized")
    }

    fn format_name() -> &'static str {
        "Broken"
    }
}

impl Reader for BrokenReader {
    fn open(_path: &Path) -> ProviderResult<Self> {
        Ok(Self)
    }

    fn get_data(&mut self) -> ProviderResult<Dataset> {
        Ok(Dataset::new())
    }
}

/// Panics while reading.
struct CrashingReader;

impl Provider for CrashingReader {
    fn format_key() -> &'static str {
        "crash"
    }

    fn format_name() -> &'static str {
        "Crashing reader"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".crash"]
    }
}

impl Reader for CrashingReader {
    fn open(_path: &Path) -> ProviderResult<Self> {
        Ok(Self)
    }

    fn get_data(&mut self) -> ProviderResult<Dataset> {
        panic!("decoder exploded")
    }
}

struct ProfilePlotter {
    dataset: Arc<Dataset>,
}

impl Provider for ProfilePlotter {
    fn format_key() -> &'static str {
        "profile"
    }

    fn format_name() -> &'static str {
        "Vertical profile"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".png"]
    }
}

impl Plotter for ProfilePlotter {
    fn create(dataset: Arc<Dataset>) -> ProviderResult<Self> {
        Ok(Self { dataset })
    }

    fn plot(&mut self, options: &PlotOptions) -> ProviderResult<PlotArtifact> {
        match &options.output_file {
            Some(path) => {
                std::fs::write(path, format!("{} variables\n", self.dataset.len()))
                    .map_err(|e| ProviderError::plot(e.to_string()))?;
                Ok(PlotArtifact::Saved(path.clone()))
            }
            None => Ok(PlotArtifact::Displayed),
        }
    }
}

struct OceanPlugin;

impl PluginModule for OceanPlugin {
    fn name(&self) -> &str {
        "ocean_plugin"
    }

    fn symbol(&self, symbol: &str) -> Option<ProviderExport> {
        match symbol {
            "OdvReader" => Some(ProviderExport::reader::<OdvReader>()),
            "OtherOdvReader" => Some(ProviderExport::reader::<OtherOdvReader>()),
            "ShadowCsvWriter" => Some(ProviderExport::writer::<ShadowCsvWriter>()),
            "BrokenReader" => Some(ProviderExport::reader::<BrokenReader>()),
            "CrashingReader" => Some(ProviderExport::reader::<CrashingReader>()),
            "ProfilePlotter" => Some(ProviderExport::plotter::<ProfilePlotter>()),
            "Exploding" => panic!("symbol table corrupted"),
            _ => None,
        }
    }
}

inventory::submit! { RegisteredModule(&OceanPlugin) }

fn entry(group: &str, name: &str, symbol: &str) -> ManifestEntry {
    ManifestEntry {
        group: group.to_string(),
        name: name.to_string(),
        module: "ocean_plugin".to_string(),
        symbol: symbol.to_string(),
    }
}

const MANIFEST: &str = r#"
version = 1

[[provider]]
group = "oceanio.readers"
name = "odv"
module = "ocean_plugin"
symbol = "OdvReader"

[[provider]]
group = "oceanio.plotters"
name = "profile"
module = "ocean_plugin"
symbol = "ProfilePlotter"
"#;

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_manifest_file_registers_plugins() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(dir.path(), "plugins.toml", MANIFEST);

    let (registry, report) = Discovery::new().with_manifest(&manifest).run();
    assert!(!report.has_problems(), "{report:?}");
    assert_eq!(report.loaded.len(), 2);
    let loaded = report.loaded_entry(Capability::Reader, "odv").unwrap();
    assert_eq!(loaded.reference, "ocean_plugin:OdvReader");

    let odv = registry.get(Capability::Reader, "odv").unwrap();
    assert_eq!(odv.origin, Origin::Plugin);
    let extensions: Vec<&str> = odv
        .descriptor
        .file_extensions
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(extensions, vec![".odv", ".txt"]);

    // Plotters never claim extensions.
    let profile = registry.get(Capability::Plotter, "profile").unwrap();
    assert!(profile.descriptor.file_extensions.is_empty());
}

#[test]
fn test_plugin_reader_and_plotter_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(dir.path(), "plugins.toml", MANIFEST);
    let input = write_file(dir.path(), "station.ODV", "placeholder\n");
    let (registry, _) = Discovery::new().with_manifest(&manifest).run();
    let dispatcher = Dispatcher::new(&registry);

    let summary = dispatcher.show(&input, None).unwrap();
    assert_eq!(summary.format, "odv");
    assert!(summary.variable("doxy").is_some());

    let out = dir.path().join("profile.png");
    let artifact = dispatcher
        .render("profile", &input, None, &PlotOptions::new().output_file(&out))
        .unwrap();
    assert_eq!(artifact, PlotArtifact::Saved(out.clone()));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "1 variables\n");
}

#[test]
fn test_discovery_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(dir.path(), "plugins.toml", MANIFEST);
    let discovery = Discovery::new().with_manifest(&manifest);

    let (first, first_report) = discovery.run();
    let (second, second_report) = discovery.run();
    assert_eq!(first.listing(), second.listing());
    assert_eq!(first_report, second_report);
}

// ============================================================================
// Collisions
// ============================================================================

#[test]
fn test_first_plugin_wins_conflict() {
    let manifest = Manifest::from_entries(vec![
        entry("oceanio.readers", "odv", "OdvReader"),
        entry("oceanio.readers", "odv-alt", "OtherOdvReader"),
    ]);
    let (registry, report) = Discovery::new().with_parsed_manifest(manifest).run();

    let odv = registry.get(Capability::Reader, "odv").unwrap();
    assert_eq!(odv.descriptor.display_name, "ODV spreadsheet");
    assert_eq!(report.collisions.len(), 1);
    let collision = &report.collisions[0];
    assert_eq!(collision.kind, CollisionKind::PluginConflict);
    assert_eq!(collision.kept, "odv");
    assert_eq!(collision.rejected, "odv-alt");
}

#[test]
fn test_builtin_keeps_its_key() {
    let manifest = Manifest::from_entries(vec![entry(
        "oceanio.writers",
        "shadow-csv",
        "ShadowCsvWriter",
    )]);
    let (registry, report) = Discovery::new().with_parsed_manifest(manifest).run();

    let csv = registry.get(Capability::Writer, "csv").unwrap();
    assert_eq!(csv.origin, Origin::Builtin);
    assert_eq!(csv.descriptor.display_name, "Comma-separated values");
    assert_eq!(report.collisions[0].kind, CollisionKind::BuiltinShadowsPlugin);
    assert_eq!(report.collisions[0].kept, "builtin");
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn test_broken_entries_do_not_affect_others() {
    let manifest = Manifest::from_entries(vec![
        entry("oceanio.readers", "broken", "BrokenReader"),
        entry("oceanio.readers", "exploding", "Exploding"),
        entry("oceanio.writers", "odv-as-writer", "OdvReader"),
        entry("oceanio.readers", "odv", "OdvReader"),
    ]);
    let (registry, report) = Discovery::new().with_parsed_manifest(manifest).run();

    assert_eq!(registry.keys(Capability::Reader), vec!["sbe-cnv", "csv", "json", "odv"]);
    let reasons: Vec<&str> = report.skipped.iter().map(|s| s.reason.as_str()).collect();
    assert_eq!(reasons.len(), 3);
    assert!(reasons[0].contains("plugin state not initialized"));
    assert!(reasons[1].contains("symbol table corrupted"));
    assert!(reasons[2].contains("does not implement write"));
}

#[test]
fn test_bad_manifests_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let malformed = write_file(dir.path(), "malformed.toml", "version = [\n");
    let future = write_file(dir.path(), "future.toml", "version = 2\n");
    let missing = dir.path().join("missing.toml");
    let good = write_file(dir.path(), "plugins.toml", MANIFEST);

    let (registry, report) = Discovery::new()
        .with_manifests([&malformed, &future, &missing, &good])
        .run();

    assert_eq!(report.skipped.len(), 3);
    assert!(report.skipped[1].reason.contains("unsupported manifest version 2"));
    assert!(registry.get(Capability::Reader, "odv").is_some());
}

#[test]
fn test_malformed_entry_skipped_alongside_good_entry() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(
        dir.path(),
        "plugins.toml",
        r#"
version = 1

[[provider]]
group = "oceanio.readers"
name = "odv"
module = "ocean_plugin"
symbol = "OdvReader"

[[provider]]
group = "oceanio.plotters"
name = "profile"
module = "ocean_plugin"
"#,
    );

    let (registry, report) = Discovery::new().with_manifest(&manifest).run();

    assert!(registry.get(Capability::Reader, "odv").is_some());
    assert!(registry.get(Capability::Plotter, "profile").is_none());
    assert_eq!(report.loaded.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    let skipped = &report.skipped[0];
    assert_eq!(skipped.name, "profile");
    assert_eq!(skipped.manifest, manifest.display().to_string());
    assert!(skipped.reason.contains("symbol"));
}

#[test]
fn test_plugin_panic_during_read_is_contained() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "cast.crash", "x\n");
    let manifest = Manifest::from_entries(vec![entry("oceanio.readers", "crash", "CrashingReader")]);
    let (registry, _) = Discovery::new().with_parsed_manifest(manifest).run();

    let err = Dispatcher::new(&registry).read(&input, None).unwrap_err();
    match err {
        Error::ProviderFailure { key, message } => {
            assert_eq!(key, "crash");
            assert!(message.contains("panicked in get_data"));
            assert!(message.contains("decoder exploded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_programmatic_module_shadows_linked_module() {
    use oceanio::registry::StaticModule;

    let module = StaticModule::new("ocean_plugin")
        .export("OdvReader", ProviderExport::reader::<OtherOdvReader>());
    let manifest = Manifest::from_entries(vec![entry("oceanio.readers", "odv", "OdvReader")]);
    let (registry, _) = Discovery::new()
        .with_module(Arc::new(module))
        .with_parsed_manifest(manifest)
        .run();

    let odv = registry.get(Capability::Reader, "odv").unwrap();
    assert_eq!(odv.descriptor.display_name, "Another ODV reader");
}
