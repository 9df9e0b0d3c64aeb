// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Comma-separated tables.
//!
//! The header row names the variables; every column becomes a variable over
//! a single `row` dimension. Empty cells and `NaN` are missing values.
//! Lines starting with `#` are comments.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{existing_input, prepare_output};
use crate::core::{Dataset, ProviderError, ProviderResult, Variable};
use crate::io::traits::{Provider, Reader, Writer};

/// Dimension used for CSV rows.
pub const ROW_DIM: &str = "row";

/// Reader for `.csv` tables.
#[derive(Debug)]
pub struct CsvReader {
    path: PathBuf,
}

impl Provider for CsvReader {
    fn format_key() -> &'static str {
        "csv"
    }

    fn format_name() -> &'static str {
        "Comma-separated values"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".csv"]
    }
}

impl Reader for CsvReader {
    fn open(path: &Path) -> ProviderResult<Self> {
        Ok(Self {
            path: existing_input(path)?,
        })
    }

    fn get_data(&mut self) -> ProviderResult<Dataset> {
        let reader = ::csv::ReaderBuilder::new()
            .trim(::csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(&self.path)
            .map_err(|e| ProviderError::parse(e.to_string()))?;
        let mut ds = parse_table(reader)?;
        ds.set_attr("source_file", self.path.display().to_string());
        Ok(ds)
    }
}

fn parse_table<R: std::io::Read>(mut reader: ::csv::Reader<R>) -> ProviderResult<Dataset> {
    let names: Vec<String> = reader
        .headers()
        .map_err(|e| ProviderError::parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if names.is_empty() || names.iter().any(String::is_empty) {
        return Err(ProviderError::parse("header row has empty column names"));
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for record in reader.records() {
        let record = record.map_err(|e| ProviderError::parse(e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line());
        for ((column, cell), name) in columns.iter_mut().zip(record.iter()).zip(&names) {
            column.push(parse_cell(cell).ok_or_else(|| {
                ProviderError::parse(format!(
                    "line {line}: column '{name}' has non-numeric value '{cell}'"
                ))
            })?);
        }
    }

    let rows = columns.first().map_or(0, Vec::len);
    let mut ds = Dataset::new();
    ds.add_dimension(ROW_DIM, rows)
        .map_err(|e| ProviderError::parse(e.to_string()))?;
    for (name, values) in names.into_iter().zip(columns) {
        ds.add_variable(Variable::from_vec(name, ROW_DIM, values))
            .map_err(|e| ProviderError::parse(e.to_string()))?;
    }
    Ok(ds)
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}

/// Writer for `.csv` tables.
///
/// Only datasets whose variables all lie along the same single dimension
/// can be written. Coordinates come first.
#[derive(Debug)]
pub struct CsvWriter {
    dataset: Arc<Dataset>,
}

impl Provider for CsvWriter {
    fn format_key() -> &'static str {
        "csv"
    }

    fn format_name() -> &'static str {
        "Comma-separated values"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".csv"]
    }
}

impl CsvWriter {
    /// Columns in output order, after checking the dataset is tabular.
    fn columns(&self) -> ProviderResult<Vec<&Variable>> {
        let ds = &self.dataset;
        let columns: Vec<&Variable> = ds.coordinates().chain(ds.data_variables()).collect();
        let first = columns
            .first()
            .ok_or_else(|| ProviderError::write("dataset has no variables"))?;
        let dim = match first.dims.as_slice() {
            [dim] => dim.clone(),
            _ => {
                return Err(ProviderError::write(format!(
                    "variable '{}' is not one-dimensional",
                    first.name
                )))
            }
        };
        if let Some(other) = columns.iter().find(|v| v.dims.len() != 1 || v.dims[0] != dim) {
            return Err(ProviderError::write(format!(
                "variable '{}' does not lie along dimension '{dim}'",
                other.name
            )));
        }
        Ok(columns)
    }
}

impl Writer for CsvWriter {
    fn create(dataset: Arc<Dataset>) -> ProviderResult<Self> {
        Ok(Self { dataset })
    }

    fn write(&mut self, destination: &Path) -> ProviderResult<()> {
        let columns = self.columns()?;
        prepare_output(destination)?;

        let write_err = |e: ::csv::Error| ProviderError::write(e.to_string());
        let mut writer = ::csv::Writer::from_path(destination).map_err(write_err)?;
        writer
            .write_record(columns.iter().map(|v| v.name.as_str()))
            .map_err(write_err)?;

        let rows = columns[0].len();
        let values: Vec<Vec<f64>> = columns
            .iter()
            .map(|v| v.data.iter().copied().collect())
            .collect();
        for row in 0..rows {
            writer
                .write_record(values.iter().map(|column| format_cell(column[row])))
                .map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|e| ProviderError::write(e.to_string()))
    }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
