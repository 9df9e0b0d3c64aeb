// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Structural summary of a dataset, as printed by `show`.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::{Dataset, Variable};

/// One variable in a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSummary {
    /// Variable name
    pub name: String,
    /// Dimension names
    pub dims: Vec<String>,
    /// Units attribute
    pub units: Option<String>,
    /// Long name attribute
    pub long_name: Option<String>,
    /// Finite value range
    pub range: Option<(f64, f64)>,
}

impl VariableSummary {
    fn of(variable: &Variable) -> Self {
        Self {
            name: variable.name.clone(),
            dims: variable.dims.clone(),
            units: variable.units().map(str::to_string),
            long_name: variable.attrs.get("long_name").cloned(),
            range: variable.finite_range(),
        }
    }
}

/// Dimensions, variables and coordinate ranges of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    /// Format key of the reader that produced the dataset
    pub format: String,
    /// (name, size) in declaration order
    pub dimensions: Vec<(String, usize)>,
    /// Coordinate variables
    pub coordinates: Vec<VariableSummary>,
    /// Data variables
    pub data_variables: Vec<VariableSummary>,
    /// Global attributes
    pub attributes: BTreeMap<String, String>,
}

impl DatasetSummary {
    /// Summarize `dataset`, read by the reader `format`.
    pub fn new(format: impl Into<String>, dataset: &Dataset) -> Self {
        Self {
            format: format.into(),
            dimensions: dataset
                .dimensions()
                .iter()
                .map(|d| (d.name.clone(), d.size))
                .collect(),
            coordinates: dataset.coordinates().map(VariableSummary::of).collect(),
            data_variables: dataset.data_variables().map(VariableSummary::of).collect(),
            attributes: dataset.attrs.clone(),
        }
    }

    /// Look up a variable (coordinate or data) by name.
    pub fn variable(&self, name: &str) -> Option<&VariableSummary> {
        self.coordinates
            .iter()
            .chain(&self.data_variables)
            .find(|v| v.name == name)
    }
}

fn write_variable(f: &mut fmt::Formatter<'_>, v: &VariableSummary) -> fmt::Result {
    write!(f, "  {:<16} ({})", v.name, v.dims.join(", "))?;
    if let Some(units) = &v.units {
        write!(f, " [{units}]")?;
    }
    match v.range {
        Some((lo, hi)) => write!(f, "  {lo} .. {hi}")?,
        None => write!(f, "  (no finite values)")?,
    }
    if let Some(long_name) = &v.long_name {
        write!(f, "  {long_name}")?;
    }
    writeln!(f)
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Dimensions:")?;
        for (name, size) in &self.dimensions {
            writeln!(f, "  {name}: {size}")?;
        }
        if !self.coordinates.is_empty() {
            writeln!(f, "Coordinates:")?;
            for v in &self.coordinates {
                write_variable(f, v)?;
            }
        }
        writeln!(f, "Data variables:")?;
        for v in &self.data_variables {
            write_variable(f, v)?;
        }
        if !self.attributes.is_empty() {
            writeln!(f, "Attributes:")?;
            for (key, value) in &self.attributes {
                writeln!(f, "  {key}: {value}")?;
            }
        }
        Ok(())
    }
}
