// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in text plotters.
//!
//! Plots are rendered as plain text. Without `output_file` they are written
//! to stdout; with it they are saved to that path.

pub mod histogram;
pub mod time_series;

pub use histogram::HistogramPlotter;
pub use time_series::TimeSeriesPlotter;

use std::fmt;
use std::fs;
use std::io::Write;

use crate::core::{Dataset, ProviderError, ProviderResult, Variable};
use crate::io::formats::prepare_output;
use crate::io::traits::{PlotArtifact, PlotOptions};

/// Default width of bars and sparklines, in characters.
pub const DEFAULT_WIDTH: usize = 40;

/// Variables a plot should cover.
///
/// An empty parameter list selects every data variable.
pub(crate) fn select_parameters<'a>(
    dataset: &'a Dataset,
    options: &PlotOptions,
) -> ProviderResult<Vec<&'a Variable>> {
    if options.parameters.is_empty() {
        let all: Vec<&Variable> = dataset.data_variables().collect();
        if all.is_empty() {
            return Err(ProviderError::plot("dataset has no data variables"));
        }
        return Ok(all);
    }

    options
        .parameters
        .iter()
        .map(|name| {
            dataset.variable(name).ok_or_else(|| {
                ProviderError::plot(format!(
                    "parameter '{name}' not found in dataset. Available: {}",
                    dataset.variable_names().join(", ")
                ))
            })
        })
        .collect()
}

/// Read a positive integer plotter option from `extra`.
pub(crate) fn extra_usize(options: &PlotOptions, name: &str, default: usize) -> ProviderResult<usize> {
    match options.extra.get(name) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ProviderError::plot(format!(
                "option '{name}' must be a positive integer, got '{raw}'"
            ))),
        },
    }
}

/// Axis label: long name with units.
pub(crate) fn label(variable: &Variable) -> String {
    let name = variable
        .attrs
        .get("long_name")
        .cloned()
        .unwrap_or_else(|| variable.name.clone());
    match variable.units() {
        Some(units) if !units.is_empty() => format!("{name} ({units})"),
        _ => name,
    }
}

/// Display or save a rendered plot.
pub(crate) fn emit(options: &PlotOptions, rendered: &str) -> ProviderResult<PlotArtifact> {
    match &options.output_file {
        Some(path) => {
            prepare_output(path).map_err(|e| ProviderError::plot(e.to_string()))?;
            fs::write(path, rendered).map_err(|e| {
                ProviderError::plot(format!("cannot save plot to {}: {e}", path.display()))
            })?;
            Ok(PlotArtifact::Saved(path.clone()))
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(rendered.as_bytes())
                .and_then(|_| lock.flush())
                .map_err(ProviderError::other)?;
            Ok(PlotArtifact::Displayed)
        }
    }
}

/// Summary statistics over the finite values of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Number of finite values
    pub n: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Population standard deviation
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// Maximum
    pub max: f64,
}

impl Stats {
    /// Compute statistics, or `None` when there are no finite values.
    pub fn of(values: &[f64]) -> Option<Self> {
        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        finite.sort_by(f64::total_cmp);
        let n = finite.len();
        let mean = finite.iter().sum::<f64>() / n as f64;
        let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            finite[n / 2]
        } else {
            (finite[n / 2 - 1] + finite[n / 2]) / 2.0
        };
        Some(Self {
            n,
            mean,
            median,
            std: variance.sqrt(),
            min: finite[0],
            max: finite[n - 1],
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n = {}  mean = {:.2}  median = {:.2}  std = {:.2}  min = {:.2}  max = {:.2}",
            self.n, self.mean, self.median, self.std, self.min, self.max
        )
    }
}
