// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Distribution of each parameter as a horizontal bar histogram.

use std::fmt::Write;
use std::sync::Arc;

use super::{emit, extra_usize, label, select_parameters, Stats, DEFAULT_WIDTH};
use crate::core::{Dataset, ProviderError, ProviderResult, Variable};
use crate::io::traits::{PlotArtifact, PlotOptions, Plotter, Provider};

/// Bucket count when `bins` is not given.
pub const DEFAULT_BINS: usize = 30;

/// Largest accepted bucket count.
pub const MAX_BINS: usize = 10_000;

/// Text histogram plotter.
#[derive(Debug)]
pub struct HistogramPlotter {
    dataset: Arc<Dataset>,
}

impl Provider for HistogramPlotter {
    fn format_key() -> &'static str {
        "histogram"
    }

    fn format_name() -> &'static str {
        "Histogram Plot"
    }
}

impl Plotter for HistogramPlotter {
    fn create(dataset: Arc<Dataset>) -> ProviderResult<Self> {
        Ok(Self { dataset })
    }

    fn plot(&mut self, options: &PlotOptions) -> ProviderResult<PlotArtifact> {
        let bins = options.bins.unwrap_or(DEFAULT_BINS);
        if bins == 0 {
            return Err(ProviderError::plot("bins must be at least 1"));
        }
        if bins > MAX_BINS {
            return Err(ProviderError::plot(format!(
                "bins must be at most {MAX_BINS}, got {bins}"
            )));
        }
        let width = extra_usize(options, "width", DEFAULT_WIDTH)?;

        let mut out = String::new();
        for variable in select_parameters(&self.dataset, options)? {
            render(&mut out, variable, bins, width, options.title.as_deref())?;
        }
        emit(options, &out)
    }
}

/// Count values into `bins` equal-width buckets over their finite range.
///
/// Returns the lower edge of the first bucket, the bucket width and the
/// counts. A constant series is centred in a unit-wide range. Returns `None`
/// for a bucket count outside `1..=MAX_BINS`.
pub fn bucket(values: &[f64], bins: usize) -> Option<(f64, f64, Vec<usize>)> {
    if bins == 0 || bins > MAX_BINS {
        return None;
    }
    let stats = Stats::of(values)?;
    let (lo, hi) = if stats.min == stats.max {
        (stats.min - 0.5, stats.max + 0.5)
    } else {
        (stats.min, stats.max)
    };
    let step = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / step) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some((lo, step, counts))
}

fn render(
    out: &mut String,
    variable: &Variable,
    bins: usize,
    width: usize,
    title: Option<&str>,
) -> ProviderResult<()> {
    let values: Vec<f64> = variable.data.iter().copied().collect();
    let axis = label(variable);
    let (lo, step, counts) = bucket(&values, bins).ok_or_else(|| {
        ProviderError::plot(format!("parameter '{}' has no finite values", variable.name))
    })?;
    let stats = Stats::of(&values).ok_or_else(|| {
        ProviderError::plot(format!("parameter '{}' has no finite values", variable.name))
    })?;
    let peak = counts.iter().copied().max().unwrap_or(0).max(1);

    let heading = match title {
        Some(t) => t.to_string(),
        None => format!("Distribution of {axis}"),
    };
    let fmt_err = |_: std::fmt::Error| ProviderError::plot("formatting failed");
    writeln!(out, "{heading}").map_err(fmt_err)?;
    writeln!(out, "{axis}").map_err(fmt_err)?;
    for (i, count) in counts.iter().enumerate() {
        let start = lo + step * i as f64;
        let bar = "█".repeat(count * width / peak);
        writeln!(out, "{:>12.4} - {:>12.4} | {bar} {count}", start, start + step)
            .map_err(fmt_err)?;
    }
    writeln!(out, "{stats}").map_err(fmt_err)?;
    writeln!(out).map_err(fmt_err)?;
    Ok(())
}
