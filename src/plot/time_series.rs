// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sparkline of each parameter against its coordinate.

use std::fmt::Write;
use std::sync::Arc;

use super::{emit, extra_usize, label, select_parameters, Stats};
use crate::core::{Dataset, ProviderError, ProviderResult, Variable};
use crate::io::traits::{PlotArtifact, PlotOptions, Plotter, Provider};

const TICKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Sparkline width when the `width` option is not given.
pub const DEFAULT_SPARK_WIDTH: usize = 60;

/// Text time-series plotter.
#[derive(Debug)]
pub struct TimeSeriesPlotter {
    dataset: Arc<Dataset>,
}

impl Provider for TimeSeriesPlotter {
    fn format_key() -> &'static str {
        "time-series"
    }

    fn format_name() -> &'static str {
        "Time Series Plot"
    }
}

impl Plotter for TimeSeriesPlotter {
    fn create(dataset: Arc<Dataset>) -> ProviderResult<Self> {
        Ok(Self { dataset })
    }

    fn plot(&mut self, options: &PlotOptions) -> ProviderResult<PlotArtifact> {
        let width = extra_usize(options, "width", DEFAULT_SPARK_WIDTH)?;
        let mut out = String::new();
        if let Some(title) = &options.title {
            out.push_str(title);
            out.push('\n');
        }
        for variable in select_parameters(&self.dataset, options)? {
            if variable.dims.len() != 1 {
                return Err(ProviderError::plot(format!(
                    "parameter '{}' is not one-dimensional",
                    variable.name
                )));
            }
            let x_axis = self.dataset.coordinate_for(&variable.dims[0]);
            render(&mut out, variable, x_axis, width)?;
        }
        emit(options, &out)
    }
}

/// Average consecutive samples so at most `width` points remain.
///
/// NaN samples are ignored; a bucket of only NaN stays NaN.
pub fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width || width == 0 {
        return values.to_vec();
    }
    (0..width)
        .map(|i| {
            let start = i * values.len() / width;
            let end = ((i + 1) * values.len() / width).max(start + 1);
            let finite: Vec<f64> = values[start..end]
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            if finite.is_empty() {
                f64::NAN
            } else {
                finite.iter().sum::<f64>() / finite.len() as f64
            }
        })
        .collect()
}

/// Render values as block characters scaled between `min` and `max`.
pub fn sparkline(values: &[f64]) -> String {
    let Some(stats) = Stats::of(values) else {
        return " ".repeat(values.len());
    };
    let span = stats.max - stats.min;
    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                ' '
            } else if span == 0.0 {
                TICKS[TICKS.len() / 2]
            } else {
                let level = ((v - stats.min) / span * (TICKS.len() - 1) as f64).round() as usize;
                TICKS[level.min(TICKS.len() - 1)]
            }
        })
        .collect()
}

fn render(
    out: &mut String,
    variable: &Variable,
    x_axis: Option<&Variable>,
    width: usize,
) -> ProviderResult<()> {
    let values: Vec<f64> = variable.data.iter().copied().collect();
    let line = sparkline(&downsample(&values, width));
    let x_label = match x_axis.and_then(|x| x.finite_range().map(|r| (x, r))) {
        Some((x, (lo, hi))) => format!("{} {lo} .. {hi}", label(x)),
        None => format!("index 0 .. {}", values.len().saturating_sub(1)),
    };
    let fmt_err = |_: std::fmt::Error| ProviderError::plot("formatting failed");
    writeln!(out, "{}", label(variable)).map_err(fmt_err)?;
    writeln!(out, "  {line}").map_err(fmt_err)?;
    let y_label = match Stats::of(&values) {
        Some(stats) => format!("{:.4} .. {:.4}", stats.min, stats.max),
        None => "no finite values".to_string(),
    };
    writeln!(out, "  x: {x_label}  y: {y_label}").map_err(fmt_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_scales_to_range() {
        assert_eq!(sparkline(&[0.0, 7.0]), "▁█");
        assert_eq!(sparkline(&[1.0, f64::NAN, 1.0]), "▅ ▅");
        assert_eq!(sparkline(&[f64::NAN]), " ");
    }

    #[test]
    fn test_downsample_averages() {
        assert_eq!(downsample(&[1.0, 3.0, 5.0, 7.0], 2), vec![2.0, 6.0]);
        assert_eq!(downsample(&[1.0, 2.0], 5), vec![1.0, 2.0]);
        let out = downsample(&[f64::NAN, f64::NAN, 1.0, 1.0], 2);
        assert!(out[0].is_nan());
    }

    #[test]
    fn test_plot_uses_coordinate_axis() {
        let mut ds = Dataset::new();
        ds.add_dimension("scan", 3).unwrap();
        ds.add_variable(
            Variable::from_vec("timeS", "scan", vec![0.0, 0.5, 1.0])
                .with_attr("units", "s")
                .as_coordinate(),
        )
        .unwrap();
        ds.add_variable(Variable::from_vec("t", "scan", vec![10.0, 11.0, 12.0]))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");

        TimeSeriesPlotter::create(Arc::new(ds))
            .unwrap()
            .plot(&PlotOptions::new().parameters(["t"]).title("Cast 1").output_file(&path))
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Cast 1\nt\n"));
        assert!(text.contains("x: timeS (s) 0 .. 1"));
    }

    #[test]
    fn test_render_without_finite_values() {
        let variable = Variable::from_vec("sal", "scan", vec![f64::NAN, f64::NAN]);
        let mut out = String::new();
        render(&mut out, &variable, None, DEFAULT_SPARK_WIDTH).unwrap();
        assert_eq!(out, "sal\n    \n  x: index 0 .. 1  y: no finite values\n");
    }
}
