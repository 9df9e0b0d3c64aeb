// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plot command - render a file with a registered plotter.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Args;

use super::ListCmd;
use crate::common::{read_options, Context, Result};
use oceanio::dispatch::Dispatcher;
use oceanio::{PlotArtifact, PlotOptions};

/// Plot a file.
#[derive(Args, Clone, Debug)]
pub struct PlotCmd {
    /// Plotter key (see --list-plotters)
    #[arg(value_name = "PLOT_TYPE", required_unless_present = "list_plotters")]
    plot_type: Option<String>,

    /// List available plotters and exit
    #[arg(long)]
    list_plotters: bool,

    /// Input file
    #[arg(short, long, value_name = "INPUT", required_unless_present = "list_plotters")]
    input: Option<PathBuf>,

    /// Companion header file for formats that keep the header apart
    #[arg(short = 'H', long = "header-input", value_name = "FILE")]
    header_input: Option<PathBuf>,

    /// Reader format key (skips extension inference)
    #[arg(short = 'f', long, visible_alias = "input-format", value_name = "KEY")]
    format: Option<String>,

    /// Variables to plot (default: every data variable)
    #[arg(short, long = "parameter", num_args = 1.., value_name = "NAME")]
    parameters: Vec<String>,

    /// Save the plot here instead of printing it
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Plot title
    #[arg(short, long)]
    title: Option<String>,

    /// Number of histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Plotter-specific option (format: name=value)
    #[arg(short = 'x', long = "option", value_name = "NAME=VALUE")]
    options: Vec<String>,
}

impl PlotCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        if self.list_plotters {
            return ListCmd::plotters().run(ctx);
        }
        let (Some(plot_type), Some(input)) = (self.plot_type, self.input) else {
            bail!("A plot type and --input are required (see --list-plotters)");
        };

        let mut options = PlotOptions::new().parameters(&self.parameters);
        options.bins = self.bins;
        options.title = self.title;
        options.output_file = self.output;
        for option in &self.options {
            let (name, value) = option
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid plot option '{option}' (expected name=value)"))?;
            options = options.extra(name.trim(), value.trim());
        }

        let artifact = Dispatcher::new(&ctx.registry)
            .with_read_options(read_options(self.header_input.as_ref()))
            .render(&plot_type, &input, self.format.as_deref(), &options)?;
        if let PlotArtifact::Saved(path) = artifact {
            println!("Plot saved to {}", path.display());
        }
        Ok(())
    }
}
