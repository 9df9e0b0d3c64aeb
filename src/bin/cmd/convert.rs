// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Convert command - read a file, rename variables, write another format.

use std::path::PathBuf;

use clap::Args;

use crate::common::{read_options, Context, Result};
use oceanio::dispatch::{ConvertRequest, Dispatcher};

/// Convert a file to another format.
#[derive(Args, Clone, Debug)]
pub struct ConvertCmd {
    /// Input file
    #[arg(short, long, value_name = "INPUT")]
    input: PathBuf,

    /// Companion header file for formats that keep the header apart
    #[arg(short = 'H', long = "header-input", value_name = "FILE")]
    header_input: Option<PathBuf>,

    /// Output file; its extension selects the writer unless --output-format is given
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Reader format key (skips extension inference)
    #[arg(short = 'f', long, visible_alias = "format", value_name = "KEY")]
    input_format: Option<String>,

    /// Writer format key (skips extension inference)
    #[arg(short = 'F', long, value_name = "KEY")]
    output_format: Option<String>,

    /// Rename variables, as space-separated standard_name=source_name pairs
    #[arg(short, long, num_args = 1.., value_name = "STD=SRC")]
    mapping: Vec<String>,
}

impl ConvertCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let mut request = ConvertRequest::new(&self.input, &self.output).mapping(&self.mapping)?;
        if let Some(key) = self.input_format {
            request = request.input_format(key);
        }
        if let Some(key) = self.output_format {
            request = request.output_format(key);
        }

        let outcome = Dispatcher::new(&ctx.registry)
            .with_read_options(read_options(self.header_input.as_ref()))
            .convert(request)?;

        println!("Converted:");
        println!("  Input:  {} ({})", self.input.display(), outcome.reader);
        println!("  Output: {} ({})", outcome.output.display(), outcome.writer);
        for rename in &outcome.renamed {
            println!("  Renamed: {rename}");
        }
        Ok(())
    }
}
