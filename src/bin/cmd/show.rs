// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Show command - print a file's dimensions, variables and ranges.

use std::path::PathBuf;

use clap::Args;

use crate::common::{read_options, Context, Result};
use oceanio::dispatch::Dispatcher;

/// Summarize a file's structure.
#[derive(Args, Clone, Debug)]
pub struct ShowCmd {
    /// Input file
    #[arg(short, long, value_name = "INPUT")]
    input: PathBuf,

    /// Reader format key (skips extension inference)
    #[arg(short = 'f', long, visible_alias = "input-format", value_name = "KEY")]
    format: Option<String>,

    /// Companion header file for formats that keep the header apart
    #[arg(short = 'H', long = "header-input", value_name = "FILE")]
    header_input: Option<PathBuf>,
}

impl ShowCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let summary = Dispatcher::new(&ctx.registry)
            .with_read_options(read_options(self.header_input.as_ref()))
            .show(&self.input, self.format.as_deref())?;
        println!("=== {} ===", self.input.display());
        print!("{summary}");
        Ok(())
    }
}
