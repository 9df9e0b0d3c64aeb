// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # oceanio CLI
//!
//! Convert, inspect and plot oceanographic instrument files.
//!
//! ## Usage
//!
//! ```sh
//! # Convert a Sea-Bird cast to CSV, renaming a column
//! oceanio convert -i cast_001.cnv -o cast_001.csv -m temperature=tv290C
//!
//! # Show dimensions, variables and ranges
//! oceanio show -i cast_001.cnv
//!
//! # Header kept in a separate file
//! oceanio show -i cast_001.asc -f sbe-cnv -H cast_001.hdr
//!
//! # Histogram of one variable
//! oceanio plot histogram -i cast_001.cnv -p tv290C --bins 20
//!
//! # List everything that is registered, plugins included
//! oceanio --manifest plugins.toml list --output json
//!
//! # Readers sorted by key, with the plugin entry behind each one
//! oceanio -v list readers --sort key
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{ConvertCmd, ListCmd, PlotCmd, ShowCmd};
use common::{init_tracing, level_for, load_settings, manifest_paths, Context, Result};

/// oceanio - Oceanographic data toolkit
///
/// Readers, writers and plotters are looked up by format key or inferred
/// from file extensions. Plugins are added with --manifest.
#[derive(Parser, Clone)]
#[command(name = "oceanio")]
#[command(about = "Oceanographic instrument data toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Plugin manifest to load (repeatable)
    #[arg(long = "manifest", global = true, value_name = "PATH")]
    manifests: Vec<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, env = "OCEANIO_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Convert a file to another format
    Convert(ConvertCmd),

    /// Show dimensions, variables and coordinate ranges
    Show(ShowCmd),

    /// Plot a file with a registered plotter
    Plot(PlotCmd),

    /// List registered readers, writers and plotters
    List(ListCmd),

    /// List registered readers
    #[command(hide = true)]
    Formats,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_ref())?;
    init_tracing(&level_for(cli.verbose, &settings.log.level));

    let ctx = Context::discover(manifest_paths(&settings, &cli.manifests));
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Convert(cmd) => cmd.run(&ctx),
        Commands::Show(cmd) => cmd.run(&ctx),
        Commands::Plot(cmd) => cmd.run(&ctx),
        Commands::List(cmd) => cmd.verbose(verbose).run(&ctx),
        Commands::Formats => ListCmd::readers().verbose(verbose).run(&ctx),
    }
}

fn main() {
    oceanio::registry::install_panic_hook();
    let result = run();

    if let Err(e) = result {
        let kind = e
            .downcast_ref::<oceanio::Error>()
            .map_or("Error", oceanio::Error::kind);
        eprintln!("{kind}: {e}");
        process::exit(1);
    }
}
