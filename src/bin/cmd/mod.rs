// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod convert;
mod list;
mod plot;
mod show;

pub use convert::ConvertCmd;
pub use list::ListCmd;
pub use plot::PlotCmd;
pub use show::ShowCmd;
