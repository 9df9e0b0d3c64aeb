// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in providers, in registration order.

use super::entry::ProviderExport;
use crate::io::formats::cnv::CnvReader;
use crate::io::formats::csv::{CsvReader, CsvWriter};
use crate::io::formats::json::{JsonReader, JsonWriter};
use crate::plot::{HistogramPlotter, TimeSeriesPlotter};

/// Providers shipped with oceanio.
///
/// The order is fixed; it is the order entries appear in listings.
pub fn builtin_exports() -> Vec<ProviderExport> {
    vec![
        ProviderExport::reader::<CnvReader>(),
        ProviderExport::reader::<CsvReader>(),
        ProviderExport::reader::<JsonReader>(),
        ProviderExport::writer::<CsvWriter>(),
        ProviderExport::writer::<JsonWriter>(),
        ProviderExport::plotter::<HistogramPlotter>(),
        ProviderExport::plotter::<TimeSeriesPlotter>(),
    ]
}
