// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! List command - show registered readers, writers and plotters.

use clap::{Args, ValueEnum};

use crate::common::{matches_filter, Context, Result};
use oceanio::registry::DiscoveryReport;
use oceanio::{Capability, FormatInfo, FormatListing};

/// Which capabilities to list.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListScope {
    #[default]
    All,
    Readers,
    Writers,
    Plotters,
}

impl ListScope {
    fn includes(self, capability: Capability) -> bool {
        match self {
            ListScope::All => true,
            ListScope::Readers => capability == Capability::Reader,
            ListScope::Writers => capability == Capability::Writer,
            ListScope::Plotters => capability == Capability::Plotter,
        }
    }
}

/// Output format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Row ordering.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Name,
    Key,
    /// First claimed extension
    Extension,
    /// Order the capability sections by name
    Type,
}

/// List registered providers.
#[derive(Args, Clone, Debug, Default)]
pub struct ListCmd {
    /// What to list
    #[arg(value_enum, default_value_t = ListScope::All)]
    scope: ListScope,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Only show providers whose key, name or extension contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Sort by field (default: registration order)
    #[arg(short, long, value_enum)]
    sort: Option<SortField>,

    /// Reverse the order
    #[arg(short, long)]
    reverse: bool,

    /// Print rows only, without section titles or column headers
    #[arg(long)]
    no_header: bool,

    /// Show the plugin entry behind each provider; set by the global -v/--verbose
    #[arg(skip)]
    verbose: bool,
}

impl ListCmd {
    /// Legacy `formats` command: readers as a table.
    pub fn readers() -> Self {
        Self {
            scope: ListScope::Readers,
            ..Self::default()
        }
    }

    /// `plot --list-plotters`: plotters as a table.
    pub fn plotters() -> Self {
        Self {
            scope: ListScope::Plotters,
            ..Self::default()
        }
    }

    /// Enable the extra columns.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn run(self, ctx: &Context) -> Result<()> {
        let listing = self.select(ctx.registry.listing());
        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
            OutputFormat::Table => self.print_table(&listing, &ctx.report),
        }
        Ok(())
    }

    fn select(&self, listing: FormatListing) -> FormatListing {
        let keep = |capability: Capability, rows: Vec<FormatInfo>| -> Vec<FormatInfo> {
            if !self.scope.includes(capability) {
                return Vec::new();
            }
            let mut rows: Vec<FormatInfo> = rows
                .into_iter()
                .filter(|row| {
                    let mut fields = vec![row.key.as_str(), row.name.as_str()];
                    fields.extend(row.extensions.iter().map(String::as_str));
                    matches_filter(self.filter.as_deref(), &fields)
                })
                .collect();
            self.order(&mut rows);
            rows
        };
        FormatListing {
            readers: keep(Capability::Reader, listing.readers),
            writers: keep(Capability::Writer, listing.writers),
            plotters: keep(Capability::Plotter, listing.plotters),
        }
    }

    fn order(&self, rows: &mut [FormatInfo]) {
        match self.sort {
            Some(SortField::Name) => rows.sort_by_key(|r| r.name.to_lowercase()),
            Some(SortField::Key) => rows.sort_by_key(|r| r.key.to_lowercase()),
            Some(SortField::Extension) => rows.sort_by_key(|r| {
                r.extensions
                    .first()
                    .map(|e| e.to_lowercase())
                    .unwrap_or_default()
            }),
            Some(SortField::Type) | None => {}
        }
        if self.reverse && self.sort != Some(SortField::Type) {
            rows.reverse();
        }
    }

    fn sections(&self) -> Vec<(Capability, &'static str)> {
        let mut sections = vec![
            (Capability::Reader, "Readers"),
            (Capability::Writer, "Writers"),
            (Capability::Plotter, "Plotters"),
        ];
        sections.retain(|(capability, _)| self.scope.includes(*capability));
        if self.sort == Some(SortField::Type) {
            sections.sort_by_key(|(_, title)| *title);
            if self.reverse {
                sections.reverse();
            }
        }
        sections
    }

    fn print_table(&self, listing: &FormatListing, report: &DiscoveryReport) {
        let typed = self.no_header && self.scope == ListScope::All;
        let mut first = true;
        for (capability, title) in self.sections() {
            let rows = listing.get(capability);
            if !self.no_header {
                if !first {
                    println!();
                }
                println!("{title} ({}):", rows.len());
                if rows.is_empty() {
                    println!("  (none)");
                }
            }
            first = false;
            if rows.is_empty() {
                continue;
            }

            let entries: Vec<String> = rows
                .iter()
                .map(|row| {
                    report
                        .loaded_entry(capability, &row.key)
                        .map_or_else(|| "-".to_string(), |e| format!("{} ({})", e.name, e.reference))
                })
                .collect();
            let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0).max(3);
            let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);

            if !self.no_header {
                let mut header = format!(
                    "  {:<key_width$}  {:<name_width$}  {:<12}  {:<7}",
                    "KEY", "NAME", "EXTENSIONS", "ORIGIN"
                );
                if self.verbose {
                    header.push_str("  ENTRY");
                }
                println!("{}", header.trim_end());
            }
            for (row, entry) in rows.iter().zip(&entries) {
                let extensions = if row.extensions.is_empty() {
                    "-".to_string()
                } else {
                    row.extensions.join(", ")
                };
                let mut line = if typed {
                    format!("{:<7} ", capability.as_str())
                } else {
                    "  ".to_string()
                };
                line.push_str(&format!(
                    "{:<key_width$}  {:<name_width$}  {:<12}  {:<7}",
                    row.key,
                    row.name,
                    extensions,
                    row.origin.as_str()
                ));
                if self.verbose {
                    line.push_str("  ");
                    line.push_str(entry);
                }
                println!("{}", line.trim_end());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceanio::Origin;

    fn row(key: &str, name: &str, extension: &str) -> FormatInfo {
        FormatInfo {
            key: key.to_string(),
            name: name.to_string(),
            extensions: vec![extension.to_string()],
            origin: Origin::Builtin,
        }
    }

    fn keys(rows: &[FormatInfo]) -> Vec<&str> {
        rows.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn test_order_by_field() {
        let rows = vec![
            row("sbe-cnv", "Sea-Bird CNV", ".cnv"),
            row("csv", "Comma-separated values", ".csv"),
            row("json", "JSON dataset document", ".json"),
        ];
        let mut cmd = ListCmd {
            sort: Some(SortField::Name),
            ..ListCmd::default()
        };

        let mut sorted = rows.clone();
        cmd.order(&mut sorted);
        assert_eq!(keys(&sorted), vec!["csv", "json", "sbe-cnv"]);

        cmd.sort = Some(SortField::Extension);
        cmd.reverse = true;
        let mut sorted = rows.clone();
        cmd.order(&mut sorted);
        assert_eq!(keys(&sorted), vec!["json", "csv", "sbe-cnv"]);

        cmd.sort = None;
        let mut sorted = rows;
        cmd.order(&mut sorted);
        assert_eq!(keys(&sorted), vec!["json", "csv", "sbe-cnv"]);
    }

    #[test]
    fn test_type_sort_orders_sections() {
        let cmd = ListCmd {
            sort: Some(SortField::Type),
            reverse: true,
            ..ListCmd::default()
        };
        let titles: Vec<&str> = cmd.sections().into_iter().map(|(_, t)| t).collect();
        assert_eq!(titles, vec!["Writers", "Readers", "Plotters"]);
    }
}
