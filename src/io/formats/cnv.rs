// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sea-Bird CNV reader.
//!
//! # CNV Structure
//!
//! ## Header
//! - `* ...` lines: instrument header written by the deck unit
//! - `** ...` lines: user-entered header (`** Ship: ...`)
//! - `# name i = short: long [unit]`: column definitions, in column order
//! - `# bad_flag = -9.990e-29`: fill value for missing samples
//! - other `# key = value` lines: processing metadata
//! - `*END*`: end of header
//!
//! ## Data
//! One scan per line, whitespace-separated numeric columns.
//!
//! Each column becomes a variable over the `scan` dimension, named by its
//! short name. Samples equal to the bad flag are stored as NaN.

use std::path::{Path, PathBuf};

use regex::Regex;

use super::{existing_input, read_text};
use crate::core::{Dataset, ProviderError, ProviderResult, Variable};
use crate::io::traits::{Provider, ReadOptions, Reader};

/// Dimension used for CNV scans.
pub const SCAN_DIM: &str = "scan";

/// Header terminator line.
const END_MARKER: &str = "*END*";

/// Column short names that index elapsed time; the first one present becomes
/// the scan coordinate.
const TIME_COLUMNS: &[&str] = &["timeS", "timeM", "timeH", "timeJ", "timeQ", "timeY", "timeK"];

/// One `# name` header line.
#[derive(Debug, Clone, PartialEq)]
pub struct CnvColumn {
    /// Column index from the header
    pub index: usize,
    /// Sea-Bird short name (e.g. "t090C")
    pub short_name: String,
    /// Long description
    pub long_name: String,
    /// Unit from the trailing brackets, if any
    pub unit: Option<String>,
}

/// Parsed CNV header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CnvHeader {
    /// Column definitions, in column order
    pub columns: Vec<CnvColumn>,
    /// Fill value marking missing samples
    pub bad_flag: Option<f64>,
    /// `# key = value` and `** key: value` metadata
    pub metadata: Vec<(String, String)>,
    /// First `*` line, identifying the instrument
    pub instrument: Option<String>,
}

struct HeaderPatterns {
    name: Regex,
    unit: Regex,
    keyed: Regex,
    user: Regex,
}

impl HeaderPatterns {
    fn compile() -> ProviderResult<Self> {
        let build = |pattern: &str| Regex::new(pattern).map_err(ProviderError::other);
        Ok(Self {
            name: build(r"^#\s*name\s+(\d+)\s*=\s*([^:]+?)\s*:\s*(.*?)\s*$")?,
            unit: build(r"^(.*?)\s*\[([^\]]*)\]\s*$")?,
            keyed: build(r"^#\s*([A-Za-z_][\w ]*?)\s*=\s*(.*?)\s*$")?,
            user: build(r"^\*\*\s*([^:]+?)\s*:\s*(.*?)\s*$")?,
        })
    }
}

/// Parse the header and data of a CNV document.
pub fn parse_cnv(text: &str) -> ProviderResult<Dataset> {
    let patterns = HeaderPatterns::compile()?;
    let mut header = CnvHeader::default();
    let mut lines = text.lines().enumerate();
    if !read_header(lines.by_ref().map(|(_, line)| line), &patterns, &mut header)? {
        return Err(ProviderError::parse(format!(
            "missing '{END_MARKER}' header terminator"
        )));
    }
    let columns = read_data(lines, &mut header)?;
    build_dataset(header, columns)
}

/// Parse a CNV split into a header file and a data file.
///
/// The header file holds the `*` and `#` lines; its `*END*` terminator is
/// optional. When the data file starts with its own terminated header, those
/// lines are parsed after the companion's and may add columns or metadata.
pub fn parse_cnv_parts(header_text: &str, data_text: &str) -> ProviderResult<Dataset> {
    let patterns = HeaderPatterns::compile()?;
    let mut header = CnvHeader::default();
    read_header(header_text.lines(), &patterns, &mut header)?;

    let data = match data_text.lines().position(|line| line.trim() == END_MARKER) {
        Some(end) => {
            read_header(data_text.lines().take(end), &patterns, &mut header)?;
            data_text.lines().enumerate().skip(end + 1)
        }
        None => data_text.lines().enumerate().skip(0),
    };
    let columns = read_data(data, &mut header)?;
    build_dataset(header, columns)
}

/// Parse header lines until `*END*`. Returns whether the terminator was seen.
fn read_header<'a>(
    lines: impl Iterator<Item = &'a str>,
    patterns: &HeaderPatterns,
    header: &mut CnvHeader,
) -> ProviderResult<bool> {
    for line in lines {
        let line = line.trim_end();
        if line.trim() == END_MARKER {
            return Ok(true);
        }
        parse_header_line(line, patterns, header)?;
    }
    Ok(false)
}

/// Parse numbered data rows into one vector per column.
fn read_data<'a>(
    lines: impl Iterator<Item = (usize, &'a str)>,
    header: &mut CnvHeader,
) -> ProviderResult<Vec<Vec<f64>>> {
    if header.columns.is_empty() {
        return Err(ProviderError::parse("no '# name' column definitions"));
    }
    header.columns.sort_by_key(|c| c.index);

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); header.columns.len()];
    for (number, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != columns.len() {
            return Err(ProviderError::parse(format!(
                "line {}: expected {} columns, found {}",
                number + 1,
                columns.len(),
                fields.len()
            )));
        }
        for (column, field) in columns.iter_mut().zip(fields) {
            let value: f64 = field.parse().map_err(|_| {
                ProviderError::parse(format!("line {}: invalid number '{field}'", number + 1))
            })?;
            column.push(match header.bad_flag {
                Some(flag) if is_bad(value, flag) => f64::NAN,
                _ => value,
            });
        }
    }
    Ok(columns)
}

fn parse_header_line(
    line: &str,
    patterns: &HeaderPatterns,
    header: &mut CnvHeader,
) -> ProviderResult<()> {
    if let Some(caps) = patterns.name.captures(line) {
        let index = caps[1]
            .parse()
            .map_err(|_| ProviderError::parse(format!("invalid column index in '{line}'")))?;
        let description = caps[3].to_string();
        let (long_name, unit) = match patterns.unit.captures(&description) {
            Some(u) => (u[1].to_string(), Some(u[2].trim().to_string())),
            None => (description, None),
        };
        header.columns.push(CnvColumn {
            index,
            short_name: caps[2].to_string(),
            long_name,
            unit,
        });
    } else if let Some(caps) = patterns.keyed.captures(line) {
        let key = caps[1].trim().to_string();
        let value = caps[2].to_string();
        if key == "bad_flag" {
            let flag = value
                .parse()
                .map_err(|_| ProviderError::parse(format!("invalid bad_flag '{value}'")))?;
            header.bad_flag = Some(flag);
        }
        if !key.starts_with("span") {
            header.metadata.push((key, value));
        }
    } else if let Some(caps) = patterns.user.captures(line) {
        header
            .metadata
            .push((caps[1].to_lowercase().replace(' ', "_"), caps[2].to_string()));
    } else if header.instrument.is_none() && line.starts_with('*') && !line.starts_with("**") {
        let instrument = line.trim_start_matches('*').trim();
        if !instrument.is_empty() {
            header.instrument = Some(instrument.to_string());
        }
    }
    Ok(())
}

fn is_bad(value: f64, flag: f64) -> bool {
    value == flag || (value - flag).abs() <= flag.abs() * 1e-6
}

fn build_dataset(header: CnvHeader, columns: Vec<Vec<f64>>) -> ProviderResult<Dataset> {
    let scans = columns.first().map_or(0, Vec::len);
    let coordinate = TIME_COLUMNS
        .iter()
        .find(|name| header.columns.iter().any(|c| c.short_name == **name))
        .copied();

    let mut ds = Dataset::new();
    ds.add_dimension(SCAN_DIM, scans)
        .map_err(|e| ProviderError::parse(e.to_string()))?;

    for (column, values) in header.columns.into_iter().zip(columns) {
        let mut variable = Variable::from_vec(&column.short_name, SCAN_DIM, values)
            .with_attr("long_name", column.long_name);
        if let Some(unit) = column.unit {
            variable = variable.with_attr("units", unit);
        }
        if coordinate == Some(column.short_name.as_str()) {
            variable = variable.as_coordinate();
        }
        ds.add_variable(variable)
            .map_err(|e| ProviderError::parse(e.to_string()))?;
    }

    if let Some(instrument) = header.instrument {
        ds.set_attr("instrument", instrument);
    }
    for (key, value) in header.metadata {
        ds.set_attr(key, value);
    }
    Ok(ds)
}

/// Reader for Sea-Bird `.cnv` files.
///
/// Opened with a header file (see [`ReadOptions`]), the header
/// is taken from that file and the data file may hold bare scan rows.
#[derive(Debug)]
pub struct CnvReader {
    path: PathBuf,
    header_file: Option<PathBuf>,
}

impl Provider for CnvReader {
    fn format_key() -> &'static str {
        "sbe-cnv"
    }

    fn format_name() -> &'static str {
        "Sea-Bird CNV"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".cnv"]
    }
}

impl Reader for CnvReader {
    fn open(path: &Path) -> ProviderResult<Self> {
        Self::open_with(path, &ReadOptions::default())
    }

    fn open_with(path: &Path, options: &ReadOptions) -> ProviderResult<Self> {
        let header_file = match &options.header_file {
            Some(header) => Some(existing_input(header)?),
            None => None,
        };
        Ok(Self {
            path: existing_input(path)?,
            header_file,
        })
    }

    fn get_data(&mut self) -> ProviderResult<Dataset> {
        let text = read_text(&self.path)?;
        let mut ds = match &self.header_file {
            Some(header) => {
                let mut ds = parse_cnv_parts(&read_text(header)?, &text)?;
                ds.set_attr("header_file", header.display().to_string());
                ds
            }
            None => parse_cnv(&text)?,
        };
        ds.set_attr("source_file", self.path.display().to_string());
        Ok(ds)
    }
}
