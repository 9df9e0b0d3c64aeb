// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in file formats.
//!
//! - [`cnv`]: Sea-Bird CNV profile files (reader)
//! - [`csv`]: comma-separated tables (reader and writer)
//! - [`json`]: lossless dataset documents (reader and writer)

pub mod cnv;
pub mod csv;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{ProviderError, ProviderResult};

/// Check that an input path exists and return an owned copy.
pub(crate) fn existing_input(path: &Path) -> ProviderResult<PathBuf> {
    if !path.exists() {
        return Err(ProviderError::not_found(path));
    }
    Ok(path.to_path_buf())
}

/// Read an input file as text; undecodable bytes are replaced.
pub(crate) fn read_text(path: &Path) -> ProviderResult<String> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProviderError::not_found(path)
        } else {
            ProviderError::parse(format!("cannot read {}: {e}", path.display()))
        }
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Create the parent directory of an output path if needed.
pub(crate) fn prepare_output(destination: &Path) -> ProviderResult<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::write(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}
