// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dataset transformations applied between reading and writing.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use oceanio::transform::FieldMapping;
//! use oceanio::Dataset;
//!
//! let mapping = FieldMapping::parse(["temperature=tv290C", "salinity=sal00"])?;
//! let mut dataset = Dataset::new();
//! let applied = mapping.apply(&mut dataset)?;
//! for rename in applied {
//!     println!("{rename}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod field_mapping;

pub use field_mapping::{AppliedRename, FieldMapping};
