// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Rename instrument variables to standard names.
//!
//! A mapping is a set of `standard_name=source_name` pairs. It is checked
//! twice: when parsed (targets and sources must be unique) and when applied
//! to a dataset (a target may not clobber a variable that stays in place).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{debug, warn};

use crate::core::{Dataset, Error, Result};

/// Source-to-target variable renames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    /// source name → standard name
    renames: BTreeMap<String, String>,
}

/// One rename that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRename {
    /// Name in the input dataset
    pub source: String,
    /// Name in the output dataset
    pub target: String,
}

impl fmt::Display for AppliedRename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

impl FieldMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `standard=source` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use oceanio::transform::FieldMapping;
    ///
    /// let mapping = FieldMapping::parse(["temperature=tv290C", "salinity=sal00"])?;
    /// assert_eq!(mapping.target_of("tv290C"), Some("temperature"));
    /// # Ok::<(), oceanio::Error>(())
    /// ```
    pub fn parse<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapping = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (target, source) = pair.split_once('=').ok_or_else(|| {
                Error::mapping(format!("expected 'standard=source', got '{pair}'"))
            })?;
            mapping.add(target.trim(), source.trim())?;
        }
        Ok(mapping)
    }

    /// Map `source` to `target`.
    pub fn add(&mut self, target: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let (target, source) = (target.into(), source.into());
        if target.is_empty() || source.is_empty() {
            return Err(Error::mapping(format!(
                "empty name in mapping '{target}={source}'"
            )));
        }
        if let Some(existing) = self.renames.get(&source) {
            return Err(Error::mapping(format!(
                "source '{source}' is mapped twice ('{existing}' and '{target}')"
            )));
        }
        if let Some((other, _)) = self.renames.iter().find(|(_, t)| **t == target) {
            return Err(Error::mapping(format!(
                "target '{target}' is mapped from both '{other}' and '{source}'"
            )));
        }
        self.renames.insert(source, target);
        Ok(())
    }

    /// Standard name for `source`, if mapped.
    pub fn target_of(&self, source: &str) -> Option<&str> {
        self.renames.get(source).map(String::as_str)
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.renames.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Rename variables in `dataset`.
    ///
    /// Sources missing from the dataset are skipped with a warning. A target
    /// that already names a variable which is not itself renamed away is an
    /// error, and the dataset is left untouched. Renames happen all at once,
    /// so swapping two names is allowed.
    pub fn apply(&self, dataset: &mut Dataset) -> Result<Vec<AppliedRename>> {
        let mut active = BTreeMap::new();
        for (source, target) in &self.renames {
            if dataset.contains(source) {
                active.insert(source.clone(), target.clone());
            } else {
                warn!(source = %source, target = %target, "mapped variable not in dataset, skipping");
            }
        }

        let renamed_away: BTreeSet<&str> = active
            .iter()
            .filter(|(s, t)| s != t)
            .map(|(s, _)| s.as_str())
            .collect();
        for (source, target) in &active {
            if source != target && dataset.contains(target) && !renamed_away.contains(target.as_str())
            {
                return Err(Error::mapping(format!(
                    "cannot rename '{source}' to '{target}': '{target}' already exists"
                )));
            }
        }

        dataset.rename_variables(&active);
        let applied: Vec<AppliedRename> = active
            .into_iter()
            .map(|(source, target)| AppliedRename { source, target })
            .collect();
        debug!(count = applied.len(), "applied field mapping");
        Ok(applied)
    }
}
