// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! In-memory labelled array collection shared by all providers.
//!
//! A [`Dataset`] holds ordered dimensions, ordered variables and global
//! attributes. Variables carry an `ndarray` array whose shape always matches
//! the sizes of the dimensions they name. The registry and resolver never look
//! inside a dataset; only providers and the field-mapping step do.

use std::collections::BTreeMap;

use ndarray::{Array1, ArrayD};
use thiserror::Error;

/// Errors raised when a dataset would become inconsistent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// A variable with this name already exists
    #[error("variable '{0}' already exists")]
    DuplicateVariable(String),

    /// A variable names a dimension that was never declared
    #[error("variable '{variable}' uses undeclared dimension '{dimension}'")]
    UnknownDimension {
        /// Variable name
        variable: String,
        /// Missing dimension
        dimension: String,
    },

    /// A dimension was declared twice with different sizes
    #[error("dimension '{name}' already declared with size {existing}, got {requested}")]
    DimensionConflict {
        /// Dimension name
        name: String,
        /// Size already declared
        existing: usize,
        /// Size requested
        requested: usize,
    },

    /// Array shape disagrees with the declared dimension sizes
    #[error("variable '{variable}' has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Variable name
        variable: String,
        /// Shape derived from dimensions
        expected: Vec<usize>,
        /// Shape of the supplied array
        actual: Vec<usize>,
    },

    /// Variable lookup failed
    #[error("variable '{0}' not found")]
    VariableNotFound(String),
}

/// A named axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name (e.g. "scan", "time", "depth")
    pub name: String,
    /// Number of elements along the axis
    pub size: usize,
}

/// A named array over one or more dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Dimension names, outermost first
    pub dims: Vec<String>,
    /// Values; missing values are NaN
    pub data: ArrayD<f64>,
    /// Free-form attributes (units, long_name, ...)
    pub attrs: BTreeMap<String, String>,
    /// Whether the variable is a coordinate for its dimension
    pub is_coordinate: bool,
}

impl Variable {
    /// Create a variable from an array.
    pub fn new(name: impl Into<String>, dims: Vec<String>, data: ArrayD<f64>) -> Self {
        Self {
            name: name.into(),
            dims,
            data,
            attrs: BTreeMap::new(),
            is_coordinate: false,
        }
    }

    /// Create a one-dimensional variable from a vector of values.
    pub fn from_vec(name: impl Into<String>, dim: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, vec![dim.into()], Array1::from(values).into_dyn())
    }

    /// Set an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Mark the variable as a coordinate.
    pub fn as_coordinate(mut self) -> Self {
        self.is_coordinate = true;
        self
    }

    /// Units attribute, if any.
    pub fn units(&self) -> Option<&str> {
        self.attrs.get("units").map(String::as_str)
    }

    /// Minimum and maximum of the finite values, or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the variable holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Labelled multi-dimensional array collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    dims: Vec<Dimension>,
    variables: Vec<Variable>,
    /// Global attributes
    pub attrs: BTreeMap<String, String>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a dimension.
    ///
    /// Declaring an existing dimension with the same size is a no-op.
    pub fn add_dimension(
        &mut self,
        name: impl Into<String>,
        size: usize,
    ) -> Result<(), DatasetError> {
        let name = name.into();
        if let Some(existing) = self.dimension(&name) {
            if existing.size != size {
                return Err(DatasetError::DimensionConflict {
                    name,
                    existing: existing.size,
                    requested: size,
                });
            }
            return Ok(());
        }
        self.dims.push(Dimension { name, size });
        Ok(())
    }

    /// Add a variable, checking its name and shape.
    pub fn add_variable(&mut self, variable: Variable) -> Result<(), DatasetError> {
        if self.contains(&variable.name) {
            return Err(DatasetError::DuplicateVariable(variable.name));
        }

        let mut expected = Vec::with_capacity(variable.dims.len());
        for dim in &variable.dims {
            match self.dimension(dim) {
                Some(d) => expected.push(d.size),
                None => {
                    return Err(DatasetError::UnknownDimension {
                        variable: variable.name.clone(),
                        dimension: dim.clone(),
                    })
                }
            }
        }

        if variable.data.shape() != expected.as_slice() {
            return Err(DatasetError::ShapeMismatch {
                variable: variable.name.clone(),
                expected,
                actual: variable.data.shape().to_vec(),
            });
        }

        self.variables.push(variable);
        Ok(())
    }

    /// Set a global attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Look up a dimension.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dims.iter().find(|d| d.name == name)
    }

    /// All dimensions in declaration order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    /// Look up a variable.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// All variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Whether a variable with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// Variable names in insertion order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    /// Coordinate variables.
    pub fn coordinates(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.is_coordinate)
    }

    /// Non-coordinate variables.
    pub fn data_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| !v.is_coordinate)
    }

    /// Coordinate variable that indexes `dim`, if any.
    pub fn coordinate_for(&self, dim: &str) -> Option<&Variable> {
        self.coordinates()
            .find(|v| v.dims.len() == 1 && v.dims[0] == dim)
    }

    /// Rename several variables at once.
    ///
    /// `renames` maps source name to target name. All renames are applied
    /// simultaneously and each variable keeps its position. The caller is
    /// responsible for checking that targets do not collide.
    pub fn rename_variables(&mut self, renames: &BTreeMap<String, String>) {
        for variable in &mut self.variables {
            if let Some(target) = renames.get(&variable.name) {
                variable.name = target.clone();
            }
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the dataset has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
