// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON dataset documents.
//!
//! A self-describing layout that keeps dimension order, variable order,
//! attributes and coordinate flags:
//!
//! ```json
//! {
//!   "dimensions": [{ "name": "scan", "size": 2 }],
//!   "variables": [
//!     {
//!       "name": "tv290C",
//!       "dims": ["scan"],
//!       "shape": [2],
//!       "data": [10.5, null],
//!       "attrs": { "units": "ITS-90, deg C" },
//!       "coordinate": false
//!     }
//!   ],
//!   "attributes": { "ship": "RV Poseidon" }
//! }
//! ```
//!
//! Data is flattened in row-major order. Missing values (NaN) are `null`
//! and infinities are the strings `"inf"` and `"-inf"`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use super::{existing_input, prepare_output, read_text};
use crate::core::{Dataset, ProviderError, ProviderResult, Variable};
use crate::io::traits::{Provider, Reader, Writer};

#[derive(Debug, Serialize, Deserialize)]
struct DimensionDoc {
    name: String,
    size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Infinity {
    #[serde(rename = "inf")]
    Positive,
    #[serde(rename = "-inf")]
    Negative,
}

/// One non-missing sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Sample {
    Finite(f64),
    Infinite(Infinity),
}

impl Sample {
    fn encode(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value == f64::INFINITY {
            Some(Sample::Infinite(Infinity::Positive))
        } else if value == f64::NEG_INFINITY {
            Some(Sample::Infinite(Infinity::Negative))
        } else {
            Some(Sample::Finite(value))
        }
    }

    fn decode(sample: Option<Self>) -> f64 {
        match sample {
            Some(Sample::Finite(value)) => value,
            Some(Sample::Infinite(Infinity::Positive)) => f64::INFINITY,
            Some(Sample::Infinite(Infinity::Negative)) => f64::NEG_INFINITY,
            None => f64::NAN,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct VariableDoc {
    name: String,
    dims: Vec<String>,
    shape: Vec<usize>,
    data: Vec<Option<Sample>>,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    #[serde(default)]
    coordinate: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct DatasetDoc {
    #[serde(default)]
    dimensions: Vec<DimensionDoc>,
    #[serde(default)]
    variables: Vec<VariableDoc>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl DatasetDoc {
    fn from_dataset(ds: &Dataset) -> Self {
        Self {
            dimensions: ds
                .dimensions()
                .iter()
                .map(|d| DimensionDoc {
                    name: d.name.clone(),
                    size: d.size,
                })
                .collect(),
            variables: ds
                .variables()
                .iter()
                .map(|v| VariableDoc {
                    name: v.name.clone(),
                    dims: v.dims.clone(),
                    shape: v.data.shape().to_vec(),
                    data: v.data.iter().map(|&x| Sample::encode(x)).collect(),
                    attrs: v.attrs.clone(),
                    coordinate: v.is_coordinate,
                })
                .collect(),
            attributes: ds.attrs.clone(),
        }
    }

    fn into_dataset(self) -> ProviderResult<Dataset> {
        let mut ds = Dataset::new();
        for dim in self.dimensions {
            ds.add_dimension(dim.name, dim.size)
                .map_err(|e| ProviderError::parse(e.to_string()))?;
        }
        for var in self.variables {
            let values: Vec<f64> = var.data.into_iter().map(Sample::decode).collect();
            let data = ArrayD::from_shape_vec(IxDyn(&var.shape), values).map_err(|e| {
                ProviderError::parse(format!("variable '{}': {e}", var.name))
            })?;
            let mut variable = Variable::new(var.name, var.dims, data);
            variable.attrs = var.attrs;
            variable.is_coordinate = var.coordinate;
            ds.add_variable(variable)
                .map_err(|e| ProviderError::parse(e.to_string()))?;
        }
        ds.attrs = self.attributes;
        Ok(ds)
    }
}

/// Reader for `.json` dataset documents.
#[derive(Debug)]
pub struct JsonReader {
    path: PathBuf,
}

impl Provider for JsonReader {
    fn format_key() -> &'static str {
        "json"
    }

    fn format_name() -> &'static str {
        "JSON dataset document"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".json"]
    }
}

impl Reader for JsonReader {
    fn open(path: &Path) -> ProviderResult<Self> {
        Ok(Self {
            path: existing_input(path)?,
        })
    }

    fn get_data(&mut self) -> ProviderResult<Dataset> {
        let text = read_text(&self.path)?;
        let doc: DatasetDoc =
            serde_json::from_str(&text).map_err(|e| ProviderError::parse(e.to_string()))?;
        doc.into_dataset()
    }
}

/// Writer for `.json` dataset documents.
#[derive(Debug)]
pub struct JsonWriter {
    dataset: Arc<Dataset>,
}

impl Provider for JsonWriter {
    fn format_key() -> &'static str {
        "json"
    }

    fn format_name() -> &'static str {
        "JSON dataset document"
    }

    fn file_extensions() -> &'static [&'static str] {
        &[".json"]
    }
}

impl Writer for JsonWriter {
    fn create(dataset: Arc<Dataset>) -> ProviderResult<Self> {
        Ok(Self { dataset })
    }

    fn write(&mut self, destination: &Path) -> ProviderResult<()> {
        prepare_output(destination)?;
        let file = File::create(destination).map_err(|e| {
            ProviderError::write(format!("cannot create {}: {e}", destination.display()))
        })?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &DatasetDoc::from_dataset(&self.dataset))
            .map_err(|e| ProviderError::write(e.to_string()))?;
        out.write_all(b"\n")
            .and_then(|_| out.flush())
            .map_err(|e| ProviderError::write(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let mut ds = Dataset::new();
        ds.add_dimension("scan", 2).unwrap();
        ds.add_variable(Variable::from_vec("prDM", "scan", vec![1.0, 2.0]).as_coordinate())
            .unwrap();
        ds.add_variable(
            Variable::from_vec("tv290C", "scan", vec![10.5, f64::NAN]).with_attr("units", "degC"),
        )
        .unwrap();
        ds.set_attr("ship", "RV Poseidon");
        ds
    }

    #[test]
    fn test_document_preserves_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        JsonWriter::create(Arc::new(sample()))
            .unwrap()
            .write(&path)
            .unwrap();

        let ds = JsonReader::open(&path).unwrap().get_data().unwrap();
        assert_eq!(ds.variable_names(), vec!["prDM", "tv290C"]);
        assert_eq!(ds.coordinate_for("scan").map(|v| v.name.as_str()), Some("prDM"));
        assert_eq!(ds.variable("tv290C").unwrap().units(), Some("degC"));
        assert_eq!(ds.attrs.get("ship").map(String::as_str), Some("RV Poseidon"));
        let t: Vec<f64> = ds.variable("tv290C").unwrap().data.iter().copied().collect();
        assert_eq!(t[0], 10.5);
        assert!(t[1].is_nan());
    }

    #[test]
    fn test_shape_mismatch_is_parse_error() {
        let doc: DatasetDoc = serde_json::from_str(
            r#"{"dimensions":[{"name":"scan","size":3}],
                "variables":[{"name":"t","dims":["scan"],"shape":[3],"data":[1.0,2.0]}]}"#,
        )
        .unwrap();
        assert!(matches!(doc.into_dataset(), Err(ProviderError::Parse { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonReader::open(&path).unwrap().get_data().unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[test]
    fn test_infinities_survive_and_nan_is_null() {
        let mut ds = Dataset::new();
        ds.add_dimension("scan", 4).unwrap();
        ds.add_variable(Variable::from_vec(
            "cond",
            "scan",
            vec![f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 3.5],
        ))
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cond.json");
        JsonWriter::create(Arc::new(ds)).unwrap().write(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw["variables"][0]["data"],
            serde_json::json!(["inf", "-inf", null, 3.5])
        );

        let ds = JsonReader::open(&path).unwrap().get_data().unwrap();
        let c: Vec<f64> = ds.variable("cond").unwrap().data.iter().copied().collect();
        assert_eq!(c[0], f64::INFINITY);
        assert_eq!(c[1], f64::NEG_INFINITY);
        assert!(c[2].is_nan());
        assert_eq!(c[3], 3.5);
    }
}
