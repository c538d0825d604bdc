//! Labeled N-dimensional grid as delivered by a file backend.
//!
//! A `RawGrid` carries whatever dimension and variable names the source file
//! uses. It is deliberately schema-agnostic: mapping it onto the canonical
//! longitude/latitude/depth/temperature layout is the normalizer's job.

use serde::{Deserialize, Serialize};

use crate::error::{CtmError, CtmResult};

/// A named dimension and its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDimension {
    pub name: String,
    pub len: usize,
}

/// A named variable defined over an ordered list of dimensions.
///
/// Values are stored row-major: the last dimension varies fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVariable {
    pub name: String,
    pub dimensions: Vec<String>,
    pub values: Vec<f64>,
}

/// Labeled N-D grid: dimensions plus variables (coordinate and data).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGrid {
    pub dimensions: Vec<RawDimension>,
    pub variables: Vec<RawVariable>,
}

impl RawGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension.
    pub fn with_dimension(mut self, name: impl Into<String>, len: usize) -> Self {
        self.dimensions.push(RawDimension {
            name: name.into(),
            len,
        });
        self
    }

    /// Add a 1-D coordinate variable sharing its dimension's name.
    pub fn with_coordinate(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        let name = name.into();
        self.variables.push(RawVariable {
            dimensions: vec![name.clone()],
            name,
            values,
        });
        self
    }

    /// Add a data variable.
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        dimensions: &[&str],
        values: Vec<f64>,
    ) -> Self {
        self.variables.push(RawVariable {
            name: name.into(),
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            values,
        });
        self
    }

    /// Look up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&RawDimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&RawVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Values of the coordinate variable for a dimension.
    pub fn coordinate_values(&self, dim: &str) -> CtmResult<&[f64]> {
        let var = self
            .variable(dim)
            .ok_or_else(|| CtmError::schema_mismatch(format!("missing coordinate variable '{}'", dim)))?;
        if var.dimensions.len() != 1 || var.dimensions[0] != dim {
            return Err(CtmError::schema_mismatch(format!(
                "coordinate variable '{}' must be 1-D over '{}', found {:?}",
                dim, dim, var.dimensions
            )));
        }
        Ok(&var.values)
    }

    /// Check that every variable's value count matches its dimension lengths.
    pub fn validate(&self) -> CtmResult<()> {
        for var in &self.variables {
            let mut expected = 1usize;
            for dim_name in &var.dimensions {
                let dim = self.dimension(dim_name).ok_or_else(|| {
                    CtmError::schema_mismatch(format!(
                        "variable '{}' uses undeclared dimension '{}'",
                        var.name, dim_name
                    ))
                })?;
                expected *= dim.len;
            }
            if var.values.len() != expected {
                return Err(CtmError::schema_mismatch(format!(
                    "variable '{}' has {} values, expected {}",
                    var.name,
                    var.values.len(),
                    expected
                )));
            }
        }
        Ok(())
    }

    /// Parse a raw grid from its JSON representation and validate it.
    pub fn from_json(text: &str) -> CtmResult<Self> {
        let grid: RawGrid = serde_json::from_str(text)?;
        grid.validate()?;
        Ok(grid)
    }
}
