use serde::{Deserialize, Serialize};

use crate::error::{Result, XyardsError};

/// Named numeric input for a single prediction.
///
/// The column names travel with the values so that a vector built against a
/// different encoding, or with its columns shuffled, is caught before it
/// reaches the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(columns: Vec<String>, values: Vec<f32>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(XyardsError::SchemaMismatch {
                expected: columns.len(),
                found: values.len(),
                detail: "column names and values differ in length".to_string(),
            });
        }
        Ok(Self { columns, values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f32> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.values[idx])
    }

    /// Overwrite one column in place. Unknown names are ignored and reported
    /// through the return value.
    pub fn set(&mut self, column: &str, value: f32) -> bool {
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<f32>) {
        (self.columns, self.values)
    }

    /// Compare the column layout against the layout a model was trained on.
    pub fn check_schema(&self, expected: &[String]) -> Result<()> {
        check_columns(&self.columns, expected)
    }
}

/// Fail unless `found` has exactly the names of `expected`, in the same order.
pub fn check_columns(found: &[String], expected: &[String]) -> Result<()> {
    if found.len() != expected.len() {
        let extra = found
            .iter()
            .find(|c| !expected.contains(c))
            .or_else(|| expected.iter().find(|c| !found.contains(c)));
        return Err(XyardsError::SchemaMismatch {
            expected: expected.len(),
            found: found.len(),
            detail: match extra {
                Some(col) => format!("column '{}' not shared by both schemas", col),
                None => "column count differs".to_string(),
            },
        });
    }
    if let Some((pos, (got, want))) = found
        .iter()
        .zip(expected)
        .enumerate()
        .find(|(_, (got, want))| got != want)
    {
        return Err(XyardsError::SchemaMismatch {
            expected: expected.len(),
            found: found.len(),
            detail: format!("column {} is '{}', expected '{}'", pos, got, want),
        });
    }
    Ok(())
}
