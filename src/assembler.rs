//! Alignment of extracted features to the model's column schema.

use crate::error::{PredictionError, Result};
use crate::features::FeatureMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered feature columns the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(PredictionError::EmptySchema);
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Densify `features` into this schema's column order.
    ///
    /// Columns with no extracted value are zero; extracted features the
    /// schema does not list are dropped.
    pub fn assemble(&self, features: &FeatureMap) -> FeatureVector<'_> {
        let mut present = 0;
        let values: Vec<f32> = self
            .columns
            .iter()
            .map(|column| match features.get(column) {
                Some(&value) => {
                    present += 1;
                    value as f32
                }
                None => 0.0,
            })
            .collect();

        let dropped: Vec<&String> = features.keys().filter(|k| !self.contains(k)).collect();
        if !dropped.is_empty() {
            debug!(dropped = ?dropped, "Extracted features not in model schema");
        }

        FeatureVector {
            schema: self,
            values,
            present,
        }
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = PredictionError;

    fn try_from(columns: Vec<String>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

/// Model input: one value per schema column, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'s> {
    schema: &'s FeatureSchema,
    values: Vec<f32>,
    present: usize,
}

impl<'s> FeatureVector<'s> {
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        let index = self.schema.columns.iter().position(|c| c == name)?;
        Some(self.values[index])
    }

    /// `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'s str, f32)> + '_ {
        self.schema
            .columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Number of columns filled from extracted features rather than zero.
    pub fn present(&self) -> usize {
        self.present
    }

    /// Fraction of columns backed by real statistics.
    pub fn coverage(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.present as f64 / self.values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(columns: &[&str]) -> FeatureSchema {
        FeatureSchema::new(columns.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    fn map(entries: &[(&str, f64)]) -> FeatureMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_schema_order_and_zero_fill() {
        let schema = schema(&["home_points", "away_rank", "form_difference", "home_rank"]);
        let features = map(&[("home_rank", 3.0), ("home_points", 40.0), ("form_difference", 8.0)]);

        let vector = schema.assemble(&features);

        assert_eq!(vector.values(), &[40.0, 0.0, 8.0, 3.0]);
        assert_eq!(vector.present(), 3);
        assert_eq!(vector.get("away_rank"), Some(0.0));
    }

    #[test]
    fn test_unknown_features_dropped() {
        let schema = schema(&["home_points"]);
        let features = map(&[("home_points", 40.0), ("legacy_feature", 1.0)]);

        let vector = schema.assemble(&features);

        assert_eq!(vector.len(), 1);
        assert_eq!(vector.get("legacy_feature"), None);
        assert_eq!(vector.coverage(), 1.0);
    }

    #[test]
    fn test_empty_features_all_zero() {
        let schema = schema(&["a", "b", "c"]);
        let vector = schema.assemble(&FeatureMap::new());

        assert_eq!(vector.values(), &[0.0, 0.0, 0.0]);
        assert_eq!(vector.coverage(), 0.0);
    }

    #[test]
    fn test_iter_pairs_names() {
        let schema = schema(&["x", "y"]);
        let features = map(&[("y", 2.5)]);
        let vector = schema.assemble(&features);

        let pairs: Vec<(&str, f32)> = vector.iter().collect();
        assert_eq!(pairs, vec![("x", 0.0), ("y", 2.5)]);
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert_eq!(FeatureSchema::new(Vec::new()), Err(PredictionError::EmptySchema));
        assert!(serde_json::from_str::<FeatureSchema>("[]").is_err());
        let parsed: FeatureSchema = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(parsed.len(), 2);
    }
}
