//! Classifier inference

use crate::models::loader::LoadedModel;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Opaque multi-class classifier.
///
/// Takes one feature vector in schema order and returns one probability per
/// class, in label-encoding order.
pub trait Classifier: Send + Sync {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f64>>;

    /// Model name for logs and responses
    fn name(&self) -> &str;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    /// ONNX session; `run` needs exclusive access
    model: Mutex<LoadedModel>,
    /// Number of classes in the label encoding
    num_classes: usize,
    name: String,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel, num_classes: usize) -> Self {
        let name = model.name.clone();
        Self {
            model: Mutex::new(model),
            num_classes,
            name,
        }
    }

    /// Extract class probabilities from model output.
    /// Handles tensor outputs (XGBoost, Random Forest) and seq(map) outputs (LightGBM, CatBoost).
    fn extract_probabilities(
        &self,
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
    ) -> Result<Vec<f64>> {
        if let Some(output) = outputs.get(output_name) {
            if let Some(probs) = self.extract_from_value(&output) {
                return Ok(probs);
            }
        }

        // Fallback: any output other than the predicted label
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(probs) = self.extract_from_value(&output) {
                debug!(model = %self.name, output = %name, "Extracted probabilities (fallback)");
                return Ok(probs);
            }
        }

        anyhow::bail!("No probability output found for model {}", self.name)
    }

    fn extract_from_value(&self, output: &ort::value::DynValue) -> Option<Vec<f64>> {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return probabilities_from_tensor(&dims, data, self.num_classes);
        }

        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            match self.extract_from_sequence_map(output) {
                Ok(probs) => return Some(probs),
                Err(e) => warn!(model = %self.name, error = %e, "Failed to read seq(map) output"),
            }
        }
        None
    }

    /// Read a `seq(map(int64, float))` output into class-id order.
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<Vec<f64>> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;
        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        let first = maps.first().context("Empty sequence")?;
        let kv_pairs = first.try_extract_key_values::<i64, f32>()?;

        probabilities_from_class_map(kv_pairs, self.num_classes)
    }
}

/// First row of a `[batch, classes]` or `[classes]` tensor.
fn probabilities_from_tensor(dims: &[i64], data: &[f32], num_classes: usize) -> Option<Vec<f64>> {
    let width = match dims {
        [_, classes] | [classes] => usize::try_from(*classes).ok()?,
        _ => return None,
    };
    if width != num_classes || data.len() < width {
        return None;
    }
    Some(data[..width].iter().map(|&p| p as f64).collect())
}

/// Place `(class id, probability)` pairs into class-id order. Ids absent
/// from the map read as 0.
fn probabilities_from_class_map(
    pairs: impl IntoIterator<Item = (i64, f32)>,
    num_classes: usize,
) -> Result<Vec<f64>> {
    let mut probs = vec![0.0; num_classes];
    for (class_id, prob) in pairs {
        let slot = usize::try_from(class_id)
            .ok()
            .and_then(|i| probs.get_mut(i))
            .with_context(|| format!("Class id {} outside encoding", class_id))?;
        *slot = prob as f64;
    }
    Ok(probs)
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f64>> {
        use ort::value::Tensor;

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, features.to_vec())).context("Failed to create input tensor")?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let input_name = model.input_name.clone();
        let output_name = model.output_name.clone();

        let outputs = model
            .session
            .run(ort::inputs![input_name.as_str() => input_tensor])?;

        let probs = self.extract_probabilities(&outputs, &output_name)?;
        debug!(model = %self.name, probabilities = ?probs, "Inference complete");
        Ok(probs)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed-output classifier standing in for a trained model.
    pub(crate) struct FixedClassifier {
        pub probabilities: Vec<f64>,
        pub expected_len: Option<usize>,
    }

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, features: &[f32]) -> Result<Vec<f64>> {
            if let Some(len) = self.expected_len {
                anyhow::ensure!(features.len() == len, "expected {} features, got {}", len, features.len());
            }
            Ok(self.probabilities.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_fixed_classifier_checks_width() {
        let classifier = FixedClassifier {
            probabilities: vec![0.2, 0.3, 0.5],
            expected_len: Some(2),
        };
        assert!(classifier.predict_proba(&[1.0, 2.0]).is_ok());
        assert!(classifier.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_tensor_output_shapes() {
        let data = [0.1_f32, 0.2, 0.7];

        let batched = probabilities_from_tensor(&[1, 3], &data, 3).unwrap();
        let flat = probabilities_from_tensor(&[3], &data, 3).unwrap();
        assert_eq!(batched, flat);
        assert!((batched[2] - 0.7).abs() < 1e-6);

        // Two-row batch: only the first row is read.
        let rows = [0.5_f32, 0.25, 0.25, 0.0, 0.0, 1.0];
        let first = probabilities_from_tensor(&[2, 3], &rows, 3).unwrap();
        assert_eq!(first, vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn test_tensor_width_mismatch() {
        assert!(probabilities_from_tensor(&[1, 2], &[0.3, 0.7], 3).is_none());
        assert!(probabilities_from_tensor(&[1, 3], &[0.3, 0.7], 3).is_none());
        assert!(probabilities_from_tensor(&[1, 1, 3], &[0.1, 0.2, 0.7], 3).is_none());
        assert!(probabilities_from_tensor(&[1, -1], &[0.1, 0.2, 0.7], 3).is_none());
    }

    #[test]
    fn test_class_map_slotting() {
        let probs = probabilities_from_class_map(vec![(2, 0.7_f32), (0, 0.1)], 3).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs[0] - 0.1).abs() < 1e-6);
        assert_eq!(probs[1], 0.0);
        assert!((probs[2] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_class_map_rejects_unknown_class() {
        assert!(probabilities_from_class_map(vec![(3, 0.5_f32)], 3).is_err());
        assert!(probabilities_from_class_map(vec![(-1, 0.5_f32)], 3).is_err());
    }
}
