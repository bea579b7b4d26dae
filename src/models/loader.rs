//! Trained model artifact loader

use crate::assembler::FeatureSchema;
use crate::config::ModelConfig;
use crate::models::decoder::ClassEncoding;
use crate::models::inference::{Classifier, OnnxClassifier};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for probabilities
    pub output_name: String,
}

/// Training-time metadata shipped next to the ONNX file
#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetadata {
    /// Ordered feature columns
    pub feature_columns: FeatureSchema,
    /// Fitted label encoder classes
    pub classes: ClassEncoding,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Validation accuracy in percent
    #[serde(default)]
    pub accuracy: Option<f64>,
}

fn default_model_name() -> String {
    "xgboost".to_string()
}

impl ModelMetadata {
    pub fn from_json(json: &str) -> Result<Self> {
        let metadata: Self = serde_json::from_str(json).context("Invalid model metadata")?;
        metadata
            .classes
            .validate()
            .context("Label encoding incompatible with H/D/A outcomes")?;
        Ok(metadata)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model metadata from {:?}", path))?;
        Self::from_json(&json)
    }
}

/// Everything the pipeline needs from training: schema, encoding, classifier.
///
/// Loaded once at startup and shared read-only between requests.
pub struct ModelArtifact {
    pub schema: FeatureSchema,
    pub encoding: ClassEncoding,
    pub classifier: Box<dyn Classifier>,
    pub accuracy: Option<f64>,
}

impl ModelArtifact {
    pub fn new(schema: FeatureSchema, encoding: ClassEncoding, classifier: Box<dyn Classifier>) -> Self {
        Self {
            schema,
            encoding,
            classifier,
            accuracy: None,
        }
    }

    /// Load the ONNX classifier and its metadata as configured.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let metadata = ModelMetadata::load(&config.metadata_path)?;
        ort::init().commit()?;
        let model = LoadedModel::open(&config.model_path, &metadata.model_name, config.onnx_threads)?;

        info!(
            model = %metadata.model_name,
            features = metadata.feature_columns.len(),
            classes = ?metadata.classes.classes(),
            "Model artifact loaded"
        );

        let classifier = OnnxClassifier::new(model, metadata.classes.len());
        Ok(Self {
            schema: metadata.feature_columns,
            encoding: metadata.classes,
            classifier: Box::new(classifier),
            accuracy: metadata.accuracy,
        })
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }
}

impl LoadedModel {
    /// Open an ONNX classifier and pick the tensors it is driven through.
    pub fn open<P: AsRef<Path>>(path: P, name: &str, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();
        info!(model = %name, path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;

        let inputs: Vec<&str> = session.inputs.iter().map(|i| i.name.as_str()).collect();
        let outputs: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();
        let input_name = feature_input(&inputs);
        let output_name = probability_output(&outputs);

        info!(model = %name, input = %input_name, output = %output_name, "Model loaded successfully");

        Ok(Self {
            name: name.to_string(),
            session,
            input_name,
            output_name,
        })
    }
}

/// The single feature-vector input of a converted classifier.
fn feature_input(inputs: &[&str]) -> String {
    inputs.first().copied().unwrap_or("float_input").to_string()
}

/// Converted classifiers emit a predicted label plus a probability output.
/// Prefer an output named for probabilities, then any non-label output.
fn probability_output(outputs: &[&str]) -> String {
    outputs
        .iter()
        .find(|name| name.contains("prob"))
        .or_else(|| outputs.iter().rev().find(|name| !name.contains("label")))
        .copied()
        .unwrap_or("probabilities")
        .to_string()
}
