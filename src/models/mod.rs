//! Trained model artifact: loading, inference and output decoding

pub mod decoder;
pub mod inference;
pub mod loader;

pub use decoder::ClassEncoding;
pub use inference::{Classifier, OnnxClassifier};
pub use loader::{LoadedModel, ModelArtifact, ModelMetadata};
