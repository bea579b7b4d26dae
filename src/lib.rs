//! Football Prediction Pipeline Library
//!
//! Predicts home win / draw / away win for a football fixture by turning
//! sparse, nested provider statistics into the fixed feature vector a
//! trained classifier expects, then decoding the classifier's output.

pub mod assembler;
pub mod config;
pub mod consumer;
pub mod error;
pub mod feature_extractor;
pub mod features;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod producer;
pub mod provider;
pub mod types;

pub use assembler::{FeatureSchema, FeatureVector};
pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::PredictionError;
pub use feature_extractor::FeatureExtractor;
pub use models::{ClassEncoding, Classifier, ModelArtifact};
pub use pipeline::PredictionPipeline;
pub use producer::ResultProducer;
pub use provider::StatisticsProvider;
pub use types::{MatchContext, MatchStatistics, Outcome, PredictionRequest, PredictionResult};
