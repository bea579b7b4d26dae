//! Type definitions for the prediction pipeline

pub mod fixture;
pub mod prediction;
pub mod request;
pub mod statistics;

pub use fixture::{FixturesRequest, FixturesResponse, MatchSummary};
pub use prediction::{ErrorResponse, HealthStatus, Outcome, PredictionResponse, PredictionResult};
pub use request::{MatchContext, PredictionRequest};
pub use statistics::MatchStatistics;
