//! Prediction result data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full-time result from the home team's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "H")]
    HomeWin,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "A")]
    AwayWin,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin];

    /// Class name used by the label encoding
    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => "H",
            Outcome::Draw => "D",
            Outcome::AwayWin => "A",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "H" => Some(Outcome::HomeWin),
            "D" => Some(Outcome::Draw),
            "A" => Some(Outcome::AwayWin),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoded classifier output, percentages in 0..=100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub confidence: f64,
    pub prediction: Outcome,
}

/// Successful response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub request_id: String,

    #[serde(flatten)]
    pub result: PredictionResult,

    /// Model name from the artifact metadata
    pub model: String,

    /// Validation accuracy reported by the artifact, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    pub generated_at: DateTime<Utc>,
}

impl PredictionResponse {
    pub fn new(request_id: String, result: PredictionResult, model: String, accuracy: Option<f64>) -> Self {
        Self {
            request_id,
            result,
            model,
            accuracy,
            generated_at: Utc::now(),
        }
    }
}

/// Failure response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub request_id: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(request_id: String, error: impl Into<String>) -> Self {
        Self {
            request_id,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Health check reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub feature_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        for outcome in Outcome::ALL {
            assert_eq!(Outcome::from_label(outcome.label()), Some(outcome));
        }
        assert_eq!(Outcome::from_label("X"), None);
    }

    #[test]
    fn test_response_serialization() {
        let result = PredictionResult {
            home_win: 70.0,
            draw: 20.0,
            away_win: 10.0,
            confidence: 70.0,
            prediction: Outcome::HomeWin,
        };
        let response = PredictionResponse::new("req_1".to_string(), result.clone(), "xgboost".to_string(), None);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["requestId"], "req_1");
        assert_eq!(json["homeWin"], 70.0);
        assert_eq!(json["awayWin"], 10.0);
        assert_eq!(json["prediction"], "H");
        assert!(json.get("accuracy").is_none());

        let deserialized: PredictionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized.result, result);
    }

    #[test]
    fn test_error_response() {
        let error = ErrorResponse::new("req_2".to_string(), "missing match data").with_details("league_id");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["error"], "missing match data");
        assert_eq!(json["details"], "league_id");
    }
}
