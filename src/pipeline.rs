//! Per-request prediction pipeline
//!
//! statistics -> feature map -> schema-ordered vector -> classifier -> decoded outcome

use crate::feature_extractor::FeatureExtractor;
use crate::models::ModelArtifact;
use crate::types::{MatchContext, MatchStatistics, PredictionResult};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Decoded prediction plus diagnostics about the input vector
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub result: PredictionResult,
    /// Fraction of schema columns backed by real statistics
    pub coverage: f64,
}

/// Runs one prediction end to end against a shared model artifact.
///
/// Holds no per-request state, so one instance serves concurrent requests.
pub struct PredictionPipeline {
    extractor: FeatureExtractor,
    artifact: Arc<ModelArtifact>,
}

impl PredictionPipeline {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            artifact,
        }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn predict(&self, ctx: &MatchContext, stats: &MatchStatistics) -> Result<PipelineOutput> {
        let features = self.extractor.extract(ctx, stats);
        let vector = self.artifact.schema.assemble(&features);

        let probabilities = self
            .artifact
            .classifier
            .predict_proba(vector.values())
            .context("Classifier inference failed")?;

        let result = self.artifact.encoding.decode(&probabilities)?;

        debug!(
            home_team_id = ctx.home_team_id,
            away_team_id = ctx.away_team_id,
            present = vector.present(),
            columns = vector.len(),
            prediction = %result.prediction,
            confidence = result.confidence,
            "Prediction complete"
        );

        Ok(PipelineOutput {
            result,
            coverage: vector.coverage(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::FeatureSchema;
    use crate::error::PredictionError;
    use crate::models::inference::tests::FixedClassifier;
    use crate::models::ClassEncoding;
    use crate::types::Outcome;
    use serde_json::json;

    const COLUMNS: &[&str] = &[
        "home_form_points",
        "away_form_points",
        "home_points",
        "away_points",
        "form_difference",
        "form_ratio",
        "points_difference",
        "points_ratio",
        "h2h_total_matches",
    ];

    fn pipeline(probabilities: Vec<f64>, classes: &[&str]) -> PredictionPipeline {
        let schema = FeatureSchema::new(COLUMNS.iter().map(|c| c.to_string()).collect()).unwrap();
        let classifier = FixedClassifier {
            probabilities,
            expected_len: Some(COLUMNS.len()),
        };
        let artifact = ModelArtifact::new(schema, ClassEncoding::new(classes.iter().copied()), Box::new(classifier));
        PredictionPipeline::new(Arc::new(artifact))
    }

    fn ctx() -> MatchContext {
        MatchContext {
            home_team_id: 85,
            away_team_id: 81,
            league_id: 61,
        }
    }

    fn stats() -> MatchStatistics {
        MatchStatistics {
            home: Some(json!({ "form": "WWWDL" })),
            away: Some(json!({ "form": "DDLLL" })),
            standings: Some(vec![json!({
                "league": { "standings": [[
                    { "rank": 2, "team": { "id": 85 }, "points": 40, "goalsDiff": 18 },
                    { "rank": 6, "team": { "id": 81 }, "points": 25, "goalsDiff": 3 }
                ]] }
            })]),
            head_to_head: None,
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Classes in label-encoder order; raw output H=0.7, D=0.2, A=0.1.
        let pipeline = pipeline(vec![0.1, 0.2, 0.7], &["A", "D", "H"]);
        let output = pipeline.predict(&ctx(), &stats()).unwrap();

        assert!((output.result.home_win - 70.0).abs() < 1e-9);
        assert!((output.result.draw - 20.0).abs() < 1e-9);
        assert!((output.result.away_win - 10.0).abs() < 1e-9);
        assert!((output.result.confidence - 70.0).abs() < 1e-9);
        assert_eq!(output.result.prediction, Outcome::HomeWin);
    }

    #[test]
    fn test_vector_values_for_scenario() {
        let pipeline = pipeline(vec![0.1, 0.2, 0.7], &["A", "D", "H"]);
        let features = pipeline.extractor.extract(&ctx(), &stats());
        let vector = pipeline.artifact().schema.assemble(&features);

        assert_eq!(vector.get("home_form_points"), Some(10.0));
        assert_eq!(vector.get("away_form_points"), Some(2.0));
        assert_eq!(vector.get("form_difference"), Some(8.0));
        assert_eq!(vector.get("points_difference"), Some(15.0));
        assert_eq!(vector.get("points_ratio"), Some((40.0 / 26.0) as f32));
        assert_eq!(vector.get("h2h_total_matches"), Some(0.0));
        assert_eq!(vector.present(), COLUMNS.len() - 1);
    }

    #[test]
    fn test_missing_statistics_still_predicts() {
        let pipeline = pipeline(vec![0.3, 0.3, 0.4], &["A", "D", "H"]);
        let output = pipeline.predict(&ctx(), &MatchStatistics::default()).unwrap();

        assert_eq!(output.coverage, 0.0);
        assert_eq!(output.result.prediction, Outcome::HomeWin);
    }

    #[test]
    fn test_incompatible_encoding_surfaces() {
        let pipeline = pipeline(vec![0.3, 0.7], &["A", "H"]);
        let err = pipeline.predict(&ctx(), &stats()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<PredictionError>(),
            Some(&PredictionError::MissingClass("D".to_string()))
        );
    }
}
