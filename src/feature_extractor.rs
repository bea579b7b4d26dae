//! Feature extraction for match outcome model inference.
//!
//! Turns the raw provider documents for one fixture into the sparse feature
//! map the model was trained on. Names and formulas must match the training
//! pipeline exactly.

use crate::features::{
    add_derived_features, add_head_to_head_features, add_standings_features, add_team_features,
    team_feature_names, FeatureMap, HeadToHeadRecord, Side, StandingsTable, DERIVED_FEATURES,
    HEAD_TO_HEAD_FEATURES, STANDINGS_FEATURES,
};
use crate::types::{MatchContext, MatchStatistics};
use tracing::debug;

/// Feature extractor that transforms provider statistics into model features.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features for a fixture.
    ///
    /// The result holds only features whose inputs existed; a missing
    /// statistics document, table row or head-to-head history simply leaves
    /// its features out.
    pub fn extract(&self, ctx: &MatchContext, stats: &MatchStatistics) -> FeatureMap {
        let mut features = FeatureMap::new();

        // Team statistics
        add_team_features(&mut features, Side::Home, stats.home.as_ref());
        add_team_features(&mut features, Side::Away, stats.away.as_ref());

        // League table
        if let Some(table) = stats
            .standings
            .as_deref()
            .and_then(StandingsTable::from_response)
        {
            add_standings_features(&mut features, &table, ctx);
        }

        // Head to head
        if let Some(response) = stats.head_to_head.as_deref() {
            let record = HeadToHeadRecord::from_response(response);
            add_head_to_head_features(&mut features, &record, ctx);
        }

        // Relative strength, computed last from the base features
        add_derived_features(&mut features);

        debug!(
            home_team_id = ctx.home_team_id,
            away_team_id = ctx.away_team_id,
            league_id = ctx.league_id,
            feature_count = features.len(),
            "Features extracted"
        );

        features
    }

    /// Get the number of features the extractor can produce.
    pub fn feature_count(&self) -> usize {
        self.feature_names().len()
    }

    /// Every feature name the extractor can produce, in a stable order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = team_feature_names(Side::Home);
        names.extend(team_feature_names(Side::Away));
        names.extend(STANDINGS_FEATURES.iter().map(|s| s.to_string()));
        names.extend(HEAD_TO_HEAD_FEATURES.iter().map(|s| s.to_string()));
        names.extend(DERIVED_FEATURES.iter().map(|s| s.to_string()));
        names
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
