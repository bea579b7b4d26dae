//! League table lookup for rank, points and goal difference.

use super::FeatureMap;
use crate::normalizer::{as_i64, count_at, lookup};
use crate::types::MatchContext;
use serde_json::Value;

/// One team's row in a league table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingRow {
    pub team_id: i64,
    pub rank: i64,
    pub points: i64,
    pub goal_diff: i64,
}

/// Ordered league table for one competition-season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingsTable {
    rows: Vec<StandingRow>,
}

impl StandingsTable {
    pub fn new(rows: Vec<StandingRow>) -> Self {
        Self { rows }
    }

    /// Build the table from a provider standings response.
    ///
    /// Only the first wrapper's first group is used. Rows without a team id
    /// cannot be matched and are skipped; other missing row fields read as 0.
    pub fn from_response(response: &[Value]) -> Option<Self> {
        let group = lookup(response.first(), &["league", "standings", "0"])?.as_array()?;

        let rows = group
            .iter()
            .filter_map(|row| {
                let row = Some(row);
                let team_id = lookup(row, &["team", "id"]).and_then(as_i64)?;
                Some(StandingRow {
                    team_id,
                    rank: count_at(row, &["rank"], 0),
                    points: count_at(row, &["points"], 0),
                    goal_diff: count_at(row, &["goalsDiff"], 0),
                })
            })
            .collect();

        Some(Self { rows })
    }

    /// First row for `team_id`, if any.
    pub fn find(&self, team_id: i64) -> Option<&StandingRow> {
        self.rows.iter().find(|row| row.team_id == team_id)
    }

    pub fn rows(&self) -> &[StandingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub const STANDINGS_FEATURES: &[&str] = &[
    "home_rank",
    "home_points",
    "home_goal_diff",
    "away_rank",
    "away_points",
    "away_goal_diff",
];

/// Add rank/points/goal-difference for each side found in `table`.
///
/// A side with no row gets no features at all. Zero-filling here would read
/// as a real (and extreme) table position.
pub fn add_standings_features(features: &mut FeatureMap, table: &StandingsTable, ctx: &MatchContext) {
    for (prefix, team_id) in [("home", ctx.home_team_id), ("away", ctx.away_team_id)] {
        if let Some(row) = table.find(team_id) {
            features.insert(format!("{prefix}_rank"), row.rank as f64);
            features.insert(format!("{prefix}_points"), row.points as f64);
            features.insert(format!("{prefix}_goal_diff"), row.goal_diff as f64);
        }
    }
}
