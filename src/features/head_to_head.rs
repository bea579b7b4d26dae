//! Head-to-head history between today's two teams.

use super::FeatureMap;
use crate::normalizer::{as_i64, flag_at, lookup};
use crate::types::MatchContext;
use serde_json::Value;

/// Outcome flags of one past meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PastFixture {
    pub home_team_id: Option<i64>,
    pub home_winner: bool,
    pub away_team_id: Option<i64>,
    pub away_winner: bool,
}

impl PastFixture {
    fn from_value(fixture: &Value) -> Self {
        let fixture = Some(fixture);
        Self {
            home_team_id: lookup(fixture, &["teams", "home", "id"]).and_then(as_i64),
            home_winner: flag_at(fixture, &["teams", "home", "winner"]),
            away_team_id: lookup(fixture, &["teams", "away", "id"]).and_then(as_i64),
            away_winner: flag_at(fixture, &["teams", "away", "winner"]),
        }
    }

    /// Whether `team_id` won this meeting, whichever venue role it had.
    pub fn won_by(&self, team_id: i64) -> bool {
        (self.home_team_id == Some(team_id) && self.home_winner)
            || (self.away_team_id == Some(team_id) && self.away_winner)
    }
}

/// Past meetings between two teams, most recent first as delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadToHeadRecord {
    fixtures: Vec<PastFixture>,
}

impl HeadToHeadRecord {
    pub fn new(fixtures: Vec<PastFixture>) -> Self {
        Self { fixtures }
    }

    pub fn from_response(response: &[Value]) -> Self {
        Self {
            fixtures: response.iter().map(PastFixture::from_value).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn wins_for(&self, team_id: i64) -> usize {
        self.fixtures.iter().filter(|f| f.won_by(team_id)).count()
    }
}

pub const HEAD_TO_HEAD_FEATURES: &[&str] = &["h2h_total_matches", "h2h_home_wins", "h2h_away_wins"];

/// Add meeting counts. Away wins are "not won by today's home team", so
/// drawn meetings are counted on the away side.
pub fn add_head_to_head_features(features: &mut FeatureMap, record: &HeadToHeadRecord, ctx: &MatchContext) {
    if record.is_empty() {
        return;
    }
    let total = record.len();
    let home_wins = record.wins_for(ctx.home_team_id);

    features.insert("h2h_total_matches".to_string(), total as f64);
    features.insert("h2h_home_wins".to_string(), home_wins as f64);
    features.insert("h2h_away_wins".to_string(), (total - home_wins) as f64);
}
