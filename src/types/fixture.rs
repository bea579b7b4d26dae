//! Upcoming fixture listing data structures

use crate::normalizer::{as_i64, lookup, str_at};
use crate::types::request::positive;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request for a competition's next fixtures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesRequest {
    #[serde(default = "new_request_id", alias = "requestId")]
    pub request_id: String,

    /// Competition provider id
    #[serde(default, alias = "leagueId")]
    pub league_id: Option<i64>,
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl FixturesRequest {
    pub fn new(league_id: i64) -> Self {
        Self {
            request_id: new_request_id(),
            league_id: Some(league_id),
        }
    }

    /// The league to list, if a usable id was supplied.
    pub fn league(&self) -> Option<i64> {
        positive(self.league_id)
    }
}

/// One upcoming fixture, carrying the ids a prediction request needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: i64,
    pub date: String,
    pub league_id: i64,
    pub home_name: String,
    pub away_name: String,
    pub home_logo: String,
    pub away_logo: String,
    pub home_team_id: i64,
    pub away_team_id: i64,
}

impl MatchSummary {
    /// Summarize one entry of the provider's `fixtures` response.
    ///
    /// `None` when the fixture id or either team id is missing; such an
    /// entry cannot be turned into a prediction request.
    pub fn from_fixture(fixture: &Value, league_id: i64) -> Option<Self> {
        let doc = Some(fixture);
        let id_at = |path: &[&str]| lookup(doc, path).and_then(as_i64);

        Some(Self {
            id: id_at(&["fixture", "id"])?,
            date: str_at(doc, &["fixture", "date"], "").to_string(),
            league_id: id_at(&["league", "id"]).unwrap_or(league_id),
            home_name: str_at(doc, &["teams", "home", "name"], "").to_string(),
            away_name: str_at(doc, &["teams", "away", "name"], "").to_string(),
            home_logo: str_at(doc, &["teams", "home", "logo"], "").to_string(),
            away_logo: str_at(doc, &["teams", "away", "logo"], "").to_string(),
            home_team_id: id_at(&["teams", "home", "id"])?,
            away_team_id: id_at(&["teams", "away", "id"])?,
        })
    }

    /// Summaries for every usable fixture, in provider order.
    pub fn from_response(fixtures: &[Value], league_id: i64) -> Vec<Self> {
        fixtures
            .iter()
            .filter_map(|fixture| Self::from_fixture(fixture, league_id))
            .collect()
    }
}

/// Reply to a [`FixturesRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesResponse {
    pub request_id: String,
    pub league_id: i64,
    pub matches: Vec<MatchSummary>,
    pub generated_at: DateTime<Utc>,
}

impl FixturesResponse {
    pub fn new(request_id: String, league_id: i64, matches: Vec<MatchSummary>) -> Self {
        Self {
            request_id,
            league_id,
            matches,
            generated_at: Utc::now(),
        }
    }
}
