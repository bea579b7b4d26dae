//! Prediction request data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies the fixture being predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchContext {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub league_id: i64,
}

/// Incoming prediction request
///
/// Ids are optional on the wire so that an incomplete request can be
/// answered with an error instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Caller-supplied correlation id
    #[serde(default = "new_request_id", alias = "requestId")]
    pub request_id: String,

    /// Home team provider id
    #[serde(default, alias = "homeTeamId")]
    pub home_team_id: Option<i64>,

    /// Away team provider id
    #[serde(default, alias = "awayTeamId")]
    pub away_team_id: Option<i64>,

    /// Competition provider id
    #[serde(default, alias = "leagueId")]
    pub league_id: Option<i64>,

    /// Request timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl PredictionRequest {
    /// Create a request for a complete fixture
    pub fn new(home_team_id: i64, away_team_id: i64, league_id: i64) -> Self {
        Self {
            request_id: new_request_id(),
            home_team_id: Some(home_team_id),
            away_team_id: Some(away_team_id),
            league_id: Some(league_id),
            timestamp: Utc::now(),
        }
    }

    /// The fixture, if all three ids were supplied. Provider ids start at
    /// 1, so zero or negative ids count as missing.
    pub fn match_context(&self) -> Option<MatchContext> {
        Some(MatchContext {
            home_team_id: positive(self.home_team_id)?,
            away_team_id: positive(self.away_team_id)?,
            league_id: positive(self.league_id)?,
        })
    }
}

pub(crate) fn positive(id: Option<i64>) -> Option<i64> {
    id.filter(|&id| id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_request() {
        let request: PredictionRequest =
            serde_json::from_str(r#"{"homeTeamId": 85, "awayTeamId": 81, "leagueId": 61}"#).unwrap();

        assert!(!request.request_id.is_empty());
        assert_eq!(
            request.match_context(),
            Some(MatchContext {
                home_team_id: 85,
                away_team_id: 81,
                league_id: 61
            })
        );
    }

    #[test]
    fn test_incomplete_request() {
        let request: PredictionRequest =
            serde_json::from_str(r#"{"request_id": "r-1", "home_team_id": 85, "league_id": 61}"#).unwrap();

        assert_eq!(request.request_id, "r-1");
        assert!(request.match_context().is_none());
    }

    #[test]
    fn test_non_positive_ids_are_missing() {
        for payload in [
            r#"{"homeTeamId": 0, "awayTeamId": 81, "leagueId": 61}"#,
            r#"{"homeTeamId": 85, "awayTeamId": -3, "leagueId": 61}"#,
            r#"{"homeTeamId": 85, "awayTeamId": 81, "leagueId": 0}"#,
        ] {
            let request: PredictionRequest = serde_json::from_str(payload).unwrap();
            assert!(request.match_context().is_none(), "accepted {}", payload);
        }
    }
}
