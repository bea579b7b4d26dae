//! Statistics provider client (API-Football v3)
//!
//! Fetches the raw documents one prediction needs. Provider failures are
//! logged and reported as absent documents; the pipeline treats absence as
//! a normal case.

use crate::config::ProviderConfig;
use crate::types::{MatchContext, MatchStatistics, MatchSummary};
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the statistics provider
#[derive(Clone)]
pub struct StatisticsProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl StatisticsProvider {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch every document for a fixture, concurrently.
    pub async fn fetch(&self, ctx: &MatchContext) -> MatchStatistics {
        let league = self.config.statistics_league(ctx.league_id);
        if league != ctx.league_id {
            debug!(cup = ctx.league_id, league, "Using domestic league statistics for cup fixture");
        }

        let (home, away, standings, head_to_head) = tokio::join!(
            self.team_statistics(ctx.home_team_id, league),
            self.team_statistics(ctx.away_team_id, league),
            self.standings(league),
            self.head_to_head(ctx.home_team_id, ctx.away_team_id),
        );

        MatchStatistics {
            home,
            away,
            standings,
            head_to_head,
        }
    }

    /// Team season statistics, first non-empty season wins.
    pub async fn team_statistics(&self, team_id: i64, league_id: i64) -> Option<Value> {
        for season in &self.config.seasons {
            let params = [
                ("team", team_id.to_string()),
                ("league", league_id.to_string()),
                ("season", season.to_string()),
            ];
            if let Some(doc) = self.response("teams/statistics", &params).await.and_then(non_empty_object) {
                return Some(doc);
            }
        }
        warn!(team_id, league_id, "No team statistics for any configured season");
        None
    }

    /// League standings, first non-empty season wins.
    pub async fn standings(&self, league_id: i64) -> Option<Vec<Value>> {
        for season in &self.config.seasons {
            let params = [("league", league_id.to_string()), ("season", season.to_string())];
            if let Some(rows) = self.response("standings", &params).await.and_then(non_empty_array) {
                return Some(rows);
            }
        }
        warn!(league_id, "No standings for any configured season");
        None
    }

    /// Most recent meetings between the two teams.
    pub async fn head_to_head(&self, home_team_id: i64, away_team_id: i64) -> Option<Vec<Value>> {
        let params = [
            ("h2h", format!("{}-{}", home_team_id, away_team_id)),
            ("last", self.config.h2h_last.to_string()),
        ];
        match self.response("fixtures/headtohead", &params).await? {
            Value::Array(fixtures) => Some(fixtures),
            _ => None,
        }
    }

    /// Next fixtures of a competition, first season with any fixture wins.
    ///
    /// The league is listed as given; cup fixtures are cup fixtures here.
    pub async fn upcoming_fixtures(&self, league_id: i64) -> Option<Vec<MatchSummary>> {
        for season in &self.config.seasons {
            let params = [
                ("league", league_id.to_string()),
                ("season", season.to_string()),
                ("next", self.config.upcoming_next.to_string()),
            ];
            if let Some(fixtures) = self.response("fixtures", &params).await.and_then(non_empty_array) {
                let matches = MatchSummary::from_response(&fixtures, league_id);
                debug!(
                    league_id,
                    season,
                    fixtures = fixtures.len(),
                    usable = matches.len(),
                    "Upcoming fixtures received"
                );
                return Some(matches).filter(|m| !m.is_empty());
            }
        }
        warn!(league_id, "No upcoming fixtures for any configured season");
        None
    }

    /// The `response` member of an endpoint's reply, or `None` on any failure.
    async fn response(&self, endpoint: &str, params: &[(&str, String)]) -> Option<Value> {
        match self.get(endpoint, params).await {
            Ok(body) => extract_response(endpoint, body),
            Err(e) => {
                warn!(endpoint, error = %e, "Provider request failed");
                None
            }
        }
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.config.api_key)
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<Value>().await?;
        debug!(endpoint, "Provider response received");
        Ok(body)
    }
}

/// Unwrap the provider envelope. A populated `errors` member means the call
/// failed even with a 200 status.
fn extract_response(endpoint: &str, mut body: Value) -> Option<Value> {
    let has_errors = match body.get("errors") {
        Some(Value::Object(errors)) => !errors.is_empty(),
        Some(Value::Array(errors)) => !errors.is_empty(),
        _ => false,
    };
    if has_errors {
        warn!(endpoint, errors = %body["errors"], "Provider reported errors");
        return None;
    }
    match body.get_mut("response").map(Value::take) {
        Some(Value::Null) | None => None,
        Some(response) => Some(response),
    }
}

fn non_empty_object(value: Value) -> Option<Value> {
    match &value {
        Value::Object(map) if !map.is_empty() => Some(value),
        _ => None,
    }
}

fn non_empty_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) if !items.is_empty() => Some(items),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_response() {
        let body = json!({ "errors": [], "results": 1, "response": { "form": "WDW" } });
        assert_eq!(extract_response("teams/statistics", body), Some(json!({ "form": "WDW" })));
    }

    #[test]
    fn test_extract_response_with_errors() {
        let body = json!({ "errors": { "token": "Error/Missing application key" }, "response": [] });
        assert_eq!(extract_response("standings", body), None);
    }

    #[test]
    fn test_extract_missing_response() {
        assert_eq!(extract_response("standings", json!({ "errors": {} })), None);
        assert_eq!(extract_response("standings", json!({ "response": null })), None);
    }

    #[test]
    fn test_fixtures_envelope_to_summaries() {
        let body = json!({
            "errors": [],
            "response": [{
                "fixture": { "id": 1035, "date": "2025-08-23T14:00:00+00:00" },
                "league": { "id": 39 },
                "teams": {
                    "home": { "id": 33, "name": "Manchester United", "logo": "33.png" },
                    "away": { "id": 40, "name": "Liverpool", "logo": "40.png" }
                }
            }]
        });
        let fixtures = extract_response("fixtures", body).and_then(non_empty_array).unwrap();
        let matches = MatchSummary::from_response(&fixtures, 39);

        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].home_team_id, matches[0].away_team_id), (33, 40));
    }

    #[test]
    fn test_empty_fixtures_fall_through() {
        let body = json!({ "errors": [], "results": 0, "response": [] });
        assert!(extract_response("fixtures", body).and_then(non_empty_array).is_none());
    }

    #[test]
    fn test_season_fallback_filters() {
        assert!(non_empty_object(json!({})).is_none());
        assert!(non_empty_object(json!([])).is_none());
        assert!(non_empty_object(json!({ "team": {} })).is_some());
        assert!(non_empty_array(json!([])).is_none());
        assert_eq!(non_empty_array(json!([1, 2])).map(|v| v.len()), Some(2));
    }
}
