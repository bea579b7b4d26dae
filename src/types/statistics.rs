//! Raw provider documents gathered for one prediction

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything fetched from the statistics provider for one fixture.
///
/// Every field is optional; the pipeline treats absence as normal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatistics {
    /// Home team's season statistics document
    #[serde(default)]
    pub home: Option<Value>,

    /// Away team's season statistics document
    #[serde(default)]
    pub away: Option<Value>,

    /// Standings response (list of league wrappers)
    #[serde(default)]
    pub standings: Option<Vec<Value>>,

    /// Past meetings between the two teams
    #[serde(default)]
    pub head_to_head: Option<Vec<Value>>,
}
