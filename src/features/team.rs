//! Per-team absolute features from a team statistics document.

use super::FeatureMap;
use crate::normalizer::{count_at, float_at, is_present, str_at};
use serde_json::Value;

/// Which side of the fixture a team plays today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// Prefix used for this side's feature names; also the venue key in the
    /// provider's home/away splits.
    pub fn prefix(self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// Count features read straight from the document (default 0).
const COUNT_FEATURES: &[(&str, &[&str])] = &[
    ("matches_played", &["fixtures", "played", "total"]),
    ("wins", &["fixtures", "wins", "total"]),
    ("draws", &["fixtures", "draws", "total"]),
    ("losses", &["fixtures", "loses", "total"]),
    ("goals_for_total", &["goals", "for", "total", "total"]),
    ("goals_against_total", &["goals", "against", "total", "total"]),
    ("clean_sheets", &["clean_sheet", "total"]),
    ("failed_to_score", &["failed_to_score", "total"]),
    // First-quarter-hour bucket only, not a season aggregate.
    ("yellow_cards", &["cards", "yellow", "0-15", "total"]),
    ("red_cards", &["cards", "red", "0-15", "total"]),
    ("penalty_scored", &["penalty", "scored", "total"]),
    ("penalty_missed", &["penalty", "missed", "total"]),
];

/// Average features (default 0.0).
const AVERAGE_FEATURES: &[(&str, &[&str])] = &[
    ("goals_for_avg", &["goals", "for", "average", "total"]),
    ("goals_against_avg", &["goals", "against", "average", "total"]),
];

/// Points from a form string: W = 3, D = 1, anything else 0.
pub fn form_points(form: &str) -> i64 {
    form.chars()
        .map(|c| match c {
            'W' => 3,
            'D' => 1,
            _ => 0,
        })
        .sum()
}

/// Names of every feature [`add_team_features`] emits for `side`.
pub fn team_feature_names(side: Side) -> Vec<String> {
    let p = side.prefix();
    let mut names = vec![format!("{p}_form_points")];
    names.extend(COUNT_FEATURES.iter().map(|(name, _)| format!("{p}_{name}")));
    names.extend(AVERAGE_FEATURES.iter().map(|(name, _)| format!("{p}_{name}")));
    names.push(format!("{p}_goals_for_{p}"));
    names.push(format!("{p}_goals_against_{p}"));
    names
}

/// Add `side`'s absolute features. Nothing is added when the document is
/// absent or empty; otherwise every feature is emitted, missing paths
/// reading as zero.
pub fn add_team_features(features: &mut FeatureMap, side: Side, stats: Option<&Value>) {
    if !is_present(stats) {
        return;
    }
    let p = side.prefix();

    let form = form_points(str_at(stats, &["form"], ""));
    features.insert(format!("{p}_form_points"), form as f64);

    for (name, path) in COUNT_FEATURES {
        features.insert(format!("{p}_{name}"), count_at(stats, path, 0) as f64);
    }
    for (name, path) in AVERAGE_FEATURES {
        features.insert(format!("{p}_{name}"), float_at(stats, path, 0.0));
    }

    // Venue split: home side reads the "home" column, away side the "away" one.
    features.insert(
        format!("{p}_goals_for_{p}"),
        count_at(stats, &["goals", "for", "total", p], 0) as f64,
    );
    features.insert(
        format!("{p}_goals_against_{p}"),
        count_at(stats, &["goals", "against", "total", p], 0) as f64,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats() -> Value {
        json!({
            "form": "WWDLW",
            "fixtures": {
                "played": { "total": 10 },
                "wins": { "total": 6 },
                "draws": { "total": 2 },
                "loses": { "total": 2 }
            },
            "goals": {
                "for": {
                    "total": { "home": 12, "away": 7, "total": 19 },
                    "average": { "home": "2.4", "away": "1.4", "total": "1.9" }
                },
                "against": {
                    "total": { "home": 4, "away": 6, "total": 10 },
                    "average": { "total": "1.0" }
                }
            },
            "clean_sheet": { "total": 4 },
            "failed_to_score": { "total": 1 },
            "cards": {
                "yellow": { "0-15": { "total": 2 }, "16-30": { "total": 9 } },
                "red": { "0-15": { "total": null } }
            },
            "penalty": { "scored": { "total": 3 }, "missed": { "total": 1 } }
        })
    }

    #[test]
    fn test_form_points() {
        assert_eq!(form_points("WWDLW"), 10);
        assert_eq!(form_points("WWWDL"), 10);
        assert_eq!(form_points("DDLLL"), 2);
        assert_eq!(form_points(""), 0);
        assert_eq!(form_points("w?X"), 0);
    }

    #[test]
    fn test_home_features() {
        let doc = stats();
        let mut features = FeatureMap::new();
        add_team_features(&mut features, Side::Home, Some(&doc));

        assert_eq!(features["home_form_points"], 10.0);
        assert_eq!(features["home_matches_played"], 10.0);
        assert_eq!(features["home_losses"], 2.0);
        assert_eq!(features["home_goals_for_total"], 19.0);
        assert!((features["home_goals_for_avg"] - 1.9).abs() < 1e-12);
        assert_eq!(features["home_goals_for_home"], 12.0);
        assert_eq!(features["home_goals_against_home"], 4.0);
        assert_eq!(features["home_yellow_cards"], 2.0);
        assert_eq!(features["home_red_cards"], 0.0);
        assert_eq!(features["home_penalty_missed"], 1.0);
        assert_eq!(features.len(), team_feature_names(Side::Home).len());
    }

    #[test]
    fn test_away_uses_away_venue_split() {
        let doc = stats();
        let mut features = FeatureMap::new();
        add_team_features(&mut features, Side::Away, Some(&doc));

        assert_eq!(features["away_goals_for_away"], 7.0);
        assert_eq!(features["away_goals_against_away"], 6.0);
        assert!(!features.contains_key("away_goals_for_home"));
        assert!(features.keys().all(|k| k.starts_with("away_")));
    }

    #[test]
    fn test_absent_document_adds_nothing() {
        let mut features = FeatureMap::new();
        add_team_features(&mut features, Side::Home, None);
        add_team_features(&mut features, Side::Away, Some(&json!({})));
        assert!(features.is_empty());
    }

    #[test]
    fn test_sparse_document_zero_fills() {
        let doc = json!({ "form": null, "fixtures": { "wins": { "total": 3 } } });
        let mut features = FeatureMap::new();
        add_team_features(&mut features, Side::Home, Some(&doc));

        assert_eq!(features["home_form_points"], 0.0);
        assert_eq!(features["home_wins"], 3.0);
        assert_eq!(features["home_goals_against_avg"], 0.0);
        assert_eq!(features.len(), team_feature_names(Side::Home).len());
    }
}
