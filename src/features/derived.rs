//! Cross-team relative-strength features.
//!
//! Each feature is emitted only when both of its inputs are present in the
//! map. The `+ 1` and `+ 0.1` denominators are part of the trained model's
//! feature definitions and must stay exactly as they are.

use super::FeatureMap;

pub const DERIVED_FEATURES: &[&str] = &[
    "rank_difference",
    "points_difference",
    "points_ratio",
    "form_difference",
    "form_ratio",
    "attack_difference",
    "attack_ratio",
    "defense_difference",
    "wins_difference",
];

fn pair(features: &FeatureMap, home: &str, away: &str) -> Option<(f64, f64)> {
    Some((*features.get(home)?, *features.get(away)?))
}

/// Add the derived features to `features` from the base features already in it.
pub fn add_derived_features(features: &mut FeatureMap) {
    let mut derived: Vec<(&str, f64)> = Vec::with_capacity(DERIVED_FEATURES.len());

    // A zero rank means the row had no usable rank.
    if let Some((home, away)) = pair(features, "home_rank", "away_rank") {
        if home != 0.0 && away != 0.0 {
            derived.push(("rank_difference", away - home));
        }
    }

    if let Some((home, away)) = pair(features, "home_points", "away_points") {
        derived.push(("points_difference", home - away));
        if away > 0.0 {
            derived.push(("points_ratio", home / (away + 1.0)));
        }
    }

    if let Some((home, away)) = pair(features, "home_form_points", "away_form_points") {
        derived.push(("form_difference", home - away));
        if away > 0.0 {
            derived.push(("form_ratio", home / (away + 1.0)));
        }
    }

    if let Some((home, away)) = pair(features, "home_goals_for_avg", "away_goals_for_avg") {
        derived.push(("attack_difference", home - away));
        if away > 0.0 {
            derived.push(("attack_ratio", home / (away + 0.1)));
        }
    }

    if let Some((home, away)) = pair(features, "home_goals_against_avg", "away_goals_against_avg") {
        derived.push(("defense_difference", away - home));
    }

    if let Some((home, away)) = pair(features, "home_wins", "away_wins") {
        derived.push(("wins_difference", home - away));
    }

    for (name, value) in derived {
        features.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::FeatureSchema;

    fn map(entries: &[(&str, f64)]) -> FeatureMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_points_features() {
        let mut features = map(&[("home_points", 40.0), ("away_points", 25.0)]);
        add_derived_features(&mut features);

        assert_eq!(features["points_difference"], 15.0);
        assert!((features["points_ratio"] - 40.0 / 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_guard_on_zero_denominator() {
        // The ratio needs a positive denominator side even though the +1
        // smoothing would avoid a division by zero; the model was trained
        // with the ratio absent (0 after assembly) in this case, not 10.0.
        let mut features = map(&[("home_points", 10.0), ("away_points", 0.0)]);
        add_derived_features(&mut features);

        assert_eq!(features["points_difference"], 10.0);
        assert!(!features.contains_key("points_ratio"));

        let schema = FeatureSchema::new(vec!["points_ratio".to_string(), "points_difference".to_string()]).unwrap();
        let vector = schema.assemble(&features);
        assert_eq!(vector.get("points_ratio"), Some(0.0));
        assert_eq!(vector.get("points_difference"), Some(10.0));
    }

    #[test]
    fn test_points_ratio_with_one_point_away() {
        let mut features = map(&[("home_points", 10.0), ("away_points", 1.0)]);
        add_derived_features(&mut features);
        assert_eq!(features["points_ratio"], 5.0);
    }

    #[test]
    fn test_form_and_attack() {
        let mut features = map(&[
            ("home_form_points", 10.0),
            ("away_form_points", 2.0),
            ("home_goals_for_avg", 2.0),
            ("away_goals_for_avg", 0.9),
            ("home_goals_against_avg", 0.8),
            ("away_goals_against_avg", 1.5),
            ("home_wins", 7.0),
            ("away_wins", 3.0),
        ]);
        add_derived_features(&mut features);

        assert_eq!(features["form_difference"], 8.0);
        assert!((features["form_ratio"] - 10.0 / 3.0).abs() < 1e-12);
        assert!((features["attack_difference"] - 1.1).abs() < 1e-12);
        assert!((features["attack_ratio"] - 2.0).abs() < 1e-12);
        assert!((features["defense_difference"] - 0.7).abs() < 1e-12);
        assert_eq!(features["wins_difference"], 4.0);
    }

    #[test]
    fn test_rank_difference_requires_nonzero_ranks() {
        let mut features = map(&[("home_rank", 3.0), ("away_rank", 12.0)]);
        add_derived_features(&mut features);
        assert_eq!(features["rank_difference"], 9.0);

        let mut features = map(&[("home_rank", 0.0), ("away_rank", 12.0)]);
        add_derived_features(&mut features);
        assert!(!features.contains_key("rank_difference"));
    }

    #[test]
    fn test_one_sided_inputs_derive_nothing() {
        let mut features = map(&[("home_points", 40.0), ("home_form_points", 9.0), ("home_wins", 5.0)]);
        add_derived_features(&mut features);
        assert_eq!(features.len(), 3);
    }
}
