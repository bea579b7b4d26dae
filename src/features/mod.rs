//! Feature derivation from normalized match statistics.
//!
//! Features are accumulated into a sparse [`FeatureMap`]: a key exists only
//! when the statistics it depends on existed. Densification into the
//! model's fixed column order happens later, in [`crate::assembler`].

pub mod derived;
pub mod head_to_head;
pub mod standings;
pub mod team;

use std::collections::BTreeMap;

pub use derived::{add_derived_features, DERIVED_FEATURES};
pub use head_to_head::{add_head_to_head_features, HeadToHeadRecord, PastFixture, HEAD_TO_HEAD_FEATURES};
pub use standings::{add_standings_features, StandingRow, StandingsTable, STANDINGS_FEATURES};
pub use team::{add_team_features, form_points, team_feature_names, Side};

/// Sparse accumulation of named numeric features for one match.
pub type FeatureMap = BTreeMap<String, f64>;
