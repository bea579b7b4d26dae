//! Decoding of classifier probabilities into named outcomes

use crate::error::{PredictionError, Result};
use crate::types::{Outcome, PredictionResult};
use serde::{Deserialize, Serialize};

/// Class names in the order the classifier emits probabilities.
///
/// This is the fitted label encoder of the training pipeline, which sorts
/// labels (`["A", "D", "H"]`), not the H/D/A presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassEncoding {
    classes: Vec<String>,
}

impl ClassEncoding {
    pub fn new<S: Into<String>>(classes: impl IntoIterator<Item = S>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Probability index of `outcome`.
    pub fn index_of(&self, outcome: Outcome) -> Result<usize> {
        self.classes
            .iter()
            .position(|c| c == outcome.label())
            .ok_or_else(|| PredictionError::MissingClass(outcome.label().to_string()))
    }

    /// Check that every outcome has a class index.
    pub fn validate(&self) -> Result<()> {
        for outcome in Outcome::ALL {
            self.index_of(outcome)?;
        }
        Ok(())
    }

    /// Turn raw class probabilities into percentages, confidence and label.
    ///
    /// The predicted label is the class at the first index holding the
    /// maximum raw probability. NaN or infinite probabilities are rejected.
    pub fn decode(&self, probabilities: &[f64]) -> Result<PredictionResult> {
        if probabilities.len() != self.classes.len() {
            return Err(PredictionError::ProbabilityShape {
                expected: self.classes.len(),
                got: probabilities.len(),
            });
        }
        if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
            return Err(PredictionError::NonFiniteProbability { index });
        }

        let home_win = probabilities[self.index_of(Outcome::HomeWin)?] * 100.0;
        let draw = probabilities[self.index_of(Outcome::Draw)?] * 100.0;
        let away_win = probabilities[self.index_of(Outcome::AwayWin)?] * 100.0;

        let (best, max) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(bi, bp), (i, p)| if p > bp { (i, p) } else { (bi, bp) });

        let label = &self.classes[best];
        let prediction =
            Outcome::from_label(label).ok_or_else(|| PredictionError::UnknownLabel(label.clone()))?;

        Ok(PredictionResult {
            home_win,
            draw,
            away_win,
            confidence: max * 100.0,
            prediction,
        })
    }
}
