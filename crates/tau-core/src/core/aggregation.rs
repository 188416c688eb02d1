use crate::core::models::isoform::Isoform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PHOSPHO_WEIGHT: f64 = 1.5;
const MOTIF_WEIGHT: f64 = 2.0;
const TRUNCATION_BONUS: f64 = 2.0;
const FOUR_REPEAT_BONUS: f64 = 1.0;

pub const OLIGOMER_THRESHOLD: f64 = 4.0;
pub const FIBRIL_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationState {
    #[default]
    Monomer,
    Oligomer,
    Fibril,
}

impl AggregationState {
    pub fn from_score(score: f64) -> Self {
        if score >= FIBRIL_THRESHOLD {
            AggregationState::Fibril
        } else if score >= OLIGOMER_THRESHOLD {
            AggregationState::Oligomer
        } else {
            AggregationState::Monomer
        }
    }

    /// Ordinal used by plotting collaborators (monomer 0, oligomer 1, fibril 2).
    pub fn level(&self) -> u8 {
        match self {
            AggregationState::Monomer => 0,
            AggregationState::Oligomer => 1,
            AggregationState::Fibril => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationState::Monomer => "monomer",
            AggregationState::Oligomer => "oligomer",
            AggregationState::Fibril => "fibril",
        }
    }
}

impl fmt::Display for AggregationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown aggregation state '{0}'")]
pub struct ParseAggregationStateError(pub String);

impl FromStr for AggregationState {
    type Err = ParseAggregationStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monomer" => Ok(AggregationState::Monomer),
            "oligomer" => Ok(AggregationState::Oligomer),
            "fibril" => Ok(AggregationState::Fibril),
            _ => Err(ParseAggregationStateError(s.to_string())),
        }
    }
}

/// Measurements the aggregation score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationInputs {
    pub phospho_count: usize,
    pub motif_count: usize,
    pub is_truncated: bool,
    pub isoform: Isoform,
}

impl AggregationInputs {
    pub fn score(&self) -> f64 {
        let mut score = PHOSPHO_WEIGHT * self.phospho_count as f64;
        score += MOTIF_WEIGHT * self.motif_count as f64;
        if self.is_truncated {
            score += TRUNCATION_BONUS;
        }
        if self.isoform.is_four_repeat() {
            score += FOUR_REPEAT_BONUS;
        }
        score
    }

    pub fn classify(&self) -> AggregationState {
        AggregationState::from_score(self.score())
    }
}
