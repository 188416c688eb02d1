use crate::core::models::environment::Environment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const HEALTHY_TEMPERATURE_RANGE: (f64, f64) = (36.0, 38.0);
pub const HEALTHY_ENZYME_RANGE: (f64, f64) = (0.8, 1.0);

const KINASE_BASELINE_FACTOR: f64 = 0.05;
const PHOSPHATASE_BASELINE_FACTOR: f64 = 0.02;

/// How enzyme levels are turned into multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnzymeResponse {
    /// Multiplier proportional to the enzyme level.
    #[default]
    Linear,
    /// Levels inside [`HEALTHY_ENZYME_RANGE`] map to 1.0, others fall back to
    /// the linear baseline. The range is checked against the enzyme's own
    /// level.
    HealthyRange,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid enzyme response '{0}'. Expected 'linear' or 'healthy-range'")]
pub struct ParseEnzymeResponseError(pub String);

impl FromStr for EnzymeResponse {
    type Err = ParseEnzymeResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(EnzymeResponse::Linear),
            "healthy-range" | "healthy_range" => Ok(EnzymeResponse::HealthyRange),
            _ => Err(ParseEnzymeResponseError(s.to_string())),
        }
    }
}

impl fmt::Display for EnzymeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EnzymeResponse::Linear => "linear",
                EnzymeResponse::HealthyRange => "healthy-range",
            }
        )
    }
}

#[inline]
fn in_range(value: f64, (low, high): (f64, f64)) -> bool {
    low <= value && value <= high
}

/// Step response shared by protease activity and oxidative stress.
#[inline]
fn stress_step(level: f64) -> f64 {
    if 0.4 < level && level < 0.8 {
        0.7
    } else if level <= 0.4 {
        0.2
    } else if level <= 1.0 {
        1.5
    } else {
        1.0
    }
}

#[inline]
pub fn temperature_effect(environment: &Environment) -> f64 {
    let (low, _) = HEALTHY_TEMPERATURE_RANGE;
    if in_range(environment.temperature, HEALTHY_TEMPERATURE_RANGE) {
        1.0
    } else if environment.temperature < low {
        0.7
    } else {
        1.3
    }
}

#[inline]
pub fn kinase_effect(environment: &Environment, response: EnzymeResponse) -> f64 {
    match response {
        EnzymeResponse::HealthyRange
            if in_range(environment.kinase_level, HEALTHY_ENZYME_RANGE) =>
        {
            1.0
        }
        _ => KINASE_BASELINE_FACTOR * environment.kinase_level,
    }
}

#[inline]
pub fn phosphatase_effect(environment: &Environment, response: EnzymeResponse) -> f64 {
    match response {
        EnzymeResponse::HealthyRange
            if in_range(environment.phosphatase_level, HEALTHY_ENZYME_RANGE) =>
        {
            1.0
        }
        _ => PHOSPHATASE_BASELINE_FACTOR * environment.phosphatase_level,
    }
}

#[inline]
pub fn protease_effect(environment: &Environment) -> f64 {
    stress_step(environment.protease_level)
}

#[inline]
pub fn oxidative_effect(environment: &Environment) -> f64 {
    stress_step(environment.oxidative_stress)
}

/// The five per-factor multipliers for one environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectMultipliers {
    pub temperature: f64,
    pub kinase: f64,
    pub phosphatase: f64,
    pub protease: f64,
    pub oxidative: f64,
}

impl EffectMultipliers {
    pub fn from_environment(environment: &Environment, response: EnzymeResponse) -> Self {
        Self {
            temperature: temperature_effect(environment),
            kinase: kinase_effect(environment, response),
            phosphatase: phosphatase_effect(environment, response),
            protease: protease_effect(environment),
            oxidative: oxidative_effect(environment),
        }
    }

    pub fn drive(&self) -> Drive {
        Drive {
            k_p: self.temperature * self.kinase * self.oxidative,
            k_d: self.phosphatase * self.protease,
        }
    }
}

/// Phosphorylation (`k_p`) and dephosphorylation (`k_d`) drive for a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Drive {
    pub k_p: f64,
    pub k_d: f64,
}

impl Drive {
    pub fn new(k_p: f64, k_d: f64) -> Self {
        Self { k_p, k_d }
    }

    /// Fixed point of the relaxation, or `None` when both drives vanish.
    pub fn equilibrium(&self) -> Option<f64> {
        let total = self.k_p + self.k_d;
        (total > 0.0).then(|| self.k_p / total)
    }
}
