use crate::core::effects::EnzymeResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// How the logged phosphorylation count is observed from site probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingPolicy {
    /// Count sites whose probability exceeds 0.5.
    #[default]
    None,
    /// Count sites whose uniform draw falls below their probability. Draws
    /// only affect the logged count, never the probabilities.
    Bernoulli,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid sampling policy '{0}'. Expected 'none' or 'bernoulli'")]
pub struct ParseSamplingPolicyError(pub String);

impl FromStr for SamplingPolicy {
    type Err = ParseSamplingPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(SamplingPolicy::None),
            "bernoulli" => Ok(SamplingPolicy::Bernoulli),
            _ => Err(ParseSamplingPolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for SamplingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SamplingPolicy::None => "none",
                SamplingPolicy::Bernoulli => "bernoulli",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationConfig {
    pub sampling_policy: SamplingPolicy,
    pub enzyme_response: EnzymeResponse,
    /// Seed for Bernoulli draws; runs without a seed draw from system entropy.
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    sampling_policy: Option<SamplingPolicy>,
    enzyme_response: Option<EnzymeResponse>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sampling_policy(mut self, policy: SamplingPolicy) -> Self {
        self.sampling_policy = Some(policy);
        self
    }
    pub fn enzyme_response(mut self, response: EnzymeResponse) -> Self {
        self.enzyme_response = Some(response);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        Ok(SimulationConfig {
            sampling_policy: self.sampling_policy.unwrap_or_default(),
            enzyme_response: self.enzyme_response.unwrap_or_default(),
            seed: self.seed,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleConfig {
    pub simulation: SimulationConfig,
    pub replicates: usize,
    pub base_seed: u64,
}

impl EnsembleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replicates == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "replicates",
                reason: "at least one replicate is required".to_string(),
            });
        }
        Ok(())
    }

    /// Seed of replicate `index`, stable for a given base seed.
    pub fn replicate_seed(&self, index: usize) -> u64 {
        self.base_seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

#[derive(Default)]
pub struct EnsembleConfigBuilder {
    simulation: Option<SimulationConfig>,
    replicates: Option<usize>,
    base_seed: Option<u64>,
}

impl EnsembleConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulation(mut self, config: SimulationConfig) -> Self {
        self.simulation = Some(config);
        self
    }
    pub fn replicates(mut self, n: usize) -> Self {
        self.replicates = Some(n);
        self
    }
    pub fn base_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<EnsembleConfig, ConfigError> {
        let config = EnsembleConfig {
            simulation: self.simulation.unwrap_or_default(),
            replicates: self
                .replicates
                .ok_or(ConfigError::MissingParameter("replicates"))?,
            base_seed: self
                .base_seed
                .ok_or(ConfigError::MissingParameter("base_seed"))?,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn simulation_builder_defaults_to_deterministic_linear_run() {
        let config = SimulationConfigBuilder::new().build().unwrap();
        assert_eq!(config.sampling_policy, SamplingPolicy::None);
        assert_eq!(config.enzyme_response, EnzymeResponse::Linear);
        assert_eq!(config.seed, None);
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn simulation_builder_applies_every_setter() {
        let config = SimulationConfigBuilder::new()
            .sampling_policy(SamplingPolicy::Bernoulli)
            .enzyme_response(EnzymeResponse::HealthyRange)
            .seed(42)
            .build()
            .unwrap();
        assert_eq!(config.sampling_policy, SamplingPolicy::Bernoulli);
        assert_eq!(config.enzyme_response, EnzymeResponse::HealthyRange);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn ensemble_builder_requires_replicates_and_seed() {
        let err = EnsembleConfigBuilder::new().base_seed(1).build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("replicates"));
        let err = EnsembleConfigBuilder::new().replicates(4).build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("base_seed"));
    }

    #[test]
    fn ensemble_builder_rejects_zero_replicates() {
        let err = EnsembleConfigBuilder::new()
            .replicates(0)
            .base_seed(1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                parameter: "replicates",
                ..
            }
        ));
    }

    #[test]
    fn replicate_seeds_are_distinct_and_reproducible() {
        let config = EnsembleConfigBuilder::new()
            .replicates(64)
            .base_seed(7)
            .build()
            .unwrap();
        let seeds: HashSet<u64> = (0..64).map(|i| config.replicate_seed(i)).collect();
        assert_eq!(seeds.len(), 64);
        assert_eq!(config.replicate_seed(3), config.clone().replicate_seed(3));
    }

    #[test]
    fn sampling_policy_parses_case_insensitively() {
        assert_eq!("Bernoulli".parse(), Ok(SamplingPolicy::Bernoulli));
        assert_eq!("none".parse(), Ok(SamplingPolicy::None));
        assert!("poisson".parse::<SamplingPolicy>().is_err());
        assert_eq!(SamplingPolicy::Bernoulli.to_string(), "bernoulli");
    }
}
