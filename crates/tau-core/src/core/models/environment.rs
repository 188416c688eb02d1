use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Plausible bounds for the incubation temperature, in °C.
pub const TEMPERATURE_RANGE: (f64, f64) = (-50.0, 150.0);

#[derive(Debug, Error, PartialEq, Clone)]
#[error("Invalid parameter '{parameter}': {reason}")]
pub struct ParameterError {
    pub parameter: &'static str,
    pub reason: String,
}

impl ParameterError {
    pub fn new(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            parameter,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EnvironmentLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ParameterError),
}

/// Cellular conditions a tau molecule is exposed to during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Environment {
    pub temperature: f64,       // °C
    pub kinase_level: f64,      // relative kinase activity
    pub phosphatase_level: f64, // relative phosphatase activity
    pub protease_level: f64,    // relative protease activity
    pub oxidative_stress: f64,  // conventionally 0–1
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature: 37.0,
            kinase_level: 1.0,
            phosphatase_level: 1.0,
            protease_level: 1.0,
            oxidative_stress: 0.0,
        }
    }
}

impl Environment {
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    /// Rejects non-finite values, negative levels and implausible temperatures.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let (t_min, t_max) = TEMPERATURE_RANGE;
        if !self.temperature.is_finite() || !(t_min..=t_max).contains(&self.temperature) {
            return Err(ParameterError::new(
                "temperature",
                format!(
                    "{} °C is outside the plausible range [{}, {}]",
                    self.temperature, t_min, t_max
                ),
            ));
        }

        let levels = [
            ("kinase_level", self.kinase_level),
            ("phosphatase_level", self.phosphatase_level),
            ("protease_level", self.protease_level),
            ("oxidative_stress", self.oxidative_stress),
        ];
        for (name, value) in levels {
            if !value.is_finite() || value < 0.0 {
                return Err(ParameterError::new(
                    name,
                    format!("{value} must be a finite, non-negative number"),
                ));
            }
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads and validates an environment from a TOML file. Missing keys take
    /// their default values.
    pub fn load(path: &Path) -> Result<Self, EnvironmentLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| EnvironmentLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let environment =
            Self::from_toml_str(&content).map_err(|e| EnvironmentLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        environment.validate()?;
        Ok(environment)
    }
}

#[derive(Debug, Default, Clone)]
pub struct EnvironmentBuilder {
    temperature: Option<f64>,
    kinase_level: Option<f64>,
    phosphatase_level: Option<f64>,
    protease_level: Option<f64>,
    oxidative_stress: Option<f64>,
}

impl EnvironmentBuilder {
    pub fn temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }
    pub fn kinase_level(mut self, level: f64) -> Self {
        self.kinase_level = Some(level);
        self
    }
    pub fn phosphatase_level(mut self, level: f64) -> Self {
        self.phosphatase_level = Some(level);
        self
    }
    pub fn protease_level(mut self, level: f64) -> Self {
        self.protease_level = Some(level);
        self
    }
    pub fn oxidative_stress(mut self, level: f64) -> Self {
        self.oxidative_stress = Some(level);
        self
    }

    pub fn build(self) -> Result<Environment, ParameterError> {
        let defaults = Environment::default();
        let environment = Environment {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            kinase_level: self.kinase_level.unwrap_or(defaults.kinase_level),
            phosphatase_level: self.phosphatase_level.unwrap_or(defaults.phosphatase_level),
            protease_level: self.protease_level.unwrap_or(defaults.protease_level),
            oxidative_stress: self.oxidative_stress.unwrap_or(defaults.oxidative_stress),
        };
        environment.validate()?;
        Ok(environment)
    }
}
