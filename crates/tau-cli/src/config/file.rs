use crate::error::{CliError, Result};
use crate::utils::parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileEnvironment {
    pub temperature: Option<f64>,
    pub kinase_level: Option<f64>,
    pub phosphatase_level: Option<f64>,
    pub protease_level: Option<f64>,
    pub oxidative_stress: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileProtein {
    pub isoform: Option<String>,
    /// Exon 10 splicing descriptor, e.g. "R2 at 10".
    pub exon: Option<String>,
    pub sequence: Option<String>,
    pub sequence_file: Option<PathBuf>,
    pub truncation_site: Option<String>,
    pub truncated: Option<bool>,
    pub site_count: Option<u32>,
    pub sites: Option<Vec<String>>,
    pub initial_probability: Option<f64>,
    pub initial_range: Option<[f64; 2]>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSimulation {
    pub timepoints: Option<usize>,
    pub time_range: Option<String>,
    pub sampling: Option<String>,
    pub enzyme_response: Option<String>,
    pub seed: Option<u64>,
    pub replicates: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub environment: Option<FileEnvironment>,
    pub protein: Option<FileProtein>,
    pub simulation: Option<FileSimulation>,
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value))
    })
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Applies `-S section.key=value` overrides on top of the file values.
    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) =
                parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

            match key.split_once('.') {
                Some(("environment", field)) => {
                    let env = self.environment.get_or_insert_with(Default::default);
                    let slot = match field {
                        "temperature" => &mut env.temperature,
                        "kinase-level" => &mut env.kinase_level,
                        "phosphatase-level" => &mut env.phosphatase_level,
                        "protease-level" => &mut env.protease_level,
                        "oxidative-stress" => &mut env.oxidative_stress,
                        _ => return Err(unsupported_key(key)),
                    };
                    *slot = Some(parse_value(key, value)?);
                }
                Some(("protein", field)) => {
                    let protein = self.protein.get_or_insert_with(Default::default);
                    match field {
                        "isoform" => protein.isoform = Some(value.to_string()),
                        "exon" => protein.exon = Some(value.to_string()),
                        "sequence" => protein.sequence = Some(value.to_string()),
                        "sequence-file" => protein.sequence_file = Some(PathBuf::from(value)),
                        "truncation-site" => protein.truncation_site = Some(value.to_string()),
                        "truncated" => protein.truncated = Some(parse_value(key, value)?),
                        "site-count" => protein.site_count = Some(parse_value(key, value)?),
                        "initial-probability" => {
                            protein.initial_probability = Some(parse_value(key, value)?)
                        }
                        _ => return Err(unsupported_key(key)),
                    }
                }
                Some(("simulation", field)) => {
                    let sim = self.simulation.get_or_insert_with(Default::default);
                    match field {
                        "timepoints" => {
                            sim.timepoints = Some(parse_value(key, value)?);
                            sim.time_range = None;
                        }
                        "time-range" => {
                            sim.time_range = Some(value.to_string());
                            sim.timepoints = None;
                        }
                        "sampling" => sim.sampling = Some(value.to_string()),
                        "enzyme-response" => sim.enzyme_response = Some(value.to_string()),
                        "seed" => sim.seed = Some(parse_value(key, value)?),
                        "replicates" => sim.replicates = Some(parse_value(key, value)?),
                        _ => return Err(unsupported_key(key)),
                    }
                }
                _ => return Err(unsupported_key(key)),
            }
        }
        Ok(())
    }
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}
