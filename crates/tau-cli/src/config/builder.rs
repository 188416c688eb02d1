use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileProtein, FileSimulation};
use super::models::{AppConfig, ProteinSetup, SiteLayout};
use crate::cli::SimulationArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tausim::core::models::environment::Environment;
use tausim::core::models::isoform::Isoform;
use tausim::core::models::sequence::ProteinSequence;
use tausim::engine::config::{SamplingPolicy, SimulationConfigBuilder};
use tausim::engine::state::SiteInitialization;
use tracing::debug;

/// Merges CLI flags, `-S` overrides, the config file and built-in defaults,
/// in that order of precedence.
pub fn build_config(args: &SimulationArgs, replicates_override: Option<usize>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let mut file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    file_config.apply_set_values(&args.set_values)?;
    let config_dir = args.config.as_deref().and_then(Path::parent);

    let env_file = file_config.environment.take().unwrap_or_default();
    let base = Environment::default();
    let environment = Environment::builder()
        .temperature(args.temperature.or(env_file.temperature).unwrap_or(base.temperature))
        .kinase_level(
            args.kinase_level
                .or(env_file.kinase_level)
                .unwrap_or(base.kinase_level),
        )
        .phosphatase_level(
            args.phosphatase_level
                .or(env_file.phosphatase_level)
                .unwrap_or(base.phosphatase_level),
        )
        .protease_level(
            args.protease_level
                .or(env_file.protease_level)
                .unwrap_or(base.protease_level),
        )
        .oxidative_stress(
            args.oxidative_stress
                .or(env_file.oxidative_stress)
                .unwrap_or(base.oxidative_stress),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let protein_file = file_config.protein.take().unwrap_or_default();
    let protein = merge_protein(args, protein_file, config_dir, &defaults)?;

    let sim_file = file_config.simulation.take().unwrap_or_default();
    let timepoints = resolve_timepoints(args, &sim_file, &defaults)?;

    let sampling_policy = match args.sampling.as_deref().or(sim_file.sampling.as_deref()) {
        Some(s) => parse_named("sampling", s)?,
        None => SamplingPolicy::default(),
    };
    let mut simulation = SimulationConfigBuilder::new().sampling_policy(sampling_policy);
    if let Some(response) = args
        .enzyme_response
        .as_deref()
        .or(sim_file.enzyme_response.as_deref())
    {
        simulation = simulation.enzyme_response(parse_named("enzyme-response", response)?);
    }
    if let Some(seed) = args.seed.or(sim_file.seed) {
        simulation = simulation.seed(seed);
    }
    let simulation = simulation
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let replicates = replicates_override
        .or(sim_file.replicates)
        .unwrap_or(defaults.replicates);

    let config = AppConfig {
        environment,
        protein,
        timepoints,
        simulation,
        replicates,
    };
    debug!("Resolved configuration: {:?}", &config);
    Ok(config)
}

fn merge_protein(
    args: &SimulationArgs,
    file: FileProtein,
    config_dir: Option<&Path>,
    defaults: &DefaultsConfig,
) -> Result<ProteinSetup> {
    let isoform = match (args.isoform.as_deref(), file.isoform.as_deref(), file.exon.as_deref()) {
        (Some(s), _, _) | (None, Some(s), _) => parse_named("isoform", s)?,
        (None, None, Some(exon)) => Isoform::from_exon(exon).ok_or_else(|| {
            CliError::Config(format!("Unrecognized exon 10 descriptor '{}'", exon))
        })?,
        (None, None, None) => Isoform::default(),
    };

    let sequence = if let Some(path) = &args.sequence_file {
        Some(read_sequence_file(path)?)
    } else if let Some(path) = &file.sequence_file {
        Some(read_sequence_file(&resolve_relative(path, config_dir))?)
    } else if let Some(text) = &file.sequence {
        Some(
            ProteinSequence::from_one_letter(text)
                .map_err(|e| CliError::Config(format!("Invalid protein sequence: {}", e)))?,
        )
    } else {
        None
    };

    let sites = match (args.site_count, file.sites, file.site_count) {
        (Some(count), _, _) => SiteLayout::Residues(count),
        (None, Some(names), _) => SiteLayout::Named(names),
        (None, None, Some(count)) => SiteLayout::Residues(count),
        (None, None, None) => SiteLayout::Residues(defaults.site_count),
    };

    let initialization = match (args.initial_probability, file.initial_probability, file.initial_range) {
        (Some(p), _, _) | (None, Some(p), _) => SiteInitialization::Fixed(p),
        (None, None, Some([low, high])) => SiteInitialization::Uniform { low, high },
        (None, None, None) => {
            let (low, high) = defaults.initial_range;
            SiteInitialization::Uniform { low, high }
        }
    };

    Ok(ProteinSetup {
        isoform,
        sequence,
        truncation_site: args.truncate.clone().or(file.truncation_site),
        truncated: file.truncated.unwrap_or(false),
        sites,
        initialization,
    })
}

fn resolve_timepoints(
    args: &SimulationArgs,
    file: &FileSimulation,
    defaults: &DefaultsConfig,
) -> Result<Vec<f64>> {
    if file.timepoints.is_some() && file.time_range.is_some() {
        return Err(CliError::Config(
            "'timepoints' and 'time-range' cannot both be set in the config file".to_string(),
        ));
    }

    let times = if let Some(range) = &args.time.time_range {
        parser::parse_time_range(range)
    } else if let Some(count) = args.time.timepoints {
        parser::timepoints_from_count(count)
    } else if let Some(range) = &file.time_range {
        parser::parse_time_range(range)
    } else {
        parser::timepoints_from_count(file.timepoints.unwrap_or(defaults.timepoints))
    };
    times.map_err(|e| CliError::Argument(e.to_string()))
}

fn parse_named<T>(parameter: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| CliError::Config(format!("Invalid {}: {}", parameter, e)))
}

fn resolve_relative(path: &Path, base: Option<&Path>) -> PathBuf {
    match base {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Reads a one-letter sequence, skipping FASTA header lines.
fn read_sequence_file(path: &Path) -> Result<ProteinSequence> {
    debug!("Reading protein sequence from {:?}", path);
    let content = std::fs::read_to_string(path)?;
    let residues: String = content
        .lines()
        .filter(|line| !line.trim_start().starts_with('>'))
        .collect();
    ProteinSequence::from_one_letter(&residues).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TimeArgs;
    use std::io::Write;
    use tausim::core::effects::EnzymeResponse;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = build_config(&SimulationArgs::default(), None).unwrap();
        assert_eq!(config.environment, Environment::default());
        assert_eq!(config.protein.isoform, Isoform::FourRepeat);
        assert_eq!(config.protein.sites, SiteLayout::Residues(79));
        assert_eq!(
            config.protein.initialization,
            SiteInitialization::Uniform { low: 0.0, high: 1.0 }
        );
        assert_eq!(config.timepoints.len(), 50);
        assert_eq!(config.simulation.sampling_policy, SamplingPolicy::None);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.replicates, 100);
    }

    #[test]
    fn cli_flags_beat_set_values_which_beat_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "config.toml",
            "[environment]\ntemperature = 35.0\nkinase-level = 2.0\nprotease-level = 0.5\n",
        );
        let args = SimulationArgs {
            config: Some(path),
            temperature: Some(40.0),
            set_values: vec!["environment.kinase-level=3.0".to_string()],
            ..Default::default()
        };
        let config = build_config(&args, None).unwrap();
        assert_eq!(config.environment.temperature, 40.0);
        assert_eq!(config.environment.kinase_level, 3.0);
        assert_eq!(config.environment.protease_level, 0.5);
        assert_eq!(config.environment.phosphatase_level, 1.0);
    }

    #[test]
    fn invalid_environment_is_a_config_error() {
        let args = SimulationArgs {
            phosphatase_level: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(build_config(&args, None), Err(CliError::Config(_))));
    }

    #[test]
    fn exon_descriptor_selects_isoform_when_isoform_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "c.toml", "[protein]\nexon = \"R1 at 10\"\n");
        let args = SimulationArgs {
            config: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(
            build_config(&args, None).unwrap().protein.isoform,
            Isoform::ThreeRepeat
        );

        let args = SimulationArgs {
            config: Some(path),
            isoform: Some("4R".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_config(&args, None).unwrap().protein.isoform,
            Isoform::FourRepeat
        );
    }

    #[test]
    fn named_sites_and_fixed_probability_come_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "c.toml",
            "[protein]\nsites = [\"S202_T205\", \"T231\"]\ninitial-probability = 0.3\n",
        );
        let args = SimulationArgs {
            config: Some(path),
            ..Default::default()
        };
        let config = build_config(&args, None).unwrap();
        assert_eq!(
            config.protein.sites,
            SiteLayout::Named(vec!["S202_T205".to_string(), "T231".to_string()])
        );
        assert_eq!(config.protein.initialization, SiteInitialization::Fixed(0.3));

        let state = config.protein.build_state(None).unwrap();
        assert_eq!(state.sites().len(), 2);
        assert_eq!(state.sites().current(&"T231".into()), Some(0.3));
    }

    #[test]
    fn cli_site_count_overrides_named_sites() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "c.toml", "[protein]\nsites = [\"T231\"]\n");
        let args = SimulationArgs {
            config: Some(path),
            site_count: Some(5),
            ..Default::default()
        };
        assert_eq!(
            build_config(&args, None).unwrap().protein.sites,
            SiteLayout::Residues(5)
        );
    }

    #[test]
    fn sequence_file_skips_fasta_headers_and_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "tau.fasta", ">sp|P10636|TAU_HUMAN\nGKVQII\nNKKLDL\n");
        let path = write_file(
            dir.path(),
            "c.toml",
            "[protein]\nsequence-file = \"tau.fasta\"\n",
        );
        let args = SimulationArgs {
            config: Some(path),
            ..Default::default()
        };
        let sequence = build_config(&args, None).unwrap().protein.sequence.unwrap();
        assert_eq!(sequence.to_one_letter_string(), "GKVQIINKKLDL");
    }

    #[test]
    fn malformed_sequence_file_is_a_parsing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.fasta", ">header\nGK1Q\n");
        let args = SimulationArgs {
            sequence_file: Some(path),
            ..Default::default()
        };
        assert!(matches!(
            build_config(&args, None),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn cli_time_range_beats_file_timepoints() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "c.toml", "[simulation]\ntimepoints = 7\n");
        let args = SimulationArgs {
            config: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(build_config(&args, None).unwrap().timepoints.len(), 7);

        let args = SimulationArgs {
            config: Some(path),
            time: TimeArgs {
                timepoints: None,
                time_range: Some("0:2:0.5".to_string()),
            },
            ..Default::default()
        };
        assert_eq!(
            build_config(&args, None).unwrap().timepoints,
            vec![0.0, 0.5, 1.0, 1.5, 2.0]
        );
    }

    #[test]
    fn file_with_both_time_settings_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "c.toml",
            "[simulation]\ntimepoints = 7\ntime-range = \"0:1:0.5\"\n",
        );
        let args = SimulationArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(matches!(build_config(&args, None), Err(CliError::Config(_))));
    }

    #[test]
    fn set_timepoints_overrides_file_time_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "c.toml",
            "[simulation]\ntime-range = \"0:10:0.5\"\n",
        );
        let args = SimulationArgs {
            config: Some(path),
            set_values: vec!["simulation.timepoints=20".to_string()],
            ..Default::default()
        };
        let config = build_config(&args, None).unwrap();
        assert_eq!(config.timepoints.len(), 20);
        assert_eq!(config.timepoints[19], 19.0);
    }

    #[test]
    fn zero_timepoints_is_an_argument_error() {
        let args = SimulationArgs {
            time: TimeArgs {
                timepoints: Some(0),
                time_range: None,
            },
            ..Default::default()
        };
        assert!(matches!(build_config(&args, None), Err(CliError::Argument(_))));
    }

    #[test]
    fn simulation_settings_merge_and_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "c.toml",
            "[simulation]\nsampling = \"bernoulli\"\nenzyme-response = \"healthy-range\"\nseed = 11\nreplicates = 8\n",
        );
        let args = SimulationArgs {
            config: Some(path),
            seed: Some(99),
            ..Default::default()
        };
        let config = build_config(&args, Some(3)).unwrap();
        assert_eq!(config.simulation.sampling_policy, SamplingPolicy::Bernoulli);
        assert_eq!(config.simulation.enzyme_response, EnzymeResponse::HealthyRange);
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.replicates, 3);
    }

    #[test]
    fn unknown_policy_names_are_rejected() {
        let args = SimulationArgs {
            sampling: Some("gillespie".to_string()),
            ..Default::default()
        };
        assert!(matches!(build_config(&args, None), Err(CliError::Config(_))));
    }
}
