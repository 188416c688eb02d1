use crate::cli::EnsembleArgs;
use crate::config::{self, DefaultsConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::path::Path;
use tausim::{
    core::{aggregation::AggregationState, io::history_csv::HistoryIoError},
    engine::{config::EnsembleConfigBuilder, progress::ProgressReporter},
    workflows::{self, ensemble::EnsembleResult},
};
use tracing::info;

pub fn run(args: EnsembleArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = config::build_config(&args.simulation, args.replicates)?;

    let base_seed = app_config
        .simulation
        .seed
        .unwrap_or(DefaultsConfig::default().base_seed);
    let ensemble_config = EnsembleConfigBuilder::new()
        .simulation(app_config.simulation)
        .replicates(app_config.replicates)
        .base_seed(base_seed)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Running {} replicate(s) over {} timepoint(s) (base seed {})...",
        ensemble_config.replicates,
        app_config.timepoints.len(),
        base_seed
    );
    info!("Invoking the core ensemble workflow...");

    let protein = &app_config.protein;
    let result = workflows::ensemble::run(
        |seed| protein.build_state(Some(seed)),
        &app_config.environment,
        &app_config.timepoints,
        &ensemble_config,
        &reporter,
    )?;

    print_distribution(&result);

    if let Some(path) = &args.summary_out {
        info!("Writing replicate summary to {:?}", path);
        write_summary(&result, path).map_err(|e| CliError::Export {
            path: path.to_path_buf(),
            source: e,
        })?;
        println!("✓ Replicate summary written to: {}", path.display());
    }

    Ok(())
}

fn print_distribution(result: &EnsembleResult) {
    let counts = result.state_counts();
    println!("Ensemble complete ({} replicates).", result.outcomes.len());
    for state in [
        AggregationState::Monomer,
        AggregationState::Oligomer,
        AggregationState::Fibril,
    ] {
        println!(
            "  {:<9} {:>6}  ({:>5.1}%)",
            state.as_str(),
            counts.get(&state).copied().unwrap_or(0),
            result.fraction(state) * 100.0
        );
    }
    println!(
        "  Mean final probability: {:.4}",
        result.mean_final_probability()
    );
    println!(
        "  Mean phosphorylated:    {:.2}",
        result.mean_phospho_count()
    );
}

fn write_summary(result: &EnsembleResult, path: &Path) -> std::result::Result<(), HistoryIoError> {
    let mut writer = csv::Writer::from_path(path)?;
    for outcome in &result.outcomes {
        writer.serialize(outcome)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tausim::workflows::ensemble::ReplicateOutcome;

    fn outcome(replicate: usize, state: AggregationState) -> ReplicateOutcome {
        ReplicateOutcome {
            replicate,
            seed: replicate as u64 * 7,
            final_time: 9.0,
            phospho_count: 3,
            avg_prob: 0.25,
            aggregation_state: state,
            peak_state: AggregationState::Fibril,
        }
    }

    #[test]
    fn summary_csv_has_one_row_per_replicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let result = EnsembleResult {
            outcomes: vec![
                outcome(0, AggregationState::Monomer),
                outcome(1, AggregationState::Fibril),
            ],
        };
        write_summary(&result, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "replicate,seed,final_time,phospho_count,avg_prob,aggregation_state,peak_state"
        );
        assert_eq!(lines[1], "0,0,9.0,3,0.25,monomer,fibril");
        assert_eq!(lines[2], "1,7,9.0,3,0.25,fibril,fibril");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn summary_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("summary.csv");
        let result = EnsembleResult { outcomes: vec![] };
        assert!(write_summary(&result, &path).is_err());
    }
}
