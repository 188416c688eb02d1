use crate::cli::RunArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use tausim::{
    core::io::{
        history_csv::{self, HistoryCsv},
        traits::HistoryFile,
    },
    engine::{evolution::RunMode, progress::ProgressReporter},
    workflows::{self, simulate::RunSummary},
};
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = config::build_config(&args.simulation, None)?;

    info!("Building initial tau state...");
    let initial_state = app_config.protein.build_state(app_config.simulation.seed)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Evolving {} tau with {} site(s) over {} timepoint(s)...",
        initial_state.isoform(),
        initial_state.sites().len(),
        app_config.timepoints.len()
    );
    info!("Invoking the core simulation workflow...");

    let result = workflows::simulate::run(
        &initial_state,
        &app_config.environment,
        &app_config.timepoints,
        &app_config.simulation,
        RunMode::Start,
        &reporter,
    )?;

    print_summary(&result.summary);

    if let Some(path) = &args.history_out {
        info!("Writing history to {:?}", path);
        HistoryCsv::write_to_path(result.state.history(), path).map_err(|e| {
            CliError::Export {
                path: path.clone(),
                source: e,
            }
        })?;
        println!("✓ History written to: {}", path.display());
    }

    if let Some(path) = &args.sites_out {
        info!("Writing per-site series to {:?}", path);
        history_csv::write_site_series_to_path(result.state.history(), result.state.sites(), path)
            .map_err(|e| CliError::Export {
                path: path.clone(),
                source: e,
            })?;
        println!("✓ Site series written to: {}", path.display());
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Run complete.");
    println!("  Final time:        {}", summary.final_time);
    println!("  Aggregation state: {}", summary.aggregation_state);
    println!("  Peak state:        {}", summary.peak_state);
    println!("  Phosphorylated:    {}", summary.phospho_count);
    println!("  Avg. probability:  {:.4}", summary.avg_prob);
    if let Some(t) = summary.first_oligomer_time {
        println!("  First oligomer at: {}", t);
    }
    if let Some(t) = summary.first_fibril_time {
        println!("  First fibril at:   {}", t);
    }
}
