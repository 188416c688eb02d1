use crate::core::aggregation::AggregationState;
use crate::core::models::environment::{Environment, ParameterError};
use crate::core::models::history::History;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::evolution::RunMode;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::TauSimulationState;
use serde::Serialize;
use tracing::{info, instrument};

/// Headline numbers of one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub timepoints: usize,
    pub final_time: f64,
    pub phospho_count: usize,
    pub avg_prob: f64,
    pub aggregation_state: AggregationState,
    pub peak_state: AggregationState,
    pub first_oligomer_time: Option<f64>,
    pub first_fibril_time: Option<f64>,
}

impl RunSummary {
    /// Summarizes a history; `None` when nothing was logged.
    pub fn from_history(history: &History) -> Option<Self> {
        let last = history.last()?;
        Some(Self {
            timepoints: history.len(),
            final_time: last.time,
            phospho_count: last.phospho_count,
            avg_prob: last.avg_prob,
            aggregation_state: last.aggregation_state,
            peak_state: history.peak_state()?,
            first_oligomer_time: history.first_time_at(AggregationState::Oligomer),
            first_fibril_time: history.first_time_at(AggregationState::Fibril),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub state: TauSimulationState,
    pub summary: RunSummary,
}

/// Evolves a copy of `initial_state` through `timepoints`.
///
/// `RunMode::Continue` extends whatever history `initial_state` already
/// carries.
#[instrument(skip_all, name = "simulation_workflow")]
pub fn run(
    initial_state: &TauSimulationState,
    environment: &Environment,
    timepoints: &[f64],
    config: &SimulationConfig,
    mode: RunMode,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    info!(
        isoform = %initial_state.isoform(),
        sites = initial_state.sites().len(),
        sampling = %config.sampling_policy,
        "Starting simulation workflow."
    );

    let mut state = initial_state.clone();
    state.run(environment, timepoints, config, mode, reporter)?;

    let summary = RunSummary::from_history(state.history())
        .ok_or_else(|| ParameterError::new("timepoints", "the run logged no timepoints"))?;

    reporter.report(Progress::Message(format!(
        "Final state: {} (avg. probability {:.3})",
        summary.aggregation_state, summary.avg_prob
    )));
    info!(
        final_state = %summary.aggregation_state,
        peak_state = %summary.peak_state,
        "Simulation workflow complete."
    );
    Ok(SimulationResult { state, summary })
}
