use super::simulate::RunSummary;
use crate::core::aggregation::AggregationState;
use crate::core::models::environment::{Environment, ParameterError};
use crate::engine::config::{EnsembleConfig, SimulationConfig};
use crate::engine::error::EngineError;
use crate::engine::evolution::{RunMode, validate_timepoints};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::TauSimulationState;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Final observation of one replicate. Serialized as one CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplicateOutcome {
    pub replicate: usize,
    pub seed: u64,
    pub final_time: f64,
    pub phospho_count: usize,
    pub avg_prob: f64,
    pub aggregation_state: AggregationState,
    pub peak_state: AggregationState,
}

impl ReplicateOutcome {
    fn new(replicate: usize, seed: u64, summary: &RunSummary) -> Self {
        Self {
            replicate,
            seed,
            final_time: summary.final_time,
            phospho_count: summary.phospho_count,
            avg_prob: summary.avg_prob,
            aggregation_state: summary.aggregation_state,
            peak_state: summary.peak_state,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleResult {
    /// Outcomes in replicate order.
    pub outcomes: Vec<ReplicateOutcome>,
}

impl EnsembleResult {
    /// Number of replicates ending in each aggregation state.
    pub fn state_counts(&self) -> BTreeMap<AggregationState, usize> {
        let mut counts = BTreeMap::new();
        for outcome in &self.outcomes {
            *counts.entry(outcome.aggregation_state).or_insert(0) += 1;
        }
        counts
    }

    /// Fraction of replicates ending in `state`.
    pub fn fraction(&self, state: AggregationState) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let n = self
            .outcomes
            .iter()
            .filter(|o| o.aggregation_state == state)
            .count();
        n as f64 / self.outcomes.len() as f64
    }

    pub fn mean_final_probability(&self) -> f64 {
        mean(self.outcomes.iter().map(|o| o.avg_prob))
    }

    pub fn mean_phospho_count(&self) -> f64 {
        mean(self.outcomes.iter().map(|o| o.phospho_count as f64))
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Runs independent replicates in parallel.
///
/// `factory` builds the initial state of each replicate from its seed; the
/// same seed drives that replicate's Bernoulli draws. Results depend only on
/// `config.base_seed`, not on thread scheduling.
#[instrument(skip_all, name = "ensemble_workflow", fields(replicates = config.replicates))]
pub fn run<F>(
    factory: F,
    environment: &Environment,
    timepoints: &[f64],
    config: &EnsembleConfig,
    reporter: &ProgressReporter,
) -> Result<EnsembleResult, EngineError>
where
    F: Fn(u64) -> Result<TauSimulationState, EngineError> + Sync,
{
    config.validate()?;
    environment.validate()?;
    validate_timepoints(timepoints, None)?;

    info!(
        timepoints = timepoints.len(),
        sampling = %config.simulation.sampling_policy,
        "Starting ensemble workflow."
    );
    reporter.report(Progress::EnsembleStart {
        replicates: config.replicates as u64,
    });

    let silent = ProgressReporter::new();
    let outcomes = (0..config.replicates)
        .into_par_iter()
        .map(|replicate| -> Result<ReplicateOutcome, EngineError> {
            let seed = config.replicate_seed(replicate);
            let simulation = SimulationConfig {
                seed: Some(seed),
                ..config.simulation
            };

            let mut state = factory(seed)?;
            state.run(environment, timepoints, &simulation, RunMode::Start, &silent)?;

            let summary = RunSummary::from_history(state.history())
                .ok_or_else(|| ParameterError::new("timepoints", "the run logged no timepoints"))?;
            debug!(replicate, seed, final_state = %summary.aggregation_state, "Replicate finished.");
            reporter.report(Progress::ReplicateFinish);
            Ok(ReplicateOutcome::new(replicate, seed, &summary))
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    reporter.report(Progress::EnsembleFinish);
    let result = EnsembleResult { outcomes };
    info!(
        mean_final_probability = result.mean_final_probability(),
        fibril_fraction = result.fraction(AggregationState::Fibril),
        "Ensemble workflow complete."
    );
    Ok(result)
}
