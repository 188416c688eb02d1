use super::config::{SamplingPolicy, SimulationConfig};
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::state::TauSimulationState;
use crate::core::effects::{Drive, EffectMultipliers};
use crate::core::models::environment::{Environment, ParameterError};
use crate::core::models::history::HistoryEntry;
use crate::core::models::sequence::ProteinSequence;
use crate::core::models::sites::SiteStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Clear the history and log the current state as the first timepoint.
    Start,
    /// Append to the existing history; every timepoint applies one update.
    Continue,
}

/// One relaxation step of a site probability towards `k_p / (k_p + k_d)`.
#[inline]
pub fn relax(probability: f64, drive: Drive) -> f64 {
    (probability + drive.k_p * (1.0 - probability) - drive.k_d * probability).clamp(0.0, 1.0)
}

/// Checks that timepoints are non-empty, finite and non-decreasing, and that
/// the first one does not precede `not_before`.
pub fn validate_timepoints(timepoints: &[f64], not_before: Option<f64>) -> Result<(), ParameterError> {
    let first = timepoints
        .first()
        .ok_or_else(|| ParameterError::new("timepoints", "at least one timepoint is required"))?;

    if let Some(t) = timepoints.iter().find(|t| !t.is_finite()) {
        return Err(ParameterError::new(
            "timepoints",
            format!("timepoint {t} is not finite"),
        ));
    }
    if let Some(w) = timepoints.windows(2).find(|w| w[1] < w[0]) {
        return Err(ParameterError::new(
            "timepoints",
            format!("timepoint {} follows the later timepoint {}", w[1], w[0]),
        ));
    }
    if let Some(last) = not_before {
        if *first < last {
            return Err(ParameterError::new(
                "timepoints",
                format!("first timepoint {first} precedes the last logged time {last}"),
            ));
        }
    }
    Ok(())
}

/// Mixed into the run seed so Bernoulli draws never replay the stream that
/// drew the initial site probabilities from the same seed.
const OBSERVER_STREAM_SALT: u64 = 0xD1B5_4A32_D192_ED03;

/// Turns site probabilities into the logged phosphorylation count.
struct Observer {
    rng: Option<StdRng>,
}

impl Observer {
    fn new(config: &SimulationConfig) -> Self {
        let rng = match config.sampling_policy {
            SamplingPolicy::None => None,
            SamplingPolicy::Bernoulli => Some(
                config
                    .seed
                    .map(|seed| StdRng::seed_from_u64(seed ^ OBSERVER_STREAM_SALT))
                    .unwrap_or_else(StdRng::from_entropy),
            ),
        };
        Self { rng }
    }

    fn phospho_count(&mut self, sites: &SiteStore) -> usize {
        match &mut self.rng {
            None => sites.phosphorylated_count(),
            Some(rng) => sites
                .current_probabilities()
                .filter(|&p| rng.r#gen::<f64>() < p)
                .count(),
        }
    }
}

/// Runs `state` through `timepoints` under a fixed environment.
///
/// Inputs are validated before anything is mutated.
pub(crate) fn advance(
    state: &mut TauSimulationState,
    environment: &Environment,
    timepoints: &[f64],
    config: &SimulationConfig,
    mode: RunMode,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    environment.validate()?;
    let continuing = mode == RunMode::Continue && !state.history.is_empty();
    let not_before = if continuing {
        state.history.last_time()
    } else {
        None
    };
    validate_timepoints(timepoints, not_before)?;

    let multipliers = EffectMultipliers::from_environment(environment, config.enzyme_response);
    let drive = multipliers.drive();
    debug!(
        temperature = multipliers.temperature,
        kinase = multipliers.kinase,
        phosphatase = multipliers.phosphatase,
        protease = multipliers.protease,
        oxidative = multipliers.oxidative,
        k_p = drive.k_p,
        k_d = drive.k_d,
        "Computed effect multipliers."
    );

    let motif_count = state
        .sequence
        .as_ref()
        .map_or(0, ProteinSequence::motif_count);
    let mut observer = Observer::new(config);

    if !continuing {
        state.history.clear();
        state.sites.reset_series();
    }

    info!(
        mode = ?mode,
        sites = state.sites.len(),
        timepoints = timepoints.len(),
        "Starting state evolution."
    );
    reporter.report(Progress::RunStart {
        total_timepoints: timepoints.len() as u64,
    });

    for (i, &time) in timepoints.iter().enumerate() {
        if continuing || i > 0 {
            state.sites.advance(|p| relax(p, drive));
        }

        let phospho_count = observer.phospho_count(&state.sites);
        let avg_prob = state.sites.mean_probability();
        state.aggregation_state = state.aggregation_inputs(phospho_count, motif_count).classify();
        state.age += 1;
        state.history.push(HistoryEntry {
            time,
            phospho_count,
            aggregation_state: state.aggregation_state,
            avg_prob,
        });

        trace!(
            time,
            phospho_count,
            avg_prob,
            state = %state.aggregation_state,
            "Logged timepoint."
        );
        reporter.report(Progress::TimepointLogged {
            time,
            aggregation_state: state.aggregation_state,
        });
    }

    reporter.report(Progress::RunFinish);
    info!(
        final_state = %state.aggregation_state,
        logged = state.history.len(),
        age = state.age,
        "State evolution finished."
    );
    Ok(())
}
