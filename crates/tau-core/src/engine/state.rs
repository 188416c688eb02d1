use super::config::SimulationConfig;
use super::error::EngineError;
use super::evolution::{self, RunMode};
use super::progress::ProgressReporter;
use crate::core::aggregation::{AggregationInputs, AggregationState};
use crate::core::models::environment::{Environment, ParameterError};
use crate::core::models::history::History;
use crate::core::models::isoform::Isoform;
use crate::core::models::ptm::Modification;
use crate::core::models::residue::Residue;
use crate::core::models::sequence::{ProteinSequence, TruncationSite};
use crate::core::models::sites::{SiteKey, SiteStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Initial probability assigned to sites added without an explicit value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SiteInitialization {
    Fixed(f64),
    Uniform { low: f64, high: f64 },
}

impl Default for SiteInitialization {
    fn default() -> Self {
        SiteInitialization::Fixed(0.0)
    }
}

impl SiteInitialization {
    fn validate(&self) -> Result<(), ParameterError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        match *self {
            SiteInitialization::Fixed(p) if in_unit(p) => Ok(()),
            SiteInitialization::Uniform { low, high } if in_unit(low) && in_unit(high) && low <= high => {
                Ok(())
            }
            other => Err(ParameterError::new(
                "site_initialization",
                format!("{other:?} does not describe probabilities within [0, 1]"),
            )),
        }
    }

    fn draw(&self, rng: &mut StdRng) -> f64 {
        match *self {
            SiteInitialization::Fixed(p) => p,
            SiteInitialization::Uniform { low, high } => rng.gen_range(low..=high),
        }
    }
}

/// A single tau molecule evolving under a cellular environment.
#[derive(Debug, Clone)]
pub struct TauSimulationState {
    pub(crate) isoform: Isoform,
    pub(crate) sites: SiteStore,
    pub(crate) aggregation_state: AggregationState,
    pub(crate) is_truncated: bool,
    pub(crate) truncation_site: Option<TruncationSite>,
    pub(crate) age: u64,
    pub(crate) history: History,
    pub(crate) sequence: Option<ProteinSequence>,
}

impl TauSimulationState {
    /// A monomeric state with no sites and no sequence.
    pub fn new(isoform: Isoform) -> Self {
        Self {
            isoform,
            sites: SiteStore::new(),
            aggregation_state: AggregationState::Monomer,
            is_truncated: false,
            truncation_site: None,
            age: 0,
            history: History::new(),
            sequence: None,
        }
    }

    pub fn builder() -> TauSimulationStateBuilder {
        TauSimulationStateBuilder::default()
    }

    pub fn isoform(&self) -> Isoform {
        self.isoform
    }
    pub fn sites(&self) -> &SiteStore {
        &self.sites
    }
    pub fn aggregation_state(&self) -> AggregationState {
        self.aggregation_state
    }
    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }
    pub fn truncation_site(&self) -> Option<TruncationSite> {
        self.truncation_site
    }
    /// Timepoints processed over the lifetime of this state.
    pub fn age(&self) -> u64 {
        self.age
    }
    pub fn history(&self) -> &History {
        &self.history
    }
    pub fn sequence(&self) -> Option<&ProteinSequence> {
        self.sequence.as_ref()
    }

    /// Sites whose current probability exceeds 0.5.
    pub fn phosphorylated_count(&self) -> usize {
        self.sites.phosphorylated_count()
    }

    pub fn detect_motifs(&self) -> Result<usize, EngineError> {
        self.sequence
            .as_ref()
            .map(ProteinSequence::motif_count)
            .ok_or(EngineError::MissingSequence {
                operation: "detect_motifs",
            })
    }

    /// Cleaves the embedded sequence at a site such as `"D421"` and marks the
    /// molecule as truncated. Returns the residue at the cleavage position.
    pub fn truncate(&mut self, site: &str) -> Result<Residue, EngineError> {
        let sequence = self.sequence.as_mut().ok_or(EngineError::MissingSequence {
            operation: "truncate",
        })?;
        let site = TruncationSite::parse(site)?;
        let cleaved = sequence.truncate_at(site)?;
        self.is_truncated = true;
        self.truncation_site = Some(site);
        Ok(cleaved)
    }

    pub fn modify_residue(
        &mut self,
        position: usize,
        modification: Modification,
    ) -> Result<(), EngineError> {
        self.sequence_mut("modify_residue")?
            .modify(position, modification)?;
        Ok(())
    }

    pub fn unmodify_residue(&mut self, position: usize) -> Result<Modification, EngineError> {
        Ok(self.sequence_mut("unmodify_residue")?.unmodify(position)?)
    }

    /// Aggregation inputs for the given counts and this molecule's structure.
    pub fn aggregation_inputs(&self, phospho_count: usize, motif_count: usize) -> AggregationInputs {
        AggregationInputs {
            phospho_count,
            motif_count,
            is_truncated: self.is_truncated,
            isoform: self.isoform,
        }
    }

    /// Evolves the state from scratch with the default configuration.
    pub fn update_state(
        &mut self,
        environment: &Environment,
        timepoints: &[f64],
    ) -> Result<&SiteStore, EngineError> {
        self.start_run(environment, timepoints, &SimulationConfig::default())
    }

    /// Clears the history and evolves the state. The first timepoint logs the
    /// current state without updating it.
    pub fn start_run(
        &mut self,
        environment: &Environment,
        timepoints: &[f64],
        config: &SimulationConfig,
    ) -> Result<&SiteStore, EngineError> {
        self.run(
            environment,
            timepoints,
            config,
            RunMode::Start,
            &ProgressReporter::new(),
        )
    }

    /// Extends the existing history, applying one update per timepoint. On a
    /// state that has never run this behaves like [`Self::start_run`].
    pub fn continue_run(
        &mut self,
        environment: &Environment,
        timepoints: &[f64],
        config: &SimulationConfig,
    ) -> Result<&SiteStore, EngineError> {
        self.run(
            environment,
            timepoints,
            config,
            RunMode::Continue,
            &ProgressReporter::new(),
        )
    }

    pub fn run(
        &mut self,
        environment: &Environment,
        timepoints: &[f64],
        config: &SimulationConfig,
        mode: RunMode,
        reporter: &ProgressReporter,
    ) -> Result<&SiteStore, EngineError> {
        evolution::advance(self, environment, timepoints, config, mode, reporter)?;
        Ok(&self.sites)
    }

    fn sequence_mut(&mut self, operation: &'static str) -> Result<&mut ProteinSequence, EngineError> {
        self.sequence
            .as_mut()
            .ok_or(EngineError::MissingSequence { operation })
    }
}

#[derive(Default)]
pub struct TauSimulationStateBuilder {
    isoform: Option<Isoform>,
    sequence: Option<ProteinSequence>,
    sites: Vec<(SiteKey, Option<f64>)>,
    initialization: SiteInitialization,
    seed: Option<u64>,
    truncation: Option<String>,
    truncated: bool,
}

impl TauSimulationStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isoform(mut self, isoform: Isoform) -> Self {
        self.isoform = Some(isoform);
        self
    }
    pub fn sequence(mut self, sequence: ProteinSequence) -> Self {
        self.sequence = Some(sequence);
        self
    }
    /// Adds a site with an explicit initial probability.
    pub fn site(mut self, key: impl Into<SiteKey>, probability: f64) -> Self {
        self.sites.push((key.into(), Some(probability)));
        self
    }
    /// Adds sites whose initial probability comes from the initialization rule.
    pub fn sites<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SiteKey>,
    {
        self.sites
            .extend(keys.into_iter().map(|k| (k.into(), None)));
        self
    }
    /// Adds residue sites `1..=count`.
    pub fn residue_sites(self, count: u32) -> Self {
        self.sites(1..=count)
    }
    pub fn initialization(mut self, initialization: SiteInitialization) -> Self {
        self.initialization = initialization;
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    /// Truncates the sequence at `site` (e.g. `"D421"`) during `build`.
    pub fn truncate_at(mut self, site: impl Into<String>) -> Self {
        self.truncation = Some(site.into());
        self
    }
    /// Marks the molecule as truncated without a sequence to cleave.
    pub fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn build(self) -> Result<TauSimulationState, EngineError> {
        self.initialization.validate()?;
        let mut rng = self
            .seed
            .map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);

        let mut state = TauSimulationState::new(self.isoform.unwrap_or_default());
        for (key, probability) in self.sites {
            let p = probability.unwrap_or_else(|| self.initialization.draw(&mut rng));
            state.sites.insert(key, p)?;
        }
        state.sequence = self.sequence;
        if let Some(site) = self.truncation {
            state.truncate(&site)?;
        }
        state.is_truncated |= self.truncated;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::sequence::SequenceError;

    const REPEAT_DOMAIN: &str = "GKVQIINKKLDLSNVQSKCGSKDNIKHVPGGGSVQIVYKPVDLSKVTSKCGSLGNIHHKPGGGQVEVKSEKLDFKDRVQSKIGSLDNITHVPGGG";

    fn neutral_environment() -> Environment {
        Environment::default()
    }

    #[test]
    fn new_state_is_an_empty_monomer() {
        let state = TauSimulationState::new(Isoform::ThreeRepeat);
        assert_eq!(state.aggregation_state(), AggregationState::Monomer);
        assert_eq!(state.age(), 0);
        assert!(state.history().is_empty());
        assert!(state.sites().is_empty());
        assert!(!state.is_truncated());
    }

    #[test]
    fn builder_assigns_fixed_and_explicit_probabilities() {
        let state = TauSimulationState::builder()
            .residue_sites(3)
            .site("S202_T205", 0.9)
            .initialization(SiteInitialization::Fixed(0.25))
            .build()
            .unwrap();
        assert_eq!(state.sites().len(), 4);
        assert_eq!(state.sites().current(&SiteKey::Residue(2)), Some(0.25));
        assert_eq!(state.sites().current(&"S202_T205".into()), Some(0.9));
        assert_eq!(state.isoform(), Isoform::FourRepeat);
    }

    #[test]
    fn seeded_uniform_initialization_is_reproducible() {
        let build = || {
            TauSimulationState::builder()
                .residue_sites(20)
                .initialization(SiteInitialization::Uniform {
                    low: 0.1,
                    high: 0.3,
                })
                .seed(5)
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.sites(), b.sites());
        assert!(a
            .sites()
            .current_probabilities()
            .all(|p| (0.1..=0.3).contains(&p)));
    }

    #[test]
    fn builder_rejects_invalid_initialization() {
        let err = TauSimulationState::builder()
            .initialization(SiteInitialization::Uniform {
                low: 0.8,
                high: 0.2,
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }

    #[test]
    fn builder_rejects_duplicate_sites() {
        let err = TauSimulationState::builder()
            .site(231u32, 0.1)
            .site(231u32, 0.2)
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }

    #[test]
    fn detect_motifs_requires_a_sequence() {
        let state = TauSimulationState::new(Isoform::FourRepeat);
        assert!(matches!(
            state.detect_motifs(),
            Err(EngineError::MissingSequence {
                operation: "detect_motifs"
            })
        ));
    }

    #[test]
    fn detect_motifs_counts_both_hexapeptides() {
        let state = TauSimulationState::builder()
            .sequence(ProteinSequence::from_one_letter(REPEAT_DOMAIN).unwrap())
            .build()
            .unwrap();
        assert_eq!(state.detect_motifs().unwrap(), 2);
    }

    #[test]
    fn truncate_without_sequence_is_missing_sequence() {
        let mut state = TauSimulationState::new(Isoform::FourRepeat);
        assert!(matches!(
            state.truncate("D421"),
            Err(EngineError::MissingSequence { .. })
        ));
        assert!(!state.is_truncated());
    }

    #[test]
    fn truncate_cleaves_and_marks_state() {
        let mut state = TauSimulationState::builder()
            .sequence(ProteinSequence::from_one_letter("MAEPRQEFEVMEDHAG").unwrap())
            .build()
            .unwrap();
        let cleaved = state.truncate("D13").unwrap();
        assert_eq!(cleaved.one_letter(), 'D');
        assert!(state.is_truncated());
        assert_eq!(state.sequence().unwrap().len(), 13);
        assert_eq!(
            state.truncation_site(),
            Some(TruncationSite {
                residue: 'D',
                position: 13
            })
        );
    }

    #[test]
    fn truncate_with_wrong_residue_leaves_state_untouched() {
        let mut state = TauSimulationState::builder()
            .sequence(ProteinSequence::from_one_letter("MAEPRQEFEV").unwrap())
            .build()
            .unwrap();
        let err = state.truncate("D3").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Sequence(SequenceError::ResidueMismatch { .. })
        ));
        assert!(!state.is_truncated());
        assert_eq!(state.sequence().unwrap().len(), 10);
    }

    #[test]
    fn modify_residue_maps_incompatible_ptm() {
        let mut state = TauSimulationState::builder()
            .sequence(ProteinSequence::from_one_letter("MAS").unwrap())
            .build()
            .unwrap();
        let err = state
            .modify_residue(2, Modification::Phosphorylation)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedModification { position: 2, .. }
        ));
        state
            .modify_residue(3, Modification::Phosphorylation)
            .unwrap();
        assert_eq!(state.sequence().unwrap().phosphorylated_count(), 1);
        assert_eq!(
            state.unmodify_residue(3).unwrap(),
            Modification::Phosphorylation
        );
    }

    #[test]
    fn start_run_logs_initial_state_first() {
        let mut state = TauSimulationState::builder()
            .site(1u32, 0.2)
            .build()
            .unwrap();
        state
            .update_state(&neutral_environment(), &[0.0, 1.0, 2.0])
            .unwrap();
        let history = state.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[0].time, 0.0);
        assert_eq!(history.entries()[0].avg_prob, 0.2);
        assert_eq!(state.sites().series(&SiteKey::Residue(1)).unwrap().len(), 3);
        assert_eq!(state.age(), 3);
    }

    #[test]
    fn start_run_resets_history_but_not_age() {
        let mut state = TauSimulationState::builder()
            .site(1u32, 0.2)
            .build()
            .unwrap();
        let env = neutral_environment();
        state.update_state(&env, &[0.0, 1.0, 2.0]).unwrap();
        let p_after_first = state.sites().current(&SiteKey::Residue(1)).unwrap();
        state.update_state(&env, &[0.0, 1.0]).unwrap();
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.sites().series(&SiteKey::Residue(1)).unwrap()[0], p_after_first);
        assert_eq!(state.age(), 5);
    }

    #[test]
    fn continue_run_appends_and_updates_every_timepoint() {
        let mut state = TauSimulationState::builder()
            .site(1u32, 0.0)
            .build()
            .unwrap();
        let env = neutral_environment();
        let config = SimulationConfig::default();
        state.start_run(&env, &[0.0, 1.0], &config).unwrap();
        let before = state.sites().current(&SiteKey::Residue(1)).unwrap();
        state.continue_run(&env, &[2.0, 3.0], &config).unwrap();
        assert_eq!(state.history().len(), 4);
        assert_eq!(state.sites().series_len(), 4);
        assert!(state.sites().current(&SiteKey::Residue(1)).unwrap() > before);
    }

    #[test]
    fn continue_run_rejects_times_before_last_logged() {
        let mut state = TauSimulationState::builder()
            .site(1u32, 0.0)
            .build()
            .unwrap();
        let env = neutral_environment();
        let config = SimulationConfig::default();
        state.start_run(&env, &[0.0, 5.0], &config).unwrap();
        let err = state.continue_run(&env, &[4.0], &config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.age(), 2);
    }

    #[test]
    fn invalid_environment_mutates_nothing() {
        let mut state = TauSimulationState::builder()
            .site(1u32, 0.3)
            .build()
            .unwrap();
        let env = Environment {
            kinase_level: -1.0,
            ..Environment::default()
        };
        let err = state.update_state(&env, &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
        assert!(state.history().is_empty());
        assert_eq!(state.age(), 0);
    }

    #[test]
    fn truncation_and_motifs_feed_the_aggregation_state() {
        let mut state = TauSimulationState::builder()
            .isoform(Isoform::FourRepeat)
            .sequence(ProteinSequence::from_one_letter(REPEAT_DOMAIN).unwrap())
            .truncated(true)
            .build()
            .unwrap();
        // 2 motifs + truncation + 4R = 7 with no phosphorylated sites.
        state.update_state(&neutral_environment(), &[0.0]).unwrap();
        assert_eq!(state.aggregation_state(), AggregationState::Fibril);
        assert_eq!(
            state.history().last().unwrap().aggregation_state,
            AggregationState::Fibril
        );
    }
}
