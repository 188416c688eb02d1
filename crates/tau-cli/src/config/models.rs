use tausim::core::models::environment::Environment;
use tausim::core::models::isoform::Isoform;
use tausim::core::models::sequence::ProteinSequence;
use tausim::core::models::sites::SiteKey;
use tausim::engine::config::SimulationConfig;
use tausim::engine::error::EngineError;
use tausim::engine::state::{SiteInitialization, TauSimulationState};

#[derive(Debug, Clone, PartialEq)]
pub enum SiteLayout {
    /// Residue sites `1..=count`.
    Residues(u32),
    Named(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProteinSetup {
    pub isoform: Isoform,
    pub sequence: Option<ProteinSequence>,
    pub truncation_site: Option<String>,
    pub truncated: bool,
    pub sites: SiteLayout,
    pub initialization: SiteInitialization,
}

impl ProteinSetup {
    /// Builds a fresh state; `seed` fixes randomly drawn initial probabilities.
    pub fn build_state(&self, seed: Option<u64>) -> Result<TauSimulationState, EngineError> {
        let mut builder = TauSimulationState::builder()
            .isoform(self.isoform)
            .initialization(self.initialization)
            .truncated(self.truncated);
        builder = match &self.sites {
            SiteLayout::Residues(count) => builder.residue_sites(*count),
            SiteLayout::Named(names) => {
                builder.sites(names.iter().filter_map(|n| n.parse::<SiteKey>().ok()))
            }
        };
        if let Some(sequence) = &self.sequence {
            builder = builder.sequence(sequence.clone());
        }
        if let Some(site) = &self.truncation_site {
            builder = builder.truncate_at(site.clone());
        }
        if let Some(seed) = seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

/// Fully resolved settings for one command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub environment: Environment,
    pub protein: ProteinSetup,
    pub timepoints: Vec<f64>,
    pub simulation: SimulationConfig,
    pub replicates: usize,
}
