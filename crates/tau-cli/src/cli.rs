use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tau Modeling Contributors",
    version,
    about = "tausim CLI - Simulate site-level tau phosphorylation and aggregation under environmental stress.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evolve a single tau molecule and report its aggregation trajectory.
    Run(RunArgs),
    /// Run independent seeded replicates in parallel and summarize their final states.
    Ensemble(EnsembleArgs),
}

/// Settings shared by every simulation command.
#[derive(Args, Debug, Clone, Default)]
pub struct SimulationArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Environment Overrides ---
    /// Override the temperature in °C.
    #[arg(short = 't', long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Override the relative kinase activity.
    #[arg(long, value_name = "FLOAT")]
    pub kinase_level: Option<f64>,

    /// Override the relative phosphatase activity.
    #[arg(long, value_name = "FLOAT")]
    pub phosphatase_level: Option<f64>,

    /// Override the relative protease activity.
    #[arg(long, value_name = "FLOAT")]
    pub protease_level: Option<f64>,

    /// Override the oxidative stress level.
    #[arg(long, value_name = "FLOAT")]
    pub oxidative_stress: Option<f64>,

    // --- Protein Overrides ---
    /// Override the isoform ('3R' or '4R').
    #[arg(long, value_name = "ISOFORM")]
    pub isoform: Option<String>,

    /// Read the one-letter protein sequence from a file.
    #[arg(long, value_name = "PATH")]
    pub sequence_file: Option<PathBuf>,

    /// Truncate the sequence at a site such as 'D421'.
    #[arg(long, value_name = "SITE")]
    pub truncate: Option<String>,

    /// Override the number of tracked residue sites.
    #[arg(long, value_name = "INT")]
    pub site_count: Option<u32>,

    /// Start every site at this probability instead of a random one.
    #[arg(long, value_name = "FLOAT")]
    pub initial_probability: Option<f64>,

    // --- Simulation Overrides ---
    #[command(flatten)]
    pub time: TimeArgs,

    /// Override the sampling policy ('none' or 'bernoulli').
    #[arg(long, value_name = "POLICY")]
    pub sampling: Option<String>,

    /// Override the enzyme response ('linear' or 'healthy-range').
    #[arg(long, value_name = "RESPONSE")]
    pub enzyme_response: Option<String>,

    /// Seed for initial probabilities and Bernoulli draws.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S environment.temperature=39
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive ways of giving the timepoints.
#[derive(Args, Debug, Clone, Default)]
#[group(required = false, multiple = false)]
pub struct TimeArgs {
    /// Use timepoints 0, 1, ..., N-1.
    #[arg(short = 'n', long, value_name = "N")]
    pub timepoints: Option<usize>,

    /// Use an inclusive range 'START:END:STEP' (e.g., '0:10:0.5').
    #[arg(long, value_name = "START:END:STEP", allow_hyphen_values = true)]
    pub time_range: Option<String>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Write the per-timepoint history as CSV.
    #[arg(long, value_name = "PATH")]
    pub history_out: Option<PathBuf>,

    /// Write the per-site probability series as CSV.
    #[arg(long, value_name = "PATH")]
    pub sites_out: Option<PathBuf>,
}

/// Arguments for the `ensemble` subcommand.
#[derive(Args, Debug, Clone)]
pub struct EnsembleArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Override the number of replicates.
    #[arg(short, long, value_name = "INT")]
    pub replicates: Option<usize>,

    /// Write one CSV row per replicate.
    #[arg(long, value_name = "PATH")]
    pub summary_out: Option<PathBuf>,
}
