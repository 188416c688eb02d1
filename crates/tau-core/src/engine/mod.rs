//! # Engine Module
//!
//! The stateful layer: a [`state::TauSimulationState`] evolving its site
//! probabilities under an environment and logging one history entry per
//! timepoint.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Sampling policy, enzyme response, seeds and ensemble sizing
//! - **State Tracking** ([`state`]) - The simulation aggregate and its builder
//! - **Evolution** ([`evolution`]) - The relaxation update, timepoint validation and the run loop
//! - **Progress Monitoring** ([`progress`]) - Optional callbacks for run and ensemble events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Update Rule
//!
//! Each run computes its drive once from the environment,
//! `k_p = temperature × kinase × oxidative` and `k_d = phosphatase × protease`,
//! then moves every site by `p + k_p(1 − p) − k_d·p`, clamped to [0, 1].

pub mod config;
pub mod error;
pub mod evolution;
pub mod progress;
pub mod state;
