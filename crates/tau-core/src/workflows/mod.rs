//! # Workflows Module
//!
//! Top-level entry points that drive the [`crate::engine`] through complete
//! experiments.
//!
//! - **Simulation** ([`simulate`]) - One state evolved through a series of
//!   timepoints, summarized by its final and peak aggregation states.
//! - **Ensemble** ([`ensemble`]) - Independent seeded replicates run in
//!   parallel, summarized by the distribution of final states.
//!
//! Workflows never mutate the caller's state; they clone or build their own
//! and report progress through a [`crate::engine::progress::ProgressReporter`].

pub mod ensemble;
pub mod simulate;
