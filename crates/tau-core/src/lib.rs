//! # tausim Core Library
//!
//! A model of tau protein phosphorylation and aggregation: site-level
//! phosphorylation probabilities relax under a cellular environment, and a
//! weighted score classifies the molecule as monomer, oligomer or fibril at
//! every timepoint.
//!
//! ## Architectural Philosophy
//!
//! The library keeps three layers apart:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ProteinSequence`,
//!   `Environment`, `SiteStore`), the effect functions, the aggregation
//!   classifier and history I/O.
//!
//! - **[`engine`]: The Logic Core.** The `TauSimulationState` aggregate, the
//!   relaxation loop, run configuration and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Complete experiments built from the
//!   engine: a single simulation or a parallel ensemble of seeded replicates.

pub mod core;
pub mod engine;
pub mod workflows;
