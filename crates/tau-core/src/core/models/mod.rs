//! # Core Models Module
//!
//! Data structures describing a tau molecule and the conditions it evolves in.
//!
//! ## Key Components
//!
//! - [`amino_acid`] - The twenty standard residues with their side-chain chemistry
//! - [`formula`] - Condensed-formula parsing and average molecular weights
//! - [`ptm`] - Post-translational modifications and the residues that accept them
//! - [`residue`] - A residue instance carrying an optional modification
//! - [`sequence`] - Protein sequences, aggregation motifs and truncation
//! - [`isoform`] - 3R/4R isoform classes
//! - [`environment`] - Cellular conditions and their validation
//! - [`sites`] - Per-site phosphorylation probability series
//! - [`history`] - The per-timepoint run log
//!
//! ## Usage
//!
//! ```ignore
//! use tausim::core::models::{ptm::Modification, sequence::ProteinSequence};
//!
//! let mut sequence = ProteinSequence::from_one_letter("MAEPRQEFEVMEDHAGTYGLGDRK")?;
//! sequence.modify(17, Modification::Phosphorylation)?;
//! assert_eq!(sequence.phosphorylated_count(), 1);
//! ```

pub mod amino_acid;
pub mod environment;
pub mod formula;
pub mod history;
pub mod isoform;
pub mod ptm;
pub mod residue;
pub mod sequence;
pub mod sites;
