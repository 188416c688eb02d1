//! # Core Module
//!
//! Stateless building blocks of the tau model: molecular data structures,
//! the environmental effect functions and the aggregation classifier.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Residues, sequences, isoforms, environments and site stores
//! - **Environmental Effects** ([`effects`]) - Multipliers derived from temperature, enzymes and stress
//! - **Aggregation** ([`aggregation`]) - Weighted scoring into monomer, oligomer or fibril
//! - **File I/O** ([`io`]) - History and site-series export
//!
//! Nothing in this module holds run state; the [`crate::engine`] layer owns
//! the evolving simulation.

pub mod aggregation;
pub mod effects;
pub mod io;
pub mod models;
