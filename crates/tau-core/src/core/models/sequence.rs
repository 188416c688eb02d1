use super::amino_acid::AminoAcidType;
use super::ptm::Modification;
use super::residue::{Residue, ResidueError};
use thiserror::Error;

/// Amyloid-forming hexapeptides in the microtubule-binding repeats.
pub const AGGREGATION_MOTIFS: [&str; 2] = ["VQIINK", "VQIVYK"];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Unknown one-letter code '{code}' at position {position}")]
    UnknownResidue { code: char, position: usize },
    #[error("Position {position} is outside the sequence (length {length})")]
    PositionOutOfRange { position: usize, length: usize },
    #[error("Invalid truncation site '{0}'. Expected a one-letter code followed by a position (e.g., 'D421')")]
    InvalidSite(String),
    #[error("Residue at position {position} is {found}, not {expected}")]
    ResidueMismatch {
        position: usize,
        expected: char,
        found: char,
    },
    #[error("Residue {position}: {source}")]
    Residue {
        position: usize,
        #[source]
        source: ResidueError,
    },
}

/// A parsed truncation site such as `D421`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationSite {
    pub residue: char,
    pub position: usize,
}

impl TruncationSite {
    pub fn parse(site: &str) -> Result<Self, SequenceError> {
        let site = site.trim();
        let mut chars = site.chars();
        let residue = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| SequenceError::InvalidSite(site.to_string()))?
            .to_ascii_uppercase();
        let position = chars
            .as_str()
            .parse::<usize>()
            .ok()
            .filter(|&p| p > 0)
            .ok_or_else(|| SequenceError::InvalidSite(site.to_string()))?;
        Ok(Self { residue, position })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProteinSequence {
    residues: Vec<Residue>,
}

impl ProteinSequence {
    pub fn from_one_letter(sequence: &str) -> Result<Self, SequenceError> {
        let residues = sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(i, code)| {
                AminoAcidType::from_one_letter(code)
                    .map(|aa| Residue::new(i + 1, aa))
                    .ok_or(SequenceError::UnknownResidue {
                        code,
                        position: i + 1,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { residues })
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Residue at a 1-based position.
    pub fn residue(&self, position: usize) -> Option<&Residue> {
        position
            .checked_sub(1)
            .and_then(|idx| self.residues.get(idx))
    }

    pub fn to_one_letter_string(&self) -> String {
        self.residues.iter().map(Residue::one_letter).collect()
    }

    /// Non-overlapping occurrences of the aggregation motifs.
    pub fn motif_count(&self) -> usize {
        let sequence = self.to_one_letter_string();
        AGGREGATION_MOTIFS
            .iter()
            .map(|motif| sequence.matches(motif).count())
            .sum()
    }

    pub fn phosphorylated_count(&self) -> usize {
        self.residues.iter().filter(|r| r.is_phosphorylated()).count()
    }

    /// Residues that are phosphorylated or could be (unmodified Ser, Thr, Tyr).
    pub fn phosphorylatable_count(&self) -> usize {
        self.residues
            .iter()
            .filter(|r| {
                r.is_phosphorylated()
                    || (r.modification().is_none()
                        && matches!(
                            r.amino_acid(),
                            AminoAcidType::Serine
                                | AminoAcidType::Threonine
                                | AminoAcidType::Tyrosine
                        ))
            })
            .count()
    }

    pub fn molecular_weight(&self) -> f64 {
        self.residues.iter().map(Residue::weight).sum()
    }

    pub fn modify(
        &mut self,
        position: usize,
        modification: Modification,
    ) -> Result<(), SequenceError> {
        self.residue_mut(position)?
            .add_modification(modification)
            .map_err(|source| SequenceError::Residue { position, source })
    }

    pub fn unmodify(&mut self, position: usize) -> Result<Modification, SequenceError> {
        self.residue_mut(position)?
            .remove_modification()
            .map_err(|source| SequenceError::Residue { position, source })
    }

    /// Cuts the chain after `site`, keeping residues `1..=site.position`.
    ///
    /// Returns the residue at the cleavage position.
    pub fn truncate_at(&mut self, site: TruncationSite) -> Result<Residue, SequenceError> {
        let residue = self
            .residue(site.position)
            .ok_or(SequenceError::PositionOutOfRange {
                position: site.position,
                length: self.len(),
            })?;
        if residue.one_letter() != site.residue {
            return Err(SequenceError::ResidueMismatch {
                position: site.position,
                expected: site.residue,
                found: residue.one_letter(),
            });
        }
        let cleaved = residue.clone();
        self.residues.truncate(site.position);
        Ok(cleaved)
    }

    fn residue_mut(&mut self, position: usize) -> Result<&mut Residue, SequenceError> {
        let length = self.residues.len();
        position
            .checked_sub(1)
            .and_then(|idx| self.residues.get_mut(idx))
            .ok_or(SequenceError::PositionOutOfRange { position, length })
    }
}
