use super::amino_acid::AminoAcidType;
use super::formula::{self, BACKBONE_WEIGHT, FormulaError};
use super::ptm::{self, Modification, ModificationError};

/// A single residue in a protein sequence.
///
/// Each residue owns its R-group formula, so modifying one residue never
/// affects another residue of the same amino-acid type.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub position: usize, // 1-based position in the parent sequence
    amino_acid: AminoAcidType,
    r_group: String,
    modification: Option<Modification>,
    weight: f64,
}

impl Residue {
    pub fn new(position: usize, amino_acid: AminoAcidType) -> Self {
        let r_group = amino_acid.r_group().to_string();
        let weight = BACKBONE_WEIGHT + amino_acid.r_group_weight();
        Self {
            position,
            amino_acid,
            r_group,
            modification: None,
            weight,
        }
    }

    pub fn amino_acid(&self) -> AminoAcidType {
        self.amino_acid
    }

    pub fn one_letter(&self) -> char {
        self.amino_acid.one_letter()
    }

    pub fn r_group(&self) -> &str {
        &self.r_group
    }

    pub fn modification(&self) -> Option<Modification> {
        self.modification
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn is_phosphorylated(&self) -> bool {
        self.modification == Some(Modification::Phosphorylation)
    }

    /// Applies `modification` in place and recomputes the residue weight.
    ///
    /// # Errors
    ///
    /// Returns [`ResidueError::Modification`] if the residue type cannot carry
    /// the modification, and [`ResidueError::Formula`] if the modified formula
    /// cannot be weighed.
    pub fn add_modification(&mut self, modification: Modification) -> Result<(), ResidueError> {
        if ptm::is_inert(self.amino_acid) {
            return Err(ModificationError::InertResidue {
                residue: self.amino_acid.name(),
            }
            .into());
        }
        if !modification.permits(self.amino_acid) {
            return Err(ModificationError::Unsupported {
                residue: self.amino_acid.name(),
                modification,
            }
            .into());
        }

        let mut r_group = self.r_group.clone();
        r_group.pop();
        r_group.push_str(modification.suffix());

        let weight = Self::weigh(&r_group, Some(modification))?;
        self.r_group = r_group;
        self.modification = Some(modification);
        self.weight = weight;
        Ok(())
    }

    /// Removes the current modification, restoring the terminal hydrogen.
    pub fn remove_modification(&mut self) -> Result<Modification, ResidueError> {
        let modification = self.modification.ok_or(ModificationError::NoModification {
            residue: self.amino_acid.name(),
        })?;

        let r_group = self.r_group.replace(modification.suffix(), "H");
        let weight = Self::weigh(&r_group, None)?;
        self.r_group = r_group;
        self.modification = None;
        self.weight = weight;
        Ok(modification)
    }

    fn weigh(r_group: &str, modification: Option<Modification>) -> Result<f64, FormulaError> {
        match modification {
            Some(m) if m.has_opaque_suffix() => {
                let stripped = r_group.strip_suffix(m.suffix()).unwrap_or(r_group);
                Ok(BACKBONE_WEIGHT + m.adduct_weight() + formula::formula_weight(stripped)?)
            }
            _ => Ok(BACKBONE_WEIGHT + formula::formula_weight(r_group)?),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ResidueError {
    #[error(transparent)]
    Modification(#[from] ModificationError),
    #[error(transparent)]
    Formula(#[from] FormulaError),
}
