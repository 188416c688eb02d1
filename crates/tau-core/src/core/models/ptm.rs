use super::amino_acid::AminoAcidType;
use phf::{Map, Set, phf_map, phf_set};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modification {
    Phosphorylation,
    Acetylation,
    Methylation,
    Ubiquitination,
    OGlcNAcylation,
}

static MODIFICATION_ALIASES: Map<&'static str, Modification> = phf_map! {
    "Phosphorylation" => Modification::Phosphorylation,
    "Phospho" => Modification::Phosphorylation,
    "Phospo" => Modification::Phosphorylation,
    "p" => Modification::Phosphorylation,
    "P" => Modification::Phosphorylation,
    "Acetylation" => Modification::Acetylation,
    "Acetyl" => Modification::Acetylation,
    "a" => Modification::Acetylation,
    "A" => Modification::Acetylation,
    "Methylation" => Modification::Methylation,
    "Methyl" => Modification::Methylation,
    "m" => Modification::Methylation,
    "M" => Modification::Methylation,
    "Ubiquitination" => Modification::Ubiquitination,
    "Ubi" => Modification::Ubiquitination,
    "u" => Modification::Ubiquitination,
    "U" => Modification::Ubiquitination,
    "O-GlcNAcylation" => Modification::OGlcNAcylation,
    "O-Glc" => Modification::OGlcNAcylation,
    "GlcNAc" => Modification::OGlcNAcylation,
};

// Residues whose side chains never carry a modification.
static INERT_RESIDUES: Set<char> = phf_set! { 'A', 'V', 'L', 'I', 'F', 'W' };

impl Modification {
    pub fn tag(&self) -> &'static str {
        match self {
            Modification::Phosphorylation => "Phospho",
            Modification::Acetylation => "Acetyl",
            Modification::Methylation => "Methyl",
            Modification::Ubiquitination => "Ubi",
            Modification::OGlcNAcylation => "GlcNAc",
        }
    }

    /// Group appended to the R-group formula when the modification is applied.
    pub fn suffix(&self) -> &'static str {
        match self {
            Modification::Phosphorylation => "-PO3",
            Modification::Acetylation => "-COCH3",
            Modification::Methylation => "-CH3",
            Modification::Ubiquitination => "-UBI",
            Modification::OGlcNAcylation => "-GlcNAc",
        }
    }

    /// Extra mass for groups whose atoms are not spelled out in the suffix.
    pub fn adduct_weight(&self) -> f64 {
        match self {
            Modification::Ubiquitination => 8565.0,
            Modification::OGlcNAcylation => 203.0,
            _ => 0.0,
        }
    }

    /// Whether the suffix is a placeholder that must be stripped before the
    /// formula is weighed.
    pub fn has_opaque_suffix(&self) -> bool {
        matches!(
            self,
            Modification::Ubiquitination | Modification::OGlcNAcylation
        )
    }

    pub fn permits(&self, residue: AminoAcidType) -> bool {
        use AminoAcidType::*;
        match self {
            Modification::Phosphorylation => matches!(
                residue,
                Serine
                    | Threonine
                    | Tyrosine
                    | Histidine
                    | AsparticAcid
                    | GlutamicAcid
                    | Arginine
                    | Lysine
                    | Cysteine
            ),
            Modification::Acetylation => matches!(residue, Lysine | Methionine),
            Modification::Methylation => matches!(residue, Lysine | Arginine | Histidine),
            Modification::Ubiquitination => matches!(residue, Lysine | Methionine),
            Modification::OGlcNAcylation => matches!(residue, Serine | Threonine),
        }
    }
}

pub fn is_inert(residue: AminoAcidType) -> bool {
    INERT_RESIDUES.contains(&residue.one_letter())
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModificationError {
    #[error("Unknown modification: '{0}'")]
    Unknown(String),
    #[error("{residue} does not undergo post-translational modification")]
    InertResidue { residue: &'static str },
    #[error("{residue} does not undergo {modification}")]
    Unsupported {
        residue: &'static str,
        modification: Modification,
    },
    #[error("No modification to remove from {residue}")]
    NoModification { residue: &'static str },
}

impl FromStr for Modification {
    type Err = ModificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MODIFICATION_ALIASES
            .get(s.trim())
            .copied()
            .ok_or_else(|| ModificationError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Modification::Phosphorylation => "Phosphorylation",
                Modification::Acetylation => "Acetylation",
                Modification::Methylation => "Methylation",
                Modification::Ubiquitination => "Ubiquitination",
                Modification::OGlcNAcylation => "O-GlcNAcylation",
            }
        )
    }
}
