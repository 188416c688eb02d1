use super::formula::chnos_weight;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Nonpolar,
    Polar,
    Acidic,
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcidType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // Alanine (ALA)
    Glycine,    // Glycine (GLY)
    Isoleucine, // Isoleucine (ILE)
    Leucine,    // Leucine (LEU)
    Proline,    // Proline (PRO)
    Valine,     // Valine (VAL)

    // --- Aromatic ---
    Phenylalanine, // Phenylalanine (PHE)
    Tryptophan,    // Tryptophan (TRP)
    Tyrosine,      // Tyrosine (TYR)

    // --- Polar, Uncharged ---
    Asparagine, // Asparagine (ASN)
    Cysteine,   // Cysteine (CYS)
    Glutamine,  // Glutamine (GLN)
    Serine,     // Serine (SER)
    Threonine,  // Threonine (THR)
    Methionine, // Methionine (MET)

    // --- Positively Charged (Basic) ---
    Arginine,  // Arginine (ARG)
    Lysine,    // Lysine (LYS)
    Histidine, // Histidine (HIS)

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // Aspartic Acid (ASP)
    GlutamicAcid, // Glutamic Acid (GLU)
}

impl AminoAcidType {
    pub const ALL: [AminoAcidType; 20] = [
        AminoAcidType::Alanine,
        AminoAcidType::Glycine,
        AminoAcidType::Isoleucine,
        AminoAcidType::Leucine,
        AminoAcidType::Proline,
        AminoAcidType::Valine,
        AminoAcidType::Phenylalanine,
        AminoAcidType::Tryptophan,
        AminoAcidType::Tyrosine,
        AminoAcidType::Asparagine,
        AminoAcidType::Cysteine,
        AminoAcidType::Glutamine,
        AminoAcidType::Serine,
        AminoAcidType::Threonine,
        AminoAcidType::Methionine,
        AminoAcidType::Arginine,
        AminoAcidType::Lysine,
        AminoAcidType::Histidine,
        AminoAcidType::AsparticAcid,
        AminoAcidType::GlutamicAcid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AminoAcidType::Alanine => "Alanine",
            AminoAcidType::Glycine => "Glycine",
            AminoAcidType::Isoleucine => "Isoleucine",
            AminoAcidType::Leucine => "Leucine",
            AminoAcidType::Proline => "Proline",
            AminoAcidType::Valine => "Valine",
            AminoAcidType::Phenylalanine => "Phenylalanine",
            AminoAcidType::Tryptophan => "Tryptophan",
            AminoAcidType::Tyrosine => "Tyrosine",
            AminoAcidType::Asparagine => "Asparagine",
            AminoAcidType::Cysteine => "Cysteine",
            AminoAcidType::Glutamine => "Glutamine",
            AminoAcidType::Serine => "Serine",
            AminoAcidType::Threonine => "Threonine",
            AminoAcidType::Methionine => "Methionine",
            AminoAcidType::Arginine => "Arginine",
            AminoAcidType::Lysine => "Lysine",
            AminoAcidType::Histidine => "Histidine",
            AminoAcidType::AsparticAcid => "Aspartic acid",
            AminoAcidType::GlutamicAcid => "Glutamic acid",
        }
    }

    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcidType::Alanine => "Ala",
            AminoAcidType::Glycine => "Gly",
            AminoAcidType::Isoleucine => "Ile",
            AminoAcidType::Leucine => "Leu",
            AminoAcidType::Proline => "Pro",
            AminoAcidType::Valine => "Val",
            AminoAcidType::Phenylalanine => "Phe",
            AminoAcidType::Tryptophan => "Trp",
            AminoAcidType::Tyrosine => "Tyr",
            AminoAcidType::Asparagine => "Asn",
            AminoAcidType::Cysteine => "Cys",
            AminoAcidType::Glutamine => "Gln",
            AminoAcidType::Serine => "Ser",
            AminoAcidType::Threonine => "Thr",
            AminoAcidType::Methionine => "Met",
            AminoAcidType::Arginine => "Arg",
            AminoAcidType::Lysine => "Lys",
            AminoAcidType::Histidine => "His",
            AminoAcidType::AsparticAcid => "Asp",
            AminoAcidType::GlutamicAcid => "Glu",
        }
    }

    pub fn one_letter(&self) -> char {
        match self {
            AminoAcidType::Alanine => 'A',
            AminoAcidType::Glycine => 'G',
            AminoAcidType::Isoleucine => 'I',
            AminoAcidType::Leucine => 'L',
            AminoAcidType::Proline => 'P',
            AminoAcidType::Valine => 'V',
            AminoAcidType::Phenylalanine => 'F',
            AminoAcidType::Tryptophan => 'W',
            AminoAcidType::Tyrosine => 'Y',
            AminoAcidType::Asparagine => 'N',
            AminoAcidType::Cysteine => 'C',
            AminoAcidType::Glutamine => 'Q',
            AminoAcidType::Serine => 'S',
            AminoAcidType::Threonine => 'T',
            AminoAcidType::Methionine => 'M',
            AminoAcidType::Arginine => 'R',
            AminoAcidType::Lysine => 'K',
            AminoAcidType::Histidine => 'H',
            AminoAcidType::AsparticAcid => 'D',
            AminoAcidType::GlutamicAcid => 'E',
        }
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            AminoAcidType::Alanine
            | AminoAcidType::Glycine
            | AminoAcidType::Isoleucine
            | AminoAcidType::Leucine
            | AminoAcidType::Proline
            | AminoAcidType::Valine
            | AminoAcidType::Phenylalanine
            | AminoAcidType::Tryptophan
            | AminoAcidType::Methionine => Polarity::Nonpolar,
            AminoAcidType::Tyrosine
            | AminoAcidType::Asparagine
            | AminoAcidType::Cysteine
            | AminoAcidType::Glutamine
            | AminoAcidType::Serine
            | AminoAcidType::Threonine => Polarity::Polar,
            AminoAcidType::Arginine | AminoAcidType::Lysine | AminoAcidType::Histidine => {
                Polarity::Basic
            }
            AminoAcidType::AsparticAcid | AminoAcidType::GlutamicAcid => Polarity::Acidic,
        }
    }

    /// Net side-chain charge at physiological pH.
    pub fn charge(&self) -> i8 {
        match self.polarity() {
            Polarity::Acidic => -1,
            Polarity::Basic if *self != AminoAcidType::Histidine => 1,
            _ => 0,
        }
    }

    /// Condensed R-group formula. Written without parentheses so the element
    /// counts can be read left to right.
    pub fn r_group(&self) -> &'static str {
        match self {
            AminoAcidType::Alanine => "CH3",
            AminoAcidType::Glycine => "H",
            AminoAcidType::Isoleucine => "CHCH3CH2CH3",
            AminoAcidType::Leucine => "CH2CHCH3CH3",
            AminoAcidType::Proline => "C3H6",
            AminoAcidType::Valine => "CHCH3CH3",
            AminoAcidType::Phenylalanine => "CH2C6H5",
            AminoAcidType::Tryptophan => "CH2C8H6N",
            AminoAcidType::Tyrosine => "CH2C6H4OH",
            AminoAcidType::Asparagine => "CH2CONH2",
            AminoAcidType::Cysteine => "CH2SH",
            AminoAcidType::Glutamine => "CH2CH2CONH2",
            AminoAcidType::Serine => "CH2OH",
            AminoAcidType::Threonine => "CHOHCH3",
            AminoAcidType::Methionine => "CH2CH2SCH3",
            AminoAcidType::Arginine => "CH2CH2CH2NHCNHNH2",
            AminoAcidType::Lysine => "CH2CH2CH2CH2NH2",
            AminoAcidType::Histidine => "CH2C3H3N2",
            AminoAcidType::AsparticAcid => "CH2COOH",
            AminoAcidType::GlutamicAcid => "CH2CH2COOH",
        }
    }

    /// Weight of the unmodified R-group, in Da.
    pub const fn r_group_weight(&self) -> f64 {
        match self {
            AminoAcidType::Alanine => chnos_weight(1, 3, 0, 0, 0),
            AminoAcidType::Glycine => chnos_weight(0, 1, 0, 0, 0),
            AminoAcidType::Isoleucine => chnos_weight(4, 9, 0, 0, 0),
            AminoAcidType::Leucine => chnos_weight(4, 9, 0, 0, 0),
            AminoAcidType::Proline => chnos_weight(3, 6, 0, 0, 0),
            AminoAcidType::Valine => chnos_weight(3, 7, 0, 0, 0),
            AminoAcidType::Phenylalanine => chnos_weight(7, 7, 0, 0, 0),
            AminoAcidType::Tryptophan => chnos_weight(9, 8, 1, 0, 0),
            AminoAcidType::Tyrosine => chnos_weight(7, 7, 0, 1, 0),
            AminoAcidType::Asparagine => chnos_weight(2, 4, 1, 1, 0),
            AminoAcidType::Cysteine => chnos_weight(1, 3, 0, 0, 1),
            AminoAcidType::Glutamine => chnos_weight(3, 6, 1, 1, 0),
            AminoAcidType::Serine => chnos_weight(1, 3, 0, 1, 0),
            AminoAcidType::Threonine => chnos_weight(2, 5, 0, 1, 0),
            AminoAcidType::Methionine => chnos_weight(3, 7, 0, 0, 1),
            AminoAcidType::Arginine => chnos_weight(4, 10, 3, 0, 0),
            AminoAcidType::Lysine => chnos_weight(4, 10, 1, 0, 0),
            AminoAcidType::Histidine => chnos_weight(4, 5, 2, 0, 0),
            AminoAcidType::AsparticAcid => chnos_weight(2, 3, 0, 2, 0),
            AminoAcidType::GlutamicAcid => chnos_weight(3, 5, 0, 2, 0),
        }
    }

    pub fn from_one_letter(code: char) -> Option<Self> {
        let upper = code.to_ascii_uppercase();
        Self::ALL.into_iter().find(|aa| aa.one_letter() == upper)
    }

    /// Matches the full name, the three-letter code or the one-letter code,
    /// ignoring case.
    pub fn is_identifier(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        identifier.eq_ignore_ascii_case(self.name())
            || identifier.eq_ignore_ascii_case(self.three_letter())
            || (identifier.len() == 1
                && identifier
                    .chars()
                    .next()
                    .is_some_and(|c| c.to_ascii_uppercase() == self.one_letter()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown amino acid identifier: '{0}'")]
pub struct ParseAminoAcidError(pub String);

impl FromStr for AminoAcidType {
    type Err = ParseAminoAcidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|aa| aa.is_identifier(s))
            .ok_or_else(|| ParseAminoAcidError(s.to_string()))
    }
}

impl fmt::Display for AminoAcidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.three_letter())
    }
}
