use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tau isoform class by number of microtubule-binding repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Isoform {
    #[serde(rename = "3R")]
    ThreeRepeat,
    #[default]
    #[serde(rename = "4R")]
    FourRepeat,
}

impl Isoform {
    /// Isoform implied by the splicing descriptor of exon 10.
    pub fn from_exon(exon: &str) -> Option<Self> {
        match exon.trim() {
            "R2 at 10" => Some(Isoform::FourRepeat),
            "R1 at 10" => Some(Isoform::ThreeRepeat),
            _ => None,
        }
    }

    pub fn is_four_repeat(&self) -> bool {
        matches!(self, Isoform::FourRepeat)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid isoform '{0}'. Expected '3R' or '4R'")]
pub struct ParseIsoformError(pub String);

impl FromStr for Isoform {
    type Err = ParseIsoformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "3R" => Ok(Isoform::ThreeRepeat),
            "4R" => Ok(Isoform::FourRepeat),
            _ => Err(ParseIsoformError(s.to_string())),
        }
    }
}

impl fmt::Display for Isoform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Isoform::ThreeRepeat => "3R",
                Isoform::FourRepeat => "4R",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("3r".parse(), Ok(Isoform::ThreeRepeat));
        assert_eq!(" 4R ".parse(), Ok(Isoform::FourRepeat));
        assert!("2N4R".parse::<Isoform>().is_err());
    }

    #[test]
    fn exon_descriptor_selects_isoform() {
        assert_eq!(Isoform::from_exon("R2 at 10"), Some(Isoform::FourRepeat));
        assert_eq!(Isoform::from_exon("R1 at 10"), Some(Isoform::ThreeRepeat));
        assert_eq!(Isoform::from_exon("R3 at 11"), None);
    }

    #[test]
    fn default_is_four_repeat() {
        assert_eq!(Isoform::default(), Isoform::FourRepeat);
        assert_eq!(Isoform::default().to_string(), "4R");
    }
}
