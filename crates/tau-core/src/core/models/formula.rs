use phf::{Map, phf_map};
use thiserror::Error;

/// Mass of the shared amino-acid backbone (NH2-CH-COOH) in Da.
pub const BACKBONE_WEIGHT: f64 = 74.06;

const CARBON: f64 = 12.01;
const HYDROGEN: f64 = 1.008;
const NITROGEN: f64 = 14.01;
const OXYGEN: f64 = 16.00;
const SULFUR: f64 = 32.06;
const PHOSPHORUS: f64 = 30.97;

static ATOMIC_WEIGHTS: Map<&'static str, f64> = phf_map! {
    "C" => CARBON,
    "H" => HYDROGEN,
    "N" => NITROGEN,
    "O" => OXYGEN,
    "S" => SULFUR,
    "P" => PHOSPHORUS,
};

/// Weight of a fragment given its C, H, N, O and S counts.
pub const fn chnos_weight(c: u32, h: u32, n: u32, o: u32, s: u32) -> f64 {
    CARBON * c as f64
        + HYDROGEN * h as f64
        + NITROGEN * n as f64
        + OXYGEN * o as f64
        + SULFUR * s as f64
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormulaError {
    #[error("Unknown element '{element}' in formula '{formula}'")]
    UnknownElement { element: String, formula: String },
    #[error("Element count overflow in formula '{0}'")]
    CountOverflow(String),
}

/// Splits a condensed formula into `(element, count)` pairs.
///
/// Characters that are not ASCII alphanumerics (bond dashes, brackets) are
/// dropped before tokenizing, so `"CH2O-PO3"` reads as C, H2, O, P, O3.
pub fn element_counts(formula: &str) -> Result<Vec<(String, u32)>, FormulaError> {
    let cleaned: Vec<char> = formula
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    let mut counts = Vec::new();
    let mut i = 0;
    while i < cleaned.len() {
        let c = cleaned[i];
        if !c.is_ascii_uppercase() {
            // Orphan lowercase letters and leading digits carry no element.
            i += 1;
            continue;
        }
        let mut element = c.to_string();
        i += 1;
        while i < cleaned.len() && cleaned[i].is_ascii_lowercase() {
            element.push(cleaned[i]);
            i += 1;
        }
        let digits_start = i;
        while i < cleaned.len() && cleaned[i].is_ascii_digit() {
            i += 1;
        }
        let count = if digits_start == i {
            1
        } else {
            cleaned[digits_start..i]
                .iter()
                .collect::<String>()
                .parse::<u32>()
                .map_err(|_| FormulaError::CountOverflow(formula.to_string()))?
        };
        counts.push((element, count));
    }
    Ok(counts)
}

/// Weight of a condensed formula, summed over known elements.
pub fn formula_weight(formula: &str) -> Result<f64, FormulaError> {
    element_counts(formula)?
        .into_iter()
        .try_fold(0.0, |acc, (element, count)| {
            let weight = ATOMIC_WEIGHTS
                .get(element.as_str())
                .ok_or_else(|| FormulaError::UnknownElement {
                    element: element.clone(),
                    formula: formula.to_string(),
                })?;
            Ok(acc + weight * f64::from(count))
        })
}
