use super::environment::ParameterError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Probability above which a site counts as phosphorylated.
pub const PHOSPHORYLATION_THRESHOLD: f64 = 0.5;

/// Identifier of a tracked phosphorylation site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteKey {
    Residue(u32),  // residue index, e.g. 231
    Named(String), // named epitope, e.g. "S202_T205"
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteKey::Residue(index) => write!(f, "{index}"),
            SiteKey::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for SiteKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<u32>()
            .map(SiteKey::Residue)
            .unwrap_or_else(|_| SiteKey::Named(s.to_string())))
    }
}

impl From<u32> for SiteKey {
    fn from(index: u32) -> Self {
        SiteKey::Residue(index)
    }
}

impl From<&str> for SiteKey {
    fn from(name: &str) -> Self {
        SiteKey::Named(name.to_string())
    }
}

/// Per-site phosphorylation probability series, kept in insertion order.
///
/// The last value of each series is the site's current probability. Every
/// series has the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteStore {
    keys: Vec<SiteKey>,
    series: Vec<Vec<f64>>,
    index: HashMap<SiteKey, usize>,
}

impl SiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a site with its initial probability.
    pub fn insert(&mut self, key: SiteKey, probability: f64) -> Result<(), ParameterError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ParameterError::new(
                "sites",
                format!("initial probability {probability} for site {key} is outside [0, 1]"),
            ));
        }
        if self.index.contains_key(&key) {
            return Err(ParameterError::new(
                "sites",
                format!("site {key} is defined more than once"),
            ));
        }
        let depth = self.series_len().max(1);
        self.index.insert(key.clone(), self.keys.len());
        self.keys.push(key);
        self.series.push(vec![probability; depth]);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SiteKey] {
        &self.keys
    }

    /// Length shared by every series (0 when there are no sites).
    pub fn series_len(&self) -> usize {
        self.series.first().map_or(0, Vec::len)
    }

    pub fn series(&self, key: &SiteKey) -> Option<&[f64]> {
        self.index.get(key).map(|&i| self.series[i].as_slice())
    }

    pub fn current(&self, key: &SiteKey) -> Option<f64> {
        self.series(key).and_then(|s| s.last().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SiteKey, &[f64])> {
        self.keys
            .iter()
            .zip(self.series.iter().map(Vec::as_slice))
    }

    pub fn current_probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().filter_map(|s| s.last().copied())
    }

    pub fn phosphorylated_count(&self) -> usize {
        self.current_probabilities()
            .filter(|&p| p > PHOSPHORYLATION_THRESHOLD)
            .count()
    }

    /// Mean current probability; 0.0 when no sites are tracked.
    pub fn mean_probability(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.current_probabilities().sum::<f64>() / self.len() as f64
    }

    /// Drops all history, keeping only the current probability of each site.
    pub(crate) fn reset_series(&mut self) {
        for s in &mut self.series {
            if let Some(&current) = s.last() {
                s.clear();
                s.push(current);
            }
        }
    }

    /// Appends `update(current)` to every series.
    pub(crate) fn advance<F>(&mut self, update: F)
    where
        F: Fn(f64) -> f64,
    {
        for s in &mut self.series {
            if let Some(&current) = s.last() {
                s.push(update(current));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(probabilities: &[f64]) -> SiteStore {
        let mut store = SiteStore::new();
        for (i, &p) in probabilities.iter().enumerate() {
            store.insert(SiteKey::Residue(i as u32 + 1), p).unwrap();
        }
        store
    }

    #[test]
    fn site_key_parses_numbers_as_residues_and_text_as_names() {
        assert_eq!("231".parse::<SiteKey>().unwrap(), SiteKey::Residue(231));
        assert_eq!(
            "S202_T205".parse::<SiteKey>().unwrap(),
            SiteKey::Named("S202_T205".to_string())
        );
        assert_eq!(SiteKey::from(396u32).to_string(), "396");
        assert_eq!(SiteKey::from("T231").to_string(), "T231");
    }

    #[test]
    fn insert_preserves_order_and_rejects_duplicates() {
        let mut store = SiteStore::new();
        store.insert("S202_T205".into(), 0.1).unwrap();
        store.insert("T231".into(), 0.2).unwrap();
        assert_eq!(
            store.keys(),
            &[SiteKey::from("S202_T205"), SiteKey::from("T231")]
        );
        let err = store.insert("T231".into(), 0.3).unwrap_err();
        assert_eq!(err.parameter, "sites");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_rejects_probabilities_outside_unit_interval() {
        let mut store = SiteStore::new();
        assert!(store.insert(1u32.into(), 1.2).is_err());
        assert!(store.insert(1u32.into(), -0.1).is_err());
        assert!(store.insert(1u32.into(), f64::NAN).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn counts_only_sites_strictly_above_threshold() {
        let store = store_with(&[0.5, 0.51, 0.9, 0.1]);
        assert_eq!(store.phosphorylated_count(), 2);
    }

    #[test]
    fn mean_probability_of_empty_store_is_zero() {
        let store = SiteStore::new();
        assert_eq!(store.mean_probability(), 0.0);
        assert_eq!(store.phosphorylated_count(), 0);
        assert_eq!(store.series_len(), 0);
    }

    #[test]
    fn advance_appends_to_every_series() {
        let mut store = store_with(&[0.2, 0.4]);
        store.advance(|p| p * 2.0);
        assert_eq!(store.series(&1u32.into()), Some(&[0.2, 0.4][..]));
        assert_eq!(store.series(&2u32.into()), Some(&[0.4, 0.8][..]));
        assert_eq!(store.current(&2u32.into()), Some(0.8));
        assert_eq!(store.series_len(), 2);
    }

    #[test]
    fn reset_series_keeps_current_value() {
        let mut store = store_with(&[0.2]);
        store.advance(|p| p + 0.1);
        store.advance(|p| p + 0.1);
        store.reset_series();
        let series = store.series(&1u32.into()).unwrap();
        assert_eq!(series.len(), 1);
        assert!((series[0] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn late_insert_matches_existing_series_length() {
        let mut store = store_with(&[0.2]);
        store.advance(|p| p);
        store.insert(7u32.into(), 0.6).unwrap();
        assert_eq!(store.series(&7u32.into()), Some(&[0.6, 0.6][..]));
    }

    #[test]
    fn unknown_site_has_no_series() {
        let store = store_with(&[0.2]);
        assert!(store.series(&"S396_S404".into()).is_none());
        assert!(store.current(&99u32.into()).is_none());
    }
}
