use crate::core::aggregation::AggregationState;
use serde::{Deserialize, Serialize};

/// One logged timepoint of a run.
///
/// Field order is the column order of the CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub time: f64,
    pub phospho_count: usize,
    pub aggregation_state: AggregationState,
    pub avg_prob: f64,
}

/// Append-only log of timepoints, in run order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last().map(|e| e.time)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.time)
    }

    /// Highest aggregation state reached during the run.
    pub fn peak_state(&self) -> Option<AggregationState> {
        self.entries.iter().map(|e| e.aggregation_state).max()
    }

    /// Time of the first entry at or above `state`.
    pub fn first_time_at(&self, state: AggregationState) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.aggregation_state >= state)
            .map(|e| e.time)
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(time: f64, state: AggregationState) -> HistoryEntry {
        HistoryEntry {
            time,
            phospho_count: 0,
            aggregation_state: state,
            avg_prob: 0.0,
        }
    }

    #[test]
    fn empty_history_has_no_summary() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.last_time(), None);
        assert_eq!(history.peak_state(), None);
    }

    #[test]
    fn peak_state_and_first_time_at_scan_entries() {
        let history = History::from(vec![
            entry(0.0, AggregationState::Monomer),
            entry(1.0, AggregationState::Oligomer),
            entry(2.0, AggregationState::Fibril),
            entry(3.0, AggregationState::Oligomer),
        ]);
        assert_eq!(history.peak_state(), Some(AggregationState::Fibril));
        assert_eq!(history.first_time_at(AggregationState::Oligomer), Some(1.0));
        assert_eq!(history.first_time_at(AggregationState::Fibril), Some(2.0));
        assert_eq!(history.last_time(), Some(3.0));
        assert_eq!(history.times().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn first_time_at_returns_none_when_never_reached() {
        let history = History::from(vec![entry(0.0, AggregationState::Monomer)]);
        assert_eq!(history.first_time_at(AggregationState::Fibril), None);
    }
}
