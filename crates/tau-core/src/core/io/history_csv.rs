use crate::core::io::traits::HistoryFile;
use crate::core::models::history::{History, HistoryEntry};
use crate::core::models::sites::SiteStore;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

pub const HISTORY_HEADER: [&str; 4] = ["time", "phospho_count", "aggregation_state", "avg_prob"];

#[derive(Debug, Error)]
pub enum HistoryIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

/// Comma-separated history with a `time,phospho_count,aggregation_state,avg_prob` header.
pub struct HistoryCsv;

impl HistoryFile for HistoryCsv {
    type Error = HistoryIoError;

    fn read_from(reader: impl Read) -> Result<History, Self::Error> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut entries: Vec<HistoryEntry> = Vec::new();

        for (row, result) in rdr.deserialize().enumerate() {
            let entry: HistoryEntry = result?;
            if !entry.time.is_finite() {
                return Err(HistoryIoError::Inconsistency(format!(
                    "row {}: time {} is not finite",
                    row + 1,
                    entry.time
                )));
            }
            if !(0.0..=1.0).contains(&entry.avg_prob) {
                return Err(HistoryIoError::Inconsistency(format!(
                    "row {}: avg_prob {} is outside [0, 1]",
                    row + 1,
                    entry.avg_prob
                )));
            }
            if let Some(previous) = entries.last() {
                if entry.time < previous.time {
                    return Err(HistoryIoError::Inconsistency(format!(
                        "row {}: time {} precedes {}",
                        row + 1,
                        entry.time,
                        previous.time
                    )));
                }
            }
            entries.push(entry);
        }

        Ok(History::from(entries))
    }

    fn write_to(history: &History, writer: impl Write) -> Result<(), Self::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(HISTORY_HEADER)?;
        for entry in history {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Writes one row per logged timepoint with one column per site.
///
/// The site series must cover exactly the timepoints in `history`.
pub fn write_site_series(
    history: &History,
    sites: &SiteStore,
    writer: impl Write,
) -> Result<(), HistoryIoError> {
    if !sites.is_empty() && sites.series_len() != history.len() {
        return Err(HistoryIoError::Inconsistency(format!(
            "site series hold {} values but the history has {} timepoints",
            sites.series_len(),
            history.len()
        )));
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let header: Vec<String> = std::iter::once("time".to_string())
        .chain(sites.keys().iter().map(ToString::to_string))
        .collect();
    wtr.write_record(&header)?;

    for (i, time) in history.times().enumerate() {
        let row: Vec<String> = std::iter::once(time.to_string())
            .chain(sites.iter().map(|(_, series)| series[i].to_string()))
            .collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_site_series_to_path<P: AsRef<Path>>(
    history: &History,
    sites: &SiteStore,
    path: P,
) -> Result<(), HistoryIoError> {
    let file = File::create(path)?;
    write_site_series(history, sites, BufWriter::new(file))
}
