//! Provides input/output functionality for run histories.
//!
//! The [`traits::HistoryFile`] trait gives every format the same reader and
//! writer API, including path-based helpers. [`history_csv`] implements the
//! comma-separated export used by plotting tools and writes the per-site
//! probability table.

pub mod history_csv;
pub mod traits;
