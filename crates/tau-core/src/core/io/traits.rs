use crate::core::models::history::History;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Defines the interface for reading and writing run histories.
///
/// Implementors handle format-specific parsing and serialization; the path
/// helpers wrap files in buffered readers and writers.
pub trait HistoryFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a history from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the entries are not in run order.
    fn read_from(reader: impl Read) -> Result<History, Self::Error>;

    /// Writes every entry of `history` to a writer, header first.
    fn write_to(history: &History, writer: impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<History, Self::Error> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    fn write_to_path<P: AsRef<Path>>(history: &History, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        Self::write_to(history, BufWriter::new(file))
    }
}
