//! Streaming CSV readers with iterator interfaces
//!
//! Provides streaming iterators over the two input feeds: the transaction
//! source and the dispute action feed. Delegates CSV format concerns to the
//! csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants carrying
//!   the input line number; iteration continues past them
//!
//! # Memory Efficiency
//!
//! Both readers process records one at a time and never load the whole file,
//! so memory usage is O(1) per record regardless of file size.

use crate::io::csv_format::{
    convert_action_record, convert_transaction_record, CsvActionRecord, CsvTransactionRecord,
    DisputeAction,
};
use crate::types::error::DisputeError;
use crate::types::transaction::TransactionRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

fn open_csv(path: &Path) -> Result<csv::Reader<File>, DisputeError> {
    if !path.exists() {
        return Err(DisputeError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let file = File::open(path)?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

/// Streaming reader over the transaction source CSV
///
/// Yields `Result<TransactionRecord, DisputeError>` per row; malformed rows
/// come out as `Parse` errors with their line number and do not stop
/// iteration.
#[derive(Debug)]
pub struct TransactionReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl TransactionReader {
    /// Open the transaction source at `path`
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, or `Io` if the
    /// file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, DisputeError> {
        Ok(Self {
            reader: open_csv(path)?,
            line_num: 0,
        })
    }
}

impl Iterator for TransactionReader {
    type Item = Result<TransactionRecord, DisputeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvTransactionRecord>();

        match deserializer.next()? {
            Ok(csv_record) => {
                self.line_num += 1;
                // Line 1 is the header row
                let line = self.line_num + 1;
                Some(
                    convert_transaction_record(csv_record)
                        .map_err(|e| DisputeError::parse(Some(line), e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(DisputeError::parse(
                    Some(self.line_num + 1),
                    e.to_string(),
                )))
            }
        }
    }
}

/// Streaming reader over the dispute action feed CSV
///
/// Same contract as [`TransactionReader`], yielding [`DisputeAction`]s.
#[derive(Debug)]
pub struct ActionReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl ActionReader {
    /// Open the action feed at `path`
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, or `Io` if the
    /// file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, DisputeError> {
        Ok(Self {
            reader: open_csv(path)?,
            line_num: 0,
        })
    }
}

impl Iterator for ActionReader {
    type Item = Result<DisputeAction, DisputeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvActionRecord>();

        match deserializer.next()? {
            Ok(csv_record) => {
                self.line_num += 1;
                let line = self.line_num + 1;
                Some(
                    convert_action_record(csv_record)
                        .map_err(|e| DisputeError::parse(Some(line), e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(DisputeError::parse(
                    Some(self.line_num + 1),
                    e.to_string(),
                )))
            }
        }
    }
}
