//! CSV input and report output

pub mod csv_format;
pub mod reader;

pub use csv_format::{
    convert_action_record, convert_transaction_record, write_disputes_csv,
    write_transactions_csv, CsvActionRecord, CsvTransactionRecord, DisputeAction,
};
pub use reader::{ActionReader, TransactionReader};
